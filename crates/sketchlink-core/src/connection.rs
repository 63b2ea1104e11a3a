//! Connection graph maintenance.
//!
//! Shapes connect by holding the same arena point: the joint is the edge.
//! Merging happens once at the end of a move gesture (a moved endpoint
//! released near another point is rewired onto it); splitting happens once
//! at the start of a Control-modified drag (each selected shape gets its own
//! copy of every joint it shares with an unselected shape). Both directions
//! record rewire ops for undo.

use std::collections::HashMap;
use std::sync::Arc;

use crate::arena::PointId;
use crate::editor::Editor;
use crate::hit_test::try_to_get_point;
use crate::history::UndoOp;
use crate::shapes::{Shape, ShapeError, ShapeId};

/// Map each point to the top-level shapes referencing it.
pub fn usage_index(shapes: &[Shape]) -> HashMap<PointId, Vec<ShapeId>> {
    let mut index: HashMap<PointId, Vec<ShapeId>> = HashMap::new();
    for shape in shapes {
        let id = shape.id();
        for point in shape.point_ids() {
            let owners = index.entry(point).or_default();
            if !owners.contains(&id) {
                owners.push(id);
            }
        }
    }
    index
}

/// Variants whose point roles can be rewired. Paths and groups hold their
/// points structurally and never participate in joint maintenance.
fn supports_rewiring(shape: &Shape) -> bool {
    !matches!(shape, Shape::Path(_) | Shape::Group(_))
}

/// Merge moved points onto nearby points at the end of a gesture.
///
/// For each moved point, the nearest point within the hit radius is looked
/// up, excluding the moved point itself and anything else in the moving set.
/// When a candidate exists, every selected shape holding the moved point is
/// rewired onto the candidate; the abandoned point simply goes unreferenced.
/// Returns the number of rewired roles.
pub fn try_connect_moved_points(
    editor: &mut Editor,
    moved: &[PointId],
) -> Result<usize, ShapeError> {
    let radius = editor.hit_radius();
    let mut count = 0;
    for &moving in moved {
        let snapshot = Arc::clone(editor.layer.shapes());
        let location = editor.arena.position(moving);
        let Some(target) =
            try_to_get_point(&editor.arena, &snapshot, location, radius, Some(moving))
        else {
            continue;
        };
        if moved.contains(&target) {
            continue;
        }
        let holders: Vec<ShapeId> = snapshot
            .iter()
            .filter(|shape| {
                editor.is_selected(shape.id())
                    && supports_rewiring(shape)
                    && shape.point_ids().contains(&moving)
            })
            .map(Shape::id)
            .collect();
        for shape_id in holders {
            let mut rewired = Ok(false);
            editor
                .layer
                .update_shape(shape_id, |shape| rewired = shape.replace_point(moving, target));
            if rewired? {
                count += 1;
                editor.history.snapshot(
                    UndoOp::ReplacePoint {
                        shape: shape_id,
                        old: target,
                        new: moving,
                    },
                    UndoOp::ReplacePoint {
                        shape: shape_id,
                        old: moving,
                        new: target,
                    },
                );
                log::debug!("connected {moving:?} -> {target:?} on shape {shape_id}");
            }
        }
    }
    if count > 0 {
        editor.layer.invalidate();
    }
    Ok(count)
}

/// Split every joint the selection shares with unselected shapes.
///
/// Each selected shape gets a fresh copy of every such point, so the
/// following drag moves the copies and leaves the unselected side in place.
/// Returns the number of rewired roles.
pub fn disconnect_selection_points(editor: &mut Editor) -> Result<usize, ShapeError> {
    let snapshot = Arc::clone(editor.layer.shapes());
    let index = usage_index(&snapshot);
    let selected = editor.selection.clone();
    let mut count = 0;
    for shape_id in selected {
        let points = match editor.layer.get(shape_id) {
            Some(shape) if supports_rewiring(shape) && !shape.locked() => shape.point_ids(),
            _ => continue,
        };
        for point in points {
            let Some(owners) = index.get(&point) else {
                continue;
            };
            let shared_outside = owners.iter().any(|owner| !editor.is_selected(*owner));
            if !shared_outside {
                continue;
            }
            let copy = editor.arena.clone_point(point, Some(shape_id));
            let mut rewired = Ok(false);
            editor
                .layer
                .update_shape(shape_id, |shape| rewired = shape.replace_point(point, copy));
            if rewired? {
                count += 1;
                editor.history.snapshot(
                    UndoOp::ReplacePoint {
                        shape: shape_id,
                        old: copy,
                        new: point,
                    },
                    UndoOp::ReplacePoint {
                        shape: shape_id,
                        old: point,
                        new: copy,
                    },
                );
                log::debug!("disconnected {point:?} -> {copy:?} on shape {shape_id}");
            }
        }
    }
    if count > 0 {
        editor.layer.invalidate();
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, Path, ShapeTrait};
    use kurbo::Point;

    fn two_lines(editor: &mut Editor) -> (Line, Line) {
        let a = Line::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
        );
        let b = Line::new(
            &mut editor.arena,
            Point::new(100.0, 0.0),
            Point::new(150.0, 0.0),
        );
        editor.layer.add(Shape::Line(a.clone()));
        editor.layer.add(Shape::Line(b.clone()));
        (a, b)
    }

    #[test]
    fn test_usage_index_counts_sharers() {
        let mut editor = Editor::new();
        let a = Line::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        let joint = a.end;
        let b = Line::with_points(joint, editor.arena.insert(20.0, 0.0));
        editor.layer.add(Shape::Line(a));
        editor.layer.add(Shape::Line(b));
        let index = usage_index(editor.layer.shapes());
        assert_eq!(index[&joint].len(), 2);
    }

    #[test]
    fn test_connect_merges_released_endpoint() {
        let mut editor = Editor::new();
        let (a, b) = two_lines(&mut editor);
        editor.select(a.id());
        // drag a's end near b's start and release
        editor.arena.set_position(a.end, Point::new(98.0, 1.0));
        let rewired = try_connect_moved_points(&mut editor, &[a.end]).unwrap();
        assert_eq!(rewired, 1);
        let merged = editor.layer.get(a.id()).unwrap().points()[1].1;
        assert_eq!(merged, b.start);
        assert_eq!(editor.history.len(), 1);
    }

    #[test]
    fn test_connect_skips_far_points_and_moving_set() {
        let mut editor = Editor::new();
        let (a, b) = two_lines(&mut editor);
        editor.select(a.id());
        // too far away: nothing merges
        assert_eq!(try_connect_moved_points(&mut editor, &[a.end]).unwrap(), 0);
        // candidate inside the moving set: nothing merges
        editor.arena.set_position(a.end, Point::new(100.0, 0.0));
        let moved = vec![a.end, b.start];
        assert_eq!(try_connect_moved_points(&mut editor, &moved).unwrap(), 0);
    }

    #[test]
    fn test_disconnect_splits_mixed_joint() {
        let mut editor = Editor::new();
        let a = Line::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
        );
        let joint = a.end;
        let b = Line::with_points(joint, editor.arena.insert(100.0, 0.0));
        let (a_id, b_id) = (a.id(), b.id());
        editor.layer.add(Shape::Line(a));
        editor.layer.add(Shape::Line(b));
        editor.select(a_id);

        let rewired = disconnect_selection_points(&mut editor).unwrap();
        assert_eq!(rewired, 1);
        let a_end = editor.layer.get(a_id).unwrap().points()[1].1;
        let b_start = editor.layer.get(b_id).unwrap().points()[0].1;
        assert_ne!(a_end, b_start);
        assert_eq!(b_start, joint);
        // the copy starts at the joint's coordinates
        assert_eq!(editor.arena.position(a_end), editor.arena.position(joint));
    }

    #[test]
    fn test_connect_then_disconnect_round_trip() {
        let mut editor = Editor::new();
        let (a, b) = two_lines(&mut editor);
        editor.select(a.id());

        // merge: a's end released next to b's start becomes the shared joint
        editor.arena.set_position(a.end, Point::new(99.0, 0.0));
        try_connect_moved_points(&mut editor, &[a.end]).unwrap();
        assert_eq!(editor.layer.get(a.id()).unwrap().points()[1].1, b.start);

        // split: the selected owner gets its own copy back
        assert_eq!(disconnect_selection_points(&mut editor).unwrap(), 1);
        let a_end = editor.layer.get(a.id()).unwrap().points()[1].1;
        let b_start = editor.layer.get(b.id()).unwrap().points()[0].1;
        assert_ne!(a_end, b_start);
        assert_eq!(
            editor.arena.position(a_end),
            editor.arena.position(b_start)
        );
    }

    #[test]
    fn test_disconnect_keeps_joints_inside_selection() {
        let mut editor = Editor::new();
        let a = Line::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
        );
        let joint = a.end;
        let b = Line::with_points(joint, editor.arena.insert(100.0, 0.0));
        let (a_id, b_id) = (a.id(), b.id());
        editor.layer.add(Shape::Line(a));
        editor.layer.add(Shape::Line(b));
        editor.select(a_id);
        editor.toggle_select(b_id);

        assert_eq!(disconnect_selection_points(&mut editor).unwrap(), 0);
        assert_eq!(editor.layer.get(a_id).unwrap().points()[1].1, joint);
    }

    #[test]
    fn test_disconnect_then_undo_restores_joint() {
        let mut editor = Editor::new();
        let a = Line::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
        );
        let joint = a.end;
        let b = Line::with_points(joint, editor.arena.insert(100.0, 0.0));
        let a_id = a.id();
        editor.layer.add(Shape::Line(a));
        editor.layer.add(Shape::Line(b));
        editor.select(a_id);

        disconnect_selection_points(&mut editor).unwrap();
        let snap = editor.history.pop().unwrap();
        let Editor { arena, layer, .. } = &mut editor;
        snap.undo.apply(arena, layer);
        assert_eq!(editor.layer.get(a_id).unwrap().points()[1].1, joint);
    }

    #[test]
    fn test_paths_are_skipped() {
        let mut editor = Editor::new();
        let path = Path::new(
            &mut editor.arena,
            vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0)],
        );
        let path_id = path.id();
        let shared = path.points[1];
        let b = Line::with_points(shared, editor.arena.insert(100.0, 0.0));
        editor.layer.add(Shape::Path(path));
        editor.layer.add(Shape::Line(b));
        editor.select(path_id);
        // a path shares a point with an unselected line, but paths never
        // participate in joint maintenance
        assert_eq!(disconnect_selection_points(&mut editor).unwrap(), 0);
    }
}
