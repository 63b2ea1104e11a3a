//! Editor context.
//!
//! One struct bundles everything a tool needs for a gesture: the point
//! arena, the content layer, the overlay layer for tool chrome, the
//! selection set, the undo recorder and the options. Tools and the
//! decorator receive `&mut Editor` per call instead of reaching for any
//! shared service.

use crate::arena::{PointArena, PointId};
use crate::history::History;
use crate::layer::Layer;
use crate::options::Options;
use crate::shapes::{bounds_of, Shape, ShapeId};
use crate::snap::snap_to_grid;
use kurbo::{Point, Rect};

/// Mutable editing context handed to tools.
#[derive(Debug, Default)]
pub struct Editor {
    pub arena: PointArena,
    /// Document content, back-to-front.
    pub layer: Layer,
    /// Tool chrome (decorator handles, marquee rectangle). Never part of the
    /// document.
    pub overlay: Layer,
    /// Selected top-level shape ids, in selection order.
    pub selection: Vec<ShapeId>,
    pub history: History,
    pub options: Options,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single shape.
    pub fn select(&mut self, id: ShapeId) {
        self.selection.clear();
        self.selection.push(id);
        log::debug!("selected shape {id}");
    }

    /// Add or remove a shape from the selection.
    pub fn toggle_select(&mut self, id: ShapeId) {
        if let Some(index) = self.selection.iter().position(|&s| s == id) {
            self.selection.remove(index);
        } else {
            self.selection.push(id);
        }
    }

    pub fn deselect(&mut self, id: ShapeId) {
        self.selection.retain(|&s| s != id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: ShapeId) -> bool {
        self.selection.contains(&id)
    }

    /// Clones of the selected shapes in z-order. Cloning keeps borrows of
    /// the layer out of gesture code that also mutates the arena.
    pub fn selected_shapes(&self) -> Vec<Shape> {
        self.layer
            .shapes()
            .iter()
            .filter(|s| self.selection.contains(&s.id()))
            .cloned()
            .collect()
    }

    /// Aggregate bounds of the selection, `None` when nothing is selected.
    pub fn selected_bounds(&self) -> Option<Rect> {
        if self.selection.is_empty() {
            return None;
        }
        let ids: Vec<PointId> = self
            .selected_shapes()
            .iter()
            .flat_map(Shape::point_ids)
            .collect();
        if ids.is_empty() {
            return None;
        }
        Some(bounds_of(&self.arena, ids.into_iter()))
    }

    /// A hit shape whose variant is a bare point resolves to the shape that
    /// owns the point, when that owner is on this layer.
    pub fn resolve_selectable(&self, id: ShapeId) -> ShapeId {
        let Some(Shape::Point(point)) = self.layer.get(id) else {
            return id;
        };
        match self.arena.get(point.point).and_then(|node| node.owner) {
            Some(owner) if owner != id && self.layer.contains(owner) => owner,
            _ => id,
        }
    }

    /// Snap a pointer position to the grid when the option is on.
    pub fn snap(&self, point: Point) -> Point {
        if self.options.snap_to_grid {
            snap_to_grid(point, self.options.grid_size)
        } else {
            point
        }
    }

    pub fn hit_radius(&self) -> f64 {
        self.options.hit_radius()
    }

    /// Translate a set of points in place.
    pub fn move_points_by(&mut self, points: &[PointId], dx: f64, dy: f64) {
        for &id in points {
            self.arena.translate(id, dx, dy);
        }
        self.layer.invalidate();
    }

    /// Translate a set of shapes in place, moving each underlying point once
    /// even when shapes share it.
    pub fn move_shapes_by(&mut self, shapes: &[ShapeId], dx: f64, dy: f64) {
        let mut moved: Vec<PointId> = Vec::new();
        for &shape_id in shapes {
            if let Some(shape) = self.layer.get(shape_id) {
                for id in shape.point_ids() {
                    if !moved.contains(&id) {
                        moved.push(id);
                    }
                }
            }
        }
        for id in moved {
            self.arena.translate(id, dx, dy);
        }
        self.layer.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Line, PointShape, Rectangle, ShapeTrait};

    #[test]
    fn test_toggle_select() {
        let mut editor = Editor::new();
        let id = uuid::Uuid::new_v4();
        editor.toggle_select(id);
        assert!(editor.is_selected(id));
        editor.toggle_select(id);
        assert!(!editor.is_selected(id));
    }

    #[test]
    fn test_selected_bounds_aggregates() {
        let mut editor = Editor::new();
        let a = Rectangle::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        );
        let b = Rectangle::new(
            &mut editor.arena,
            Point::new(20.0, 20.0),
            Point::new(40.0, 50.0),
        );
        let (a_id, b_id) = (a.id(), b.id());
        editor.layer.add(Shape::Rectangle(a));
        editor.layer.add(Shape::Rectangle(b));
        editor.select(a_id);
        editor.toggle_select(b_id);
        let bounds = editor.selected_bounds().unwrap();
        assert!((bounds.x0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 40.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shared_point_moved_once() {
        let mut editor = Editor::new();
        let a = Line::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        let joint = a.end;
        let b = Shape::Line(Line::with_points(joint, {
            let far = editor.arena.insert(20.0, 0.0);
            far
        }));
        let (a_id, b_id) = (a.id(), b.id());
        editor.layer.add(Shape::Line(a));
        editor.layer.add(b);
        editor.move_shapes_by(&[a_id, b_id], 5.0, 0.0);
        let pos = editor.arena.position(joint);
        assert!((pos.x - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_point_shape_to_owner() {
        let mut editor = Editor::new();
        let rect = Rectangle::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
        );
        let rect_id = rect.id();
        let corner = rect.top_left;
        editor.layer.add(Shape::Rectangle(rect));
        let marker = PointShape::with_point(corner);
        let marker_id = marker.id();
        editor.layer.add(Shape::Point(marker));
        assert_eq!(editor.resolve_selectable(marker_id), rect_id);
    }

    #[test]
    fn test_snap_honors_option() {
        let mut editor = Editor::new();
        let p = Point::new(23.0, 9.0);
        assert_eq!(editor.snap(p), p);
        editor.options.snap_to_grid = true;
        assert_eq!(editor.snap(p), Point::new(20.0, 0.0));
    }
}
