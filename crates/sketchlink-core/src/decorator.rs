//! Selection decorator: transform handles around the selection bounds.
//!
//! While a selection exists, the decorator keeps ten overlay shapes alive:
//! the bounds rectangle (dragging it moves the selection), four corner
//! ellipses, four edge rectangles, and a rotate knob above the top edge.
//! Handle geometry is specified in screen pixels and divided by the zoom
//! factor, so handles keep their apparent size at any zoom.

use crate::arena::PointId;
use crate::editor::Editor;
use crate::group_box::GroupBox;
use crate::history::UndoOp;
use crate::input::InputArgs;
use crate::shapes::{Ellipse, Rectangle, Rgba, Shape, ShapeId, ShapeStyle};
use kurbo::{Point, Rect};

/// Corner and rotate handle half-size in screen pixels.
pub const SIZE_LARGE: f64 = 4.0;
/// Edge handle half-size in screen pixels.
pub const SIZE_SMALL: f64 = 2.0;
/// Distance of the rotate knob above the top edge, in screen pixels.
const ROTATE_OFFSET: f64 = 25.0;

/// Active transform of a decorator drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    None,
    Move,
    Rotate,
    Top,
    Bottom,
    Left,
    Right,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Hit-test priority: the knob and corners sit on top of the edges, which
/// sit on top of the bounds rectangle.
const HANDLE_MODES: [Mode; 10] = [
    Mode::Rotate,
    Mode::TopLeft,
    Mode::TopRight,
    Mode::BottomLeft,
    Mode::BottomRight,
    Mode::Top,
    Mode::Bottom,
    Mode::Left,
    Mode::Right,
    Mode::Move,
];

#[derive(Debug, Clone)]
struct Handle {
    mode: Mode,
    shape_id: ShapeId,
    top_left: PointId,
    bottom_right: PointId,
    /// Disabled handles are skipped by hit testing (degenerate bounds).
    enabled: bool,
}

/// Transform-handle overlay for the current selection.
#[derive(Debug, Default)]
pub struct BoxDecorator {
    mode: Mode,
    visible: bool,
    group_box: Option<GroupBox>,
    handles: Vec<Handle>,
    /// Last snapped pointer position of the active drag.
    previous: Option<Point>,
    /// Pointer angle of the previous rotate tick, in degrees. `None` marks
    /// the start of a rotate gesture.
    rotate_accumulator: Option<f64>,
    /// Positions of the movable points at drag start, for the undo pair.
    before: Option<Vec<(PointId, Point)>>,
    active_handle: Option<ShapeId>,
    saved_show_points: Option<bool>,
}

impl BoxDecorator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The movable points of the decorated selection.
    pub fn movable_points(&self) -> Vec<PointId> {
        self.group_box
            .as_ref()
            .map(|g| g.points().to_vec())
            .unwrap_or_default()
    }

    /// Build the handle overlay for the current selection. Shape control
    /// points are suppressed while the decorator is up; the flag is restored
    /// on [`BoxDecorator::hide`].
    pub fn show(&mut self, editor: &mut Editor) {
        if self.visible {
            self.update(editor, true);
            return;
        }
        if editor.selection.is_empty() {
            return;
        }
        self.saved_show_points = Some(editor.options.show_points);
        editor.options.show_points = false;

        let shapes = editor.selected_shapes();
        let group_box = GroupBox::new(&editor.arena, &shapes);
        let bounds = group_box.bounds();
        let zoom = editor.options.zoom.max(f64::EPSILON);

        let mut built = Vec::with_capacity(HANDLE_MODES.len());
        for mode in HANDLE_MODES {
            let (tl, br) = handle_frame(mode, bounds, zoom);
            let top_left = editor.arena.insert(tl.x, tl.y);
            let bottom_right = editor.arena.insert(br.x, br.y);
            let shape = match mode {
                Mode::Move => {
                    let mut rect = Rectangle::with_points(top_left, bottom_right);
                    rect.style = bounds_style();
                    Shape::Rectangle(rect)
                }
                Mode::Top | Mode::Bottom | Mode::Left | Mode::Right => {
                    let mut rect = Rectangle::with_points(top_left, bottom_right);
                    rect.style = handle_style();
                    Shape::Rectangle(rect)
                }
                _ => {
                    let mut ellipse = Ellipse::with_points(top_left, bottom_right);
                    ellipse.style = handle_style();
                    Shape::Ellipse(ellipse)
                }
            };
            self.handles.push(Handle {
                mode,
                shape_id: shape.id(),
                top_left,
                bottom_right,
                enabled: true,
            });
            built.push(shape);
        }
        // Bottom-up so the bounds rectangle sits under the handles.
        for shape in built.into_iter().rev() {
            editor.overlay.add(shape);
        }
        self.group_box = Some(group_box);
        self.visible = true;
        self.refresh(editor);
    }

    /// Tear down the handle overlay, releasing the handle points.
    pub fn hide(&mut self, editor: &mut Editor) {
        if !self.visible {
            return;
        }
        for handle in &self.handles {
            editor.overlay.remove(handle.shape_id);
            editor.arena.remove(handle.top_left);
            editor.arena.remove(handle.bottom_right);
        }
        self.handles.clear();
        self.group_box = None;
        if let Some(show_points) = self.saved_show_points.take() {
            editor.options.show_points = show_points;
        }
        self.visible = false;
        self.mode = Mode::None;
        self.active_handle = None;
        self.previous = None;
        self.rotate_accumulator = None;
        self.before = None;
        editor.overlay.invalidate();
    }

    /// Refresh from the selection. With `rebuild` the movable cache is
    /// recomputed (selection membership changed); otherwise only positions.
    pub fn update(&mut self, editor: &mut Editor, rebuild: bool) {
        if !self.visible {
            return;
        }
        if editor.selection.is_empty() {
            self.hide(editor);
            return;
        }
        let shapes = editor.selected_shapes();
        if let Some(group_box) = self.group_box.as_mut() {
            group_box.update(&editor.arena, &shapes, rebuild);
        }
        self.refresh(editor);
    }

    fn refresh(&mut self, editor: &mut Editor) {
        let Some(bounds) = self.group_box.as_ref().map(GroupBox::bounds) else {
            return;
        };
        let zoom = editor.options.zoom.max(f64::EPSILON);
        let degenerate = bounds.width() <= 0.0 || bounds.height() <= 0.0;
        for handle in &mut self.handles {
            handle.enabled = !(degenerate
                && matches!(
                    handle.mode,
                    Mode::Top
                        | Mode::Bottom
                        | Mode::Left
                        | Mode::Right
                        | Mode::TopRight
                        | Mode::BottomLeft
                ));
            let (tl, br) = handle_frame(handle.mode, bounds, zoom);
            editor.arena.set_position(handle.top_left, tl);
            editor.arena.set_position(handle.bottom_right, br);
        }
        editor.overlay.invalidate();
    }

    /// Try to begin a drag on a handle. On a hit the handle flips to its
    /// selected style, the before-image for undo is captured and the mode is
    /// armed; subsequent [`BoxDecorator::move_to`] calls apply the transform.
    pub fn hit_test(&mut self, editor: &mut Editor, args: &InputArgs) -> bool {
        if !self.visible {
            return false;
        }
        let location = args.position();
        let radius = editor.hit_radius();
        let hit = self
            .handles
            .iter()
            .find(|handle| {
                handle.enabled
                    && editor
                        .overlay
                        .get(handle.shape_id)
                        .is_some_and(|shape| shape.hit_test(&editor.arena, location, radius))
            })
            .map(|handle| (handle.mode, handle.shape_id));
        let Some((mode, shape_id)) = hit else {
            return false;
        };
        log::debug!("decorator drag begins: {mode:?}");
        self.mode = mode;
        self.active_handle = Some(shape_id);
        editor
            .overlay
            .update_shape(shape_id, |shape| *shape.style_mut() = selected_handle_style());
        editor.overlay.invalidate();
        self.previous = Some(editor.snap(location));
        self.rotate_accumulator = None;
        self.before = Some(
            self.movable_points()
                .into_iter()
                .map(|id| (id, editor.arena.position(id)))
                .collect(),
        );
        true
    }

    /// Apply one drag tick. Deltas are taken between snapped pointer
    /// positions; with Shift held, edge and corner scales preserve the
    /// aspect ratio of the bounds captured at the start of the tick.
    pub fn move_to(&mut self, editor: &mut Editor, args: &InputArgs) {
        if self.mode == Mode::None || !self.visible {
            return;
        }
        let Some(group_box) = self.group_box.clone() else {
            return;
        };
        let snapped = editor.snap(args.position());
        let previous = self.previous.unwrap_or(snapped);
        let dx = snapped.x - previous.x;
        let dy = snapped.y - previous.y;
        if self.mode != Mode::Rotate && dx == 0.0 && dy == 0.0 {
            return;
        }
        self.apply(editor, &group_box, snapped, dx, dy, args.modifiers.shift);
        self.previous = Some(snapped);
        self.update(editor, false);
        editor.layer.invalidate();
    }

    fn apply(
        &mut self,
        editor: &mut Editor,
        group_box: &GroupBox,
        pointer: Point,
        dx: f64,
        dy: f64,
        proportional: bool,
    ) {
        let bounds = group_box.bounds();
        let w = bounds.width();
        let h = bounds.height();
        let arena = &mut editor.arena;
        match self.mode {
            Mode::None => {}
            Mode::Move => group_box.translate(arena, dx, dy),
            Mode::Rotate => {
                group_box.rotate(arena, pointer.x, pointer.y, &mut self.rotate_accumulator)
            }
            Mode::Top => {
                if proportional && h > 0.0 {
                    let other = w * ((h - dy) / h) - w;
                    group_box.scale_left(arena, -other / 2.0);
                    group_box.scale_right(arena, other / 2.0);
                }
                group_box.scale_top(arena, dy);
            }
            Mode::Bottom => {
                if proportional && h > 0.0 {
                    let other = w * ((h + dy) / h) - w;
                    group_box.scale_left(arena, -other / 2.0);
                    group_box.scale_right(arena, other / 2.0);
                }
                group_box.scale_bottom(arena, dy);
            }
            Mode::Left => {
                if proportional && w > 0.0 {
                    let other = h * ((w - dx) / w) - h;
                    group_box.scale_top(arena, -other / 2.0);
                    group_box.scale_bottom(arena, other / 2.0);
                }
                group_box.scale_left(arena, dx);
            }
            Mode::Right => {
                if proportional && w > 0.0 {
                    let other = h * ((w + dx) / w) - h;
                    group_box.scale_top(arena, -other / 2.0);
                    group_box.scale_bottom(arena, other / 2.0);
                }
                group_box.scale_right(arena, dx);
            }
            Mode::TopLeft => {
                group_box.scale_left(arena, dx);
                if proportional && w > 0.0 {
                    group_box.scale_top(arena, -(h * ((w - dx) / w) - h));
                } else {
                    group_box.scale_top(arena, dy);
                }
            }
            Mode::TopRight => {
                group_box.scale_right(arena, dx);
                if proportional && w > 0.0 {
                    group_box.scale_top(arena, -(h * ((w + dx) / w) - h));
                } else {
                    group_box.scale_top(arena, dy);
                }
            }
            Mode::BottomLeft => {
                group_box.scale_left(arena, dx);
                if proportional && w > 0.0 {
                    group_box.scale_bottom(arena, h * ((w - dx) / w) - h);
                } else {
                    group_box.scale_bottom(arena, dy);
                }
            }
            Mode::BottomRight => {
                group_box.scale_right(arena, dx);
                if proportional && w > 0.0 {
                    group_box.scale_bottom(arena, h * ((w + dx) / w) - h);
                } else {
                    group_box.scale_bottom(arena, dy);
                }
            }
        }
    }

    /// Finish the active drag: revert the handle style, record the undo
    /// pair when anything moved, clear the per-gesture state and rebuild.
    pub fn end_drag(&mut self, editor: &mut Editor) {
        if self.mode == Mode::None {
            return;
        }
        if let Some(shape_id) = self.active_handle.take() {
            let style = style_for(self.mode);
            editor
                .overlay
                .update_shape(shape_id, |shape| *shape.style_mut() = style);
        }
        if let Some(before) = self.before.take() {
            let after: Vec<(PointId, Point)> = before
                .iter()
                .map(|&(id, _)| (id, editor.arena.position(id)))
                .collect();
            let changed = before
                .iter()
                .zip(&after)
                .any(|((_, was), (_, now))| was != now);
            if changed {
                editor.history.snapshot(
                    UndoOp::SetPositions { moves: before },
                    UndoOp::SetPositions { moves: after },
                );
            }
        }
        self.mode = Mode::None;
        self.previous = None;
        self.rotate_accumulator = None;
        self.update(editor, true);
        editor.overlay.invalidate();
    }
}

fn handle_frame(mode: Mode, bounds: Rect, zoom: f64) -> (Point, Point) {
    let center = bounds.center();
    let large = SIZE_LARGE / zoom;
    let small = SIZE_SMALL / zoom;
    let centered =
        |cx: f64, cy: f64, half: f64| (Point::new(cx - half, cy - half), Point::new(cx + half, cy + half));
    match mode {
        Mode::None | Mode::Move => (
            Point::new(bounds.x0, bounds.y0),
            Point::new(bounds.x1, bounds.y1),
        ),
        Mode::Rotate => centered(center.x, bounds.y0 - ROTATE_OFFSET / zoom, large),
        Mode::TopLeft => centered(bounds.x0, bounds.y0, large),
        Mode::TopRight => centered(bounds.x1, bounds.y0, large),
        Mode::BottomLeft => centered(bounds.x0, bounds.y1, large),
        Mode::BottomRight => centered(bounds.x1, bounds.y1, large),
        Mode::Top => centered(center.x, bounds.y0, small),
        Mode::Bottom => centered(center.x, bounds.y1, small),
        Mode::Left => centered(bounds.x0, center.y, small),
        Mode::Right => centered(bounds.x1, center.y, small),
    }
}

fn handle_style() -> ShapeStyle {
    ShapeStyle {
        stroke: Rgba::new(0, 120, 215, 255),
        stroke_width: 1.0,
        fill: Some(Rgba::new(255, 255, 255, 255)),
    }
}

fn selected_handle_style() -> ShapeStyle {
    ShapeStyle {
        stroke: Rgba::new(0, 120, 215, 255),
        stroke_width: 1.0,
        fill: Some(Rgba::new(0, 120, 215, 255)),
    }
}

fn bounds_style() -> ShapeStyle {
    ShapeStyle {
        stroke: Rgba::new(0, 120, 215, 160),
        stroke_width: 1.0,
        // fully transparent fill, kept so interior clicks register as hits
        fill: Some(Rgba::new(0, 0, 0, 0)),
    }
}

fn style_for(mode: Mode) -> ShapeStyle {
    match mode {
        Mode::Move => bounds_style(),
        _ => handle_style(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::{Line, Rectangle, ShapeTrait};

    fn editor_with_rect() -> (Editor, Rectangle) {
        let mut editor = Editor::new();
        let rect = Rectangle::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(100.0, 50.0),
        );
        let id = rect.id();
        editor.layer.add(Shape::Rectangle(rect.clone()));
        editor.select(id);
        (editor, rect)
    }

    #[test]
    fn test_show_builds_overlay_and_suppresses_points() {
        let (mut editor, _) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        assert!(decorator.is_visible());
        assert_eq!(editor.overlay.len(), 10);
        assert!(!editor.options.show_points);
        decorator.hide(&mut editor);
        assert!(editor.overlay.is_empty());
        assert!(editor.options.show_points);
    }

    #[test]
    fn test_show_hide_cycles_release_handle_points() {
        let (mut editor, _) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        decorator.hide(&mut editor);
        let baseline = editor.arena.len();
        for _ in 0..100 {
            decorator.show(&mut editor);
            decorator.hide(&mut editor);
        }
        assert_eq!(editor.arena.len(), baseline);
    }

    #[test]
    fn test_hit_modes() {
        let (mut editor, _) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(100.0, 50.0)));
        assert_eq!(decorator.mode(), Mode::BottomRight);
        decorator.end_drag(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(50.0, 25.0)));
        assert_eq!(decorator.mode(), Mode::Move);
        decorator.end_drag(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(50.0, -25.0)));
        assert_eq!(decorator.mode(), Mode::Rotate);
        decorator.end_drag(&mut editor);
        assert!(!decorator.hit_test(&mut editor, &InputArgs::new(300.0, 300.0)));
    }

    #[test]
    fn test_corner_resize() {
        let (mut editor, rect) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(100.0, 50.0)));
        decorator.move_to(&mut editor, &InputArgs::new(120.0, 70.0));
        decorator.end_drag(&mut editor);
        let corner = editor.arena.position(rect.bottom_right);
        assert!((corner.x - 120.0).abs() < f64::EPSILON);
        assert!((corner.y - 70.0).abs() < f64::EPSILON);
        // top-left stays fixed
        let origin = editor.arena.position(rect.top_left);
        assert!(origin.x.abs() < f64::EPSILON);
        assert!(origin.y.abs() < f64::EPSILON);
    }

    #[test]
    fn test_proportional_corner_resize() {
        let (mut editor, rect) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(100.0, 50.0)));
        // horizontal-only drag with Shift: width 100 -> 120, so height 50 -> 60
        decorator.move_to(
            &mut editor,
            &InputArgs::with_modifiers(120.0, 50.0, Modifiers::shift()),
        );
        decorator.end_drag(&mut editor);
        let corner = editor.arena.position(rect.bottom_right);
        assert!((corner.x - 120.0).abs() < 1e-9);
        assert!((corner.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_proportional_edge_resize_centers_other_axis() {
        let (mut editor, rect) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(100.0, 25.0)));
        assert_eq!(decorator.mode(), Mode::Right);
        decorator.move_to(
            &mut editor,
            &InputArgs::with_modifiers(120.0, 25.0, Modifiers::shift()),
        );
        decorator.end_drag(&mut editor);
        // width 100 -> 120 means height 50 -> 60, split across top and bottom
        let tl = editor.arena.position(rect.top_left);
        let br = editor.arena.position(rect.bottom_right);
        assert!((br.x - 120.0).abs() < 1e-9);
        assert!((tl.y + 5.0).abs() < 1e-9);
        assert!((br.y - 55.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_bounds_disable_edge_handles() {
        let mut editor = Editor::new();
        let line = Line::new(
            &mut editor.arena,
            Point::new(0.0, 10.0),
            Point::new(100.0, 10.0),
        );
        let id = line.id();
        editor.layer.add(Shape::Line(line));
        editor.select(id);
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        // the top-edge handle is disabled, so the midpoint grabs the bounds
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(50.0, 10.0)));
        assert_eq!(decorator.mode(), Mode::Move);
        decorator.end_drag(&mut editor);
        // top-right is disabled; the same spot resolves to bottom-right
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(100.0, 10.0)));
        assert_eq!(decorator.mode(), Mode::BottomRight);
    }

    #[test]
    fn test_drag_records_undo_pair() {
        let (mut editor, _) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(50.0, 25.0)));
        decorator.move_to(&mut editor, &InputArgs::new(60.0, 30.0));
        decorator.end_drag(&mut editor);
        assert_eq!(editor.history.len(), 1);
        let snap = editor.history.pop().unwrap();
        assert!(matches!(snap.undo, UndoOp::SetPositions { .. }));
    }

    #[test]
    fn test_unmoved_drag_records_nothing() {
        let (mut editor, _) = editor_with_rect();
        let mut decorator = BoxDecorator::new();
        decorator.show(&mut editor);
        assert!(decorator.hit_test(&mut editor, &InputArgs::new(50.0, 25.0)));
        decorator.end_drag(&mut editor);
        assert!(editor.history.is_empty());
    }
}
