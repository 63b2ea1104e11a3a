//! Selection tool.
//!
//! Pointer-down routes, in order: a decorator handle starts a transform
//! drag; a Control-click toggles shape membership; a hit on a shape or a
//! click inside the selection bounds starts a move drag; anything else
//! starts a marquee. Joint maintenance brackets move drags: holding Control
//! during the drag splits shared joints once, and released endpoints merge
//! onto nearby points once at pointer-up.

use std::sync::Arc;

use crate::arena::PointId;
use crate::connection::{disconnect_selection_points, try_connect_moved_points};
use crate::decorator::{BoxDecorator, Mode};
use crate::editor::Editor;
use crate::group_box::GroupBox;
use crate::hit_test::{shapes_in_rect, try_to_get_shape};
use crate::history::UndoOp;
use crate::input::{InputArgs, PointerEvent};
use crate::options::MoveMode;
use crate::shapes::{Rectangle, Rgba, Shape, ShapeError, ShapeId, ShapeStyle};
use kurbo::{Point, Rect};

/// Coarse tool state: whether a selection exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolState {
    #[default]
    None,
    Selected,
}

/// What the active pointer drag is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Decorator,
    Move,
    Marquee,
}

/// The select/move/transform tool.
#[derive(Debug, Default)]
pub struct SelectionTool {
    state: ToolState,
    drag: Option<DragKind>,
    pub decorator: BoxDecorator,
    /// Snapped drag origin.
    start: Point,
    /// Snapped position of the previous tick.
    previous: Point,
    move_points: Vec<PointId>,
    move_shapes: Vec<ShapeId>,
    /// Joint splitting fires at most once per move drag.
    disconnected: bool,
    marquee: Option<ShapeId>,
    hovered: Option<ShapeId>,
}

impl SelectionTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ToolState {
        self.state
    }

    pub fn drag(&self) -> Option<DragKind> {
        self.drag
    }

    /// The shape under the pointer while no drag is active.
    pub fn hovered(&self) -> Option<ShapeId> {
        self.hovered
    }

    /// Route a pointer event. The secondary button cancels any gesture.
    pub fn handle(&mut self, editor: &mut Editor, event: PointerEvent) -> Result<(), ShapeError> {
        match event {
            PointerEvent::BeginDown(args) => self.begin_down(editor, &args),
            PointerEvent::Move(args) => self.move_to(editor, &args),
            PointerEvent::BeginUp(args) => self.begin_up(editor, &args),
            PointerEvent::EndDown(_) => {
                self.reset(editor);
                Ok(())
            }
            PointerEvent::EndUp(_) => Ok(()),
        }
    }

    pub fn begin_down(&mut self, editor: &mut Editor, args: &InputArgs) -> Result<(), ShapeError> {
        let location = args.position();

        // Control bypasses the handles so membership can be toggled inside
        // the selection bounds.
        if !args.modifiers.ctrl && self.decorator.hit_test(editor, args) {
            self.drag = Some(DragKind::Decorator);
            self.state = ToolState::Selected;
            return Ok(());
        }

        let snapshot = Arc::clone(editor.layer.shapes());
        let hit = try_to_get_shape(&editor.arena, &snapshot, location, editor.hit_radius())
            .map(|id| editor.resolve_selectable(id));

        if args.modifiers.ctrl {
            if let Some(id) = hit {
                editor.toggle_select(id);
                self.refresh_decorator(editor);
                self.state = self.state_from_selection(editor);
            } else {
                // additive marquee: the current selection is kept
                self.begin_marquee(editor, location);
            }
            return Ok(());
        }

        if let Some(id) = hit {
            let inside = editor
                .selected_bounds()
                .is_some_and(|bounds| bounds.contains(location));
            if !editor.is_selected(id) && !inside {
                editor.select(id);
                self.refresh_decorator(editor);
            }
            self.begin_move(editor, location);
            return Ok(());
        }

        if editor
            .selected_bounds()
            .is_some_and(|bounds| bounds.contains(location))
        {
            self.begin_move(editor, location);
            return Ok(());
        }

        editor.clear_selection();
        self.decorator.hide(editor);
        self.begin_marquee(editor, location);
        Ok(())
    }

    pub fn move_to(&mut self, editor: &mut Editor, args: &InputArgs) -> Result<(), ShapeError> {
        match self.drag {
            None => {
                self.hover(editor, args);
                Ok(())
            }
            Some(DragKind::Decorator) => {
                self.decorator.move_to(editor, args);
                Ok(())
            }
            Some(DragKind::Move) => {
                if args.modifiers.ctrl && !self.disconnected {
                    self.disconnected = true;
                    if disconnect_selection_points(editor)? > 0 {
                        // joints were replaced with copies; the cache is stale
                        self.generate_move_cache(editor);
                    }
                }
                let snapped = editor.snap(args.position());
                let dx = snapped.x - self.previous.x;
                let dy = snapped.y - self.previous.y;
                if dx != 0.0 || dy != 0.0 {
                    match editor.options.move_mode {
                        MoveMode::Point => editor.move_points_by(&self.move_points, dx, dy),
                        MoveMode::Shape => editor.move_shapes_by(&self.move_shapes, dx, dy),
                    }
                    self.previous = snapped;
                    self.decorator.update(editor, false);
                }
                Ok(())
            }
            Some(DragKind::Marquee) => {
                if let Some(id) = self.marquee {
                    let corner = editor.overlay.get(id).and_then(|shape| match shape {
                        Shape::Rectangle(rect) => Some(rect.bottom_right),
                        _ => None,
                    });
                    if let Some(corner) = corner {
                        editor.arena.set_position(corner, args.position());
                        editor.overlay.invalidate();
                    }
                }
                Ok(())
            }
        }
    }

    pub fn begin_up(&mut self, editor: &mut Editor, args: &InputArgs) -> Result<(), ShapeError> {
        match self.drag.take() {
            Some(DragKind::Decorator) => {
                let was_move = self.decorator.mode() == Mode::Move;
                let moved = self.decorator.movable_points();
                self.decorator.end_drag(editor);
                if was_move && try_connect_moved_points(editor, &moved)? > 0 {
                    self.decorator.update(editor, true);
                }
            }
            Some(DragKind::Move) => {
                let dx = self.previous.x - self.start.x;
                let dy = self.previous.y - self.start.y;
                let moved = self.moved_point_ids(editor);
                if dx != 0.0 || dy != 0.0 {
                    let redo = UndoOp::MoveBy {
                        dx,
                        dy,
                        points: self.move_points.clone(),
                        shapes: self.move_shapes.clone(),
                    };
                    if let Some(undo) = redo.inverse() {
                        editor.history.snapshot(undo, redo);
                    }
                }
                try_connect_moved_points(editor, &moved)?;
                self.move_points.clear();
                self.move_shapes.clear();
                self.disconnected = false;
                self.refresh_decorator(editor);
            }
            Some(DragKind::Marquee) => {
                self.remove_marquee(editor);
                let rect = Rect::from_points(self.start, args.position());
                let snapshot = Arc::clone(editor.layer.shapes());
                let ids = shapes_in_rect(&editor.arena, &snapshot, rect);
                if args.modifiers.ctrl {
                    for id in ids {
                        if !editor.is_selected(id) {
                            editor.selection.push(id);
                        }
                    }
                } else {
                    editor.selection = ids;
                }
                self.refresh_decorator(editor);
                editor.overlay.invalidate();
            }
            None => {}
        }
        self.state = self.state_from_selection(editor);
        Ok(())
    }

    /// Abandon any gesture in progress. Safe to call repeatedly.
    pub fn reset(&mut self, editor: &mut Editor) {
        self.remove_marquee(editor);
        self.decorator.end_drag(editor);
        self.move_points.clear();
        self.move_shapes.clear();
        self.disconnected = false;
        self.drag = None;
        self.hovered = None;
        self.state = self.state_from_selection(editor);
        editor.overlay.invalidate();
    }

    fn state_from_selection(&self, editor: &Editor) -> ToolState {
        if editor.selection.is_empty() {
            ToolState::None
        } else {
            ToolState::Selected
        }
    }

    fn refresh_decorator(&mut self, editor: &mut Editor) {
        if editor.selection.is_empty() {
            self.decorator.hide(editor);
        } else if self.decorator.is_visible() {
            self.decorator.update(editor, true);
        } else {
            self.decorator.show(editor);
        }
    }

    /// Drop the marquee rectangle and release its arena points.
    fn remove_marquee(&mut self, editor: &mut Editor) {
        if let Some(id) = self.marquee.take() {
            if let Some(Shape::Rectangle(rect)) = editor.overlay.remove(id) {
                editor.arena.remove(rect.top_left);
                editor.arena.remove(rect.bottom_right);
            }
        }
    }

    fn begin_move(&mut self, editor: &mut Editor, location: Point) {
        self.generate_move_cache(editor);
        let snapped = editor.snap(location);
        self.start = snapped;
        self.previous = snapped;
        self.disconnected = false;
        self.drag = Some(DragKind::Move);
        self.state = ToolState::Selected;
    }

    fn begin_marquee(&mut self, editor: &mut Editor, location: Point) {
        let mut rect = Rectangle::new(&mut editor.arena, location, location);
        rect.style = marquee_style();
        self.marquee = Some(rect.id);
        editor.overlay.add(Shape::Rectangle(rect));
        editor.overlay.invalidate();
        self.start = location;
        self.previous = location;
        self.drag = Some(DragKind::Marquee);
        self.state = ToolState::Selected;
    }

    fn generate_move_cache(&mut self, editor: &Editor) {
        self.move_points.clear();
        self.move_shapes.clear();
        match editor.options.move_mode {
            MoveMode::Point => {
                let shapes = editor.selected_shapes();
                let group_box = GroupBox::new(&editor.arena, &shapes);
                self.move_points = group_box.points().to_vec();
            }
            MoveMode::Shape => {
                self.move_shapes = editor
                    .selected_shapes()
                    .iter()
                    .filter(|shape| !shape.locked())
                    .map(Shape::id)
                    .collect();
            }
        }
    }

    fn moved_point_ids(&self, editor: &Editor) -> Vec<PointId> {
        match editor.options.move_mode {
            MoveMode::Point => self.move_points.clone(),
            MoveMode::Shape => {
                let mut ids = Vec::new();
                for &shape_id in &self.move_shapes {
                    if let Some(shape) = editor.layer.get(shape_id) {
                        for id in shape.point_ids() {
                            if !ids.contains(&id) {
                                ids.push(id);
                            }
                        }
                    }
                }
                ids
            }
        }
    }

    fn hover(&mut self, editor: &mut Editor, args: &InputArgs) {
        let snapshot = Arc::clone(editor.layer.shapes());
        let hit = try_to_get_shape(
            &editor.arena,
            &snapshot,
            args.position(),
            editor.hit_radius(),
        )
        .map(|id| editor.resolve_selectable(id));
        if hit != self.hovered {
            self.hovered = hit;
            editor.overlay.invalidate();
        }
    }
}

fn marquee_style() -> ShapeStyle {
    ShapeStyle {
        stroke: Rgba::new(0, 120, 215, 160),
        stroke_width: 1.0,
        fill: Some(Rgba::new(0, 120, 215, 32)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Modifiers;
    use crate::shapes::{Line, ShapeTrait};

    fn rect_at(editor: &mut Editor, x0: f64, y0: f64, x1: f64, y1: f64) -> ShapeId {
        let rect = Rectangle::new(&mut editor.arena, Point::new(x0, y0), Point::new(x1, y1));
        let id = rect.id();
        editor.layer.add(Shape::Rectangle(rect));
        id
    }

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::BeginDown(InputArgs::new(x, y))
    }

    fn drag(x: f64, y: f64) -> PointerEvent {
        PointerEvent::Move(InputArgs::new(x, y))
    }

    fn up(x: f64, y: f64) -> PointerEvent {
        PointerEvent::BeginUp(InputArgs::new(x, y))
    }

    #[test]
    fn test_click_selects_and_decorates() {
        let mut editor = Editor::new();
        let id = rect_at(&mut editor, 0.0, 0.0, 20.0, 20.0);
        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, down(0.0, 10.0)).unwrap();
        tool.handle(&mut editor, up(0.0, 10.0)).unwrap();
        assert!(editor.is_selected(id));
        assert_eq!(tool.state(), ToolState::Selected);
        assert!(tool.decorator.is_visible());
    }

    #[test]
    fn test_click_empty_space_deselects() {
        let mut editor = Editor::new();
        let id = rect_at(&mut editor, 0.0, 0.0, 20.0, 20.0);
        let mut tool = SelectionTool::new();
        editor.select(id);
        tool.decorator.show(&mut editor);
        tool.handle(&mut editor, down(200.0, 200.0)).unwrap();
        tool.handle(&mut editor, up(200.0, 200.0)).unwrap();
        assert!(editor.selection.is_empty());
        assert_eq!(tool.state(), ToolState::None);
        assert!(!tool.decorator.is_visible());
    }

    #[test]
    fn test_ctrl_click_toggles_membership() {
        let mut editor = Editor::new();
        let a = rect_at(&mut editor, 0.0, 0.0, 20.0, 20.0);
        let b = rect_at(&mut editor, 100.0, 0.0, 120.0, 20.0);
        let mut tool = SelectionTool::new();
        let ctrl = |x, y| PointerEvent::BeginDown(InputArgs::with_modifiers(x, y, Modifiers::ctrl()));
        tool.handle(&mut editor, ctrl(0.0, 10.0)).unwrap();
        tool.handle(&mut editor, up(0.0, 10.0)).unwrap();
        tool.handle(&mut editor, ctrl(100.0, 10.0)).unwrap();
        tool.handle(&mut editor, up(100.0, 10.0)).unwrap();
        assert!(editor.is_selected(a));
        assert!(editor.is_selected(b));
        tool.handle(&mut editor, ctrl(100.0, 10.0)).unwrap();
        tool.handle(&mut editor, up(100.0, 10.0)).unwrap();
        assert!(!editor.is_selected(b));
    }

    #[test]
    fn test_drag_moves_selection_and_records_undo() {
        let mut editor = Editor::new();
        let id = rect_at(&mut editor, 0.0, 0.0, 20.0, 20.0);
        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, down(0.0, 10.0)).unwrap();
        tool.handle(&mut editor, drag(15.0, 15.0)).unwrap();
        tool.handle(&mut editor, up(15.0, 15.0)).unwrap();
        let bounds = editor.layer.get(id).unwrap().bounds(&editor.arena);
        assert!((bounds.x0 - 15.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 5.0).abs() < f64::EPSILON);
        assert_eq!(editor.history.len(), 1);
        assert!(matches!(
            editor.history.pop().unwrap().redo,
            UndoOp::MoveBy { dx, dy, .. } if (dx - 15.0).abs() < f64::EPSILON
                && (dy - 5.0).abs() < f64::EPSILON
        ));
    }

    #[test]
    fn test_marquee_selects_contained_and_crossed_shapes() {
        let mut editor = Editor::new();
        let a = rect_at(&mut editor, 0.0, 0.0, 10.0, 10.0);
        let b = rect_at(&mut editor, 20.0, 20.0, 30.0, 30.0);
        let c = rect_at(&mut editor, 100.0, 100.0, 110.0, 110.0);
        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, down(-20.0, -20.0)).unwrap();
        assert_eq!(tool.drag(), Some(DragKind::Marquee));
        tool.handle(&mut editor, drag(35.0, 35.0)).unwrap();
        tool.handle(&mut editor, up(35.0, 35.0)).unwrap();
        assert!(editor.is_selected(a));
        assert!(editor.is_selected(b));
        assert!(!editor.is_selected(c));
        // the marquee rectangle is gone from the overlay
        assert_eq!(editor.overlay.len(), 10);
        assert!(tool.decorator.is_visible());
    }

    #[test]
    fn test_ctrl_marquee_adds_to_selection() {
        let mut editor = Editor::new();
        let a = rect_at(&mut editor, 0.0, 0.0, 10.0, 10.0);
        let b = rect_at(&mut editor, 100.0, 100.0, 110.0, 110.0);
        let mut tool = SelectionTool::new();
        editor.select(a);
        let ctrl = |x, y| InputArgs::with_modifiers(x, y, Modifiers::ctrl());
        tool.handle(&mut editor, PointerEvent::BeginDown(ctrl(80.0, 80.0)))
            .unwrap();
        assert_eq!(tool.drag(), Some(DragKind::Marquee));
        tool.handle(&mut editor, PointerEvent::Move(ctrl(130.0, 130.0)))
            .unwrap();
        tool.handle(&mut editor, PointerEvent::BeginUp(ctrl(130.0, 130.0)))
            .unwrap();
        assert!(editor.is_selected(a));
        assert!(editor.is_selected(b));
    }

    #[test]
    fn test_joint_survives_shared_move() {
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

        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, down(50.0, 0.0)).unwrap();
        assert_eq!(tool.drag(), Some(DragKind::Move));
        tool.handle(&mut editor, drag(60.0, 20.0)).unwrap();
        tool.handle(&mut editor, up(60.0, 20.0)).unwrap();

        // still one shared point, moved exactly once
        assert_eq!(editor.layer.get(a_id).unwrap().points()[1].1, joint);
        assert_eq!(editor.layer.get(b_id).unwrap().points()[0].1, joint);
        let p = editor.arena.position(joint);
        assert!((p.x - 60.0).abs() < f64::EPSILON);
        assert!((p.y - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ctrl_drag_splits_joint_once() {
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

        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, down(25.0, 0.0)).unwrap();
        let ctrl_drag =
            |x, y| PointerEvent::Move(InputArgs::with_modifiers(x, y, Modifiers::ctrl()));
        tool.handle(&mut editor, ctrl_drag(25.0, 40.0)).unwrap();
        let after_first = editor.arena.len();
        tool.handle(&mut editor, ctrl_drag(25.0, 60.0)).unwrap();
        // splitting fired exactly once
        assert_eq!(editor.arena.len(), after_first);
        tool.handle(&mut editor, up(25.0, 60.0)).unwrap();

        let a_end = editor.layer.get(a_id).unwrap().points()[1].1;
        let b_start = editor.layer.get(b_id).unwrap().points()[0].1;
        assert_ne!(a_end, b_start);
        assert_eq!(b_start, joint);
        // the unselected line stayed in place, the selected one moved
        let stayed = editor.arena.position(joint);
        assert!((stayed.y - 0.0).abs() < f64::EPSILON);
        let moved = editor.arena.position(a_end);
        assert!((moved.y - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_released_endpoint_connects() {
        let mut editor = Editor::new();
        let a = Line::new(
            &mut editor.arena,
            Point::new(0.0, 0.0),
            Point::new(50.0, 0.0),
        );
        let b = Line::new(
            &mut editor.arena,
            Point::new(60.0, 10.0),
            Point::new(150.0, 10.0),
        );
        let (a_id, b_start) = (a.id(), b.start);
        editor.layer.add(Shape::Line(a));
        editor.layer.add(Shape::Line(b));

        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, down(25.0, 0.0)).unwrap();
        tool.handle(&mut editor, drag(33.0, 9.0)).unwrap();
        tool.handle(&mut editor, up(33.0, 9.0)).unwrap();

        // a's end landed near b's start and was rewired onto it
        assert_eq!(editor.layer.get(a_id).unwrap().points()[1].1, b_start);
    }

    #[test]
    fn test_hover_tracks_without_selecting() {
        let mut editor = Editor::new();
        let id = rect_at(&mut editor, 0.0, 0.0, 20.0, 20.0);
        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, drag(0.0, 10.0)).unwrap();
        assert_eq!(tool.hovered(), Some(id));
        assert!(editor.selection.is_empty());
        tool.handle(&mut editor, drag(200.0, 200.0)).unwrap();
        assert_eq!(tool.hovered(), None);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut editor = Editor::new();
        rect_at(&mut editor, 0.0, 0.0, 20.0, 20.0);
        let baseline = editor.arena.len();
        let mut tool = SelectionTool::new();
        tool.handle(&mut editor, down(-20.0, -20.0)).unwrap();
        assert_eq!(tool.drag(), Some(DragKind::Marquee));
        tool.reset(&mut editor);
        assert!(tool.drag().is_none());
        assert!(editor.overlay.is_empty());
        assert_eq!(editor.arena.len(), baseline);
        tool.reset(&mut editor);
        assert!(tool.drag().is_none());
    }

    #[test]
    fn test_marquee_releases_overlay_points() {
        let mut editor = Editor::new();
        rect_at(&mut editor, 0.0, 0.0, 20.0, 20.0);
        let mut tool = SelectionTool::new();
        let baseline = editor.arena.len();
        // a marquee that selects nothing leaves the arena as it found it
        tool.handle(&mut editor, down(-40.0, -40.0)).unwrap();
        tool.handle(&mut editor, drag(-30.0, -30.0)).unwrap();
        tool.handle(&mut editor, up(-30.0, -30.0)).unwrap();
        assert_eq!(editor.arena.len(), baseline);
    }
}
