//! Rectangle shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait};
use crate::arena::{PointArena, PointId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A rectangle spanned by its top-left and bottom-right points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rectangle {
    pub(crate) id: ShapeId,
    pub top_left: PointId,
    pub bottom_right: PointId,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl Rectangle {
    /// Create a new rectangle from two corner positions.
    pub fn new(arena: &mut PointArena, top_left: Point, bottom_right: Point) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            top_left: arena.insert_owned(top_left.x, top_left.y, id),
            bottom_right: arena.insert_owned(bottom_right.x, bottom_right.y, id),
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    /// Create a rectangle over existing arena points.
    pub fn with_points(top_left: PointId, bottom_right: PointId) -> Self {
        Self {
            id: Uuid::new_v4(),
            top_left,
            bottom_right,
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    /// Get as a normalized kurbo Rect.
    pub fn as_rect(&self, arena: &PointArena) -> Rect {
        let tl = arena.position(self.top_left);
        let br = arena.position(self.bottom_right);
        Rect::new(
            tl.x.min(br.x),
            tl.y.min(br.y),
            tl.x.max(br.x),
            tl.y.max(br.y),
        )
    }
}

impl ShapeTrait for Rectangle {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        out.push((PointRole::TopLeft, self.top_left));
        out.push((PointRole::BottomRight, self.bottom_right));
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect(arena);
        if self.style.fill.is_some() {
            // Filled: hit anywhere inside
            rect.inflate(tolerance, tolerance).contains(point)
        } else {
            // Outline only: hit on the border
            let pad = tolerance + self.style.stroke_width / 2.0;
            let outer = rect.inflate(pad, pad);
            let inner = rect.inflate(-pad, -pad);
            outer.contains(point) && !inner.contains(point)
        }
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outline_hit() {
        let mut arena = PointArena::new();
        let rect = Rectangle::new(&mut arena, Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        assert!(rect.hit_test(&arena, Point::new(0.0, 50.0), 2.0));
        assert!(!rect.hit_test(&arena, Point::new(50.0, 50.0), 2.0));
    }

    #[test]
    fn test_filled_hit() {
        let mut arena = PointArena::new();
        let mut rect = Rectangle::new(&mut arena, Point::new(0.0, 0.0), Point::new(100.0, 100.0));
        rect.style.fill = Some(super::super::Rgba::black());
        assert!(rect.hit_test(&arena, Point::new(50.0, 50.0), 2.0));
    }

    #[test]
    fn test_rect_normalizes_corners() {
        let mut arena = PointArena::new();
        let rect = Rectangle::new(&mut arena, Point::new(100.0, 100.0), Point::new(0.0, 0.0));
        let r = rect.as_rect(&arena);
        assert!((r.x0 - 0.0).abs() < f64::EPSILON);
        assert!((r.x1 - 100.0).abs() < f64::EPSILON);
    }
}
