//! Ellipse shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait};
use crate::arena::{PointArena, PointId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ellipse inscribed in the rectangle spanned by its two corner points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ellipse {
    pub(crate) id: ShapeId,
    pub top_left: PointId,
    pub bottom_right: PointId,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl Ellipse {
    /// Create a new ellipse from its bounding corners.
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

    /// Create an ellipse over existing arena points.
    pub fn with_points(top_left: PointId, bottom_right: PointId) -> Self {
        Self {
            id: Uuid::new_v4(),
            top_left,
            bottom_right,
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    fn as_rect(&self, arena: &PointArena) -> Rect {
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

impl ShapeTrait for Ellipse {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        out.push((PointRole::TopLeft, self.top_left));
        out.push((PointRole::BottomRight, self.bottom_right));
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect(arena);
        let center = rect.center();
        let half_sw = self.style.stroke_width / 2.0;
        let rx = rect.width() / 2.0;
        let ry = rect.height() / 2.0;
        let dx_outer = (point.x - center.x) / (rx + tolerance + half_sw).max(f64::EPSILON);
        let dy_outer = (point.y - center.y) / (ry + tolerance + half_sw).max(f64::EPSILON);
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        if self.style.fill.is_some() {
            return true;
        }
        // Outline only: reject if inside the inner ellipse
        let inner_rx = (rx - tolerance - half_sw).max(0.0);
        let inner_ry = (ry - tolerance - half_sw).max(0.0);
        if inner_rx <= 0.0 || inner_ry <= 0.0 {
            return true;
        }
        let dx_inner = (point.x - center.x) / inner_rx;
        let dy_inner = (point.y - center.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner >= 1.0
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
        let ellipse = Ellipse::new(&mut arena, Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        // On the rim
        assert!(ellipse.hit_test(&arena, Point::new(100.0, 25.0), 2.0));
        // Center of an unfilled ellipse is a miss
        assert!(!ellipse.hit_test(&arena, Point::new(50.0, 25.0), 2.0));
    }

    #[test]
    fn test_outside_miss() {
        let mut arena = PointArena::new();
        let ellipse = Ellipse::new(&mut arena, Point::new(0.0, 0.0), Point::new(100.0, 50.0));
        assert!(!ellipse.hit_test(&arena, Point::new(120.0, 60.0), 2.0));
    }
}
