//! Elliptical arc shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait};
use crate::arena::{PointArena, PointId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An elliptical arc defined by four control points: one and two span the
/// bounding rectangle, three and four mark the start and end of the sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Arc {
    pub(crate) id: ShapeId,
    pub point1: PointId,
    pub point2: PointId,
    pub point3: PointId,
    pub point4: PointId,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl Arc {
    /// Create a new arc, allocating its control points.
    pub fn new(arena: &mut PointArena, p1: Point, p2: Point, p3: Point, p4: Point) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            point1: arena.insert_owned(p1.x, p1.y, id),
            point2: arena.insert_owned(p2.x, p2.y, id),
            point3: arena.insert_owned(p3.x, p3.y, id),
            point4: arena.insert_owned(p4.x, p4.y, id),
            locked: false,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeTrait for Arc {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        out.push((PointRole::One, self.point1));
        out.push((PointRole::Two, self.point2));
        out.push((PointRole::Three, self.point3));
        out.push((PointRole::Four, self.point4));
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        // Hit on the bounding rectangle ring; the exact sweep is a render
        // concern.
        let bounds = self.bounds(arena);
        let outer = bounds.inflate(tolerance, tolerance);
        let inset = tolerance
            .min(bounds.width() / 2.0)
            .min(bounds.height() / 2.0);
        let inner = bounds.inflate(-inset, -inset);
        outer.contains(point) && !inner.contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
