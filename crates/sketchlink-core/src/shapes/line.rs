//! Line shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait, point_to_segment_dist};
use crate::arena::{PointArena, PointId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line segment between two shared points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub(crate) id: ShapeId,
    /// Start point.
    pub start: PointId,
    /// End point.
    pub end: PointId,
    pub locked: bool,
    /// Style properties.
    pub style: ShapeStyle,
}

impl Line {
    /// Create a new line, allocating both endpoints in the arena.
    pub fn new(arena: &mut PointArena, start: Point, end: Point) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            start: arena.insert_owned(start.x, start.y, id),
            end: arena.insert_owned(end.x, end.y, id),
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    /// Create a line over existing arena points. This is how joints are
    /// built: pass the same id another shape already holds.
    pub fn with_points(start: PointId, end: PointId) -> Self {
        Self {
            id: Uuid::new_v4(),
            start,
            end,
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    /// Length of the segment.
    pub fn length(&self, arena: &PointArena) -> f64 {
        let a = arena.position(self.start);
        let b = arena.position(self.end);
        ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt()
    }
}

impl ShapeTrait for Line {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        out.push((PointRole::Start, self.start));
        out.push((PointRole::End, self.end));
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        let a = arena.position(self.start);
        let b = arena.position(self.end);
        point_to_segment_dist(point, a, b) <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
