//! Standalone point shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait};
use crate::arena::{PointArena, PointId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point exposed as a shape of its own. Clicking one resolves to its
/// owning shape during selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointShape {
    pub(crate) id: ShapeId,
    pub point: PointId,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl PointShape {
    /// Create a new point shape, allocating its point in the arena.
    pub fn new(arena: &mut PointArena, position: Point) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            point: arena.insert_owned(position.x, position.y, id),
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    /// Wrap an existing arena point.
    pub fn with_point(point: PointId) -> Self {
        Self {
            id: Uuid::new_v4(),
            point,
            locked: false,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeTrait for PointShape {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        out.push((PointRole::Point, self.point));
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        let p = arena.position(self.point);
        let dx = point.x - p.x;
        let dy = point.y - p.y;
        dx * dx + dy * dy <= tolerance * tolerance
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
