//! Image shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait};
use crate::arena::{PointArena, PointId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An image placed inside the rectangle spanned by its corner points. The
/// pixel payload lives behind `source_key` in an external store; this core
/// only tracks geometry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub(crate) id: ShapeId,
    pub top_left: PointId,
    pub bottom_right: PointId,
    /// Key resolving to the image payload in the host's asset store.
    pub source_key: String,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl Image {
    /// Create a new image placement.
    pub fn new(
        arena: &mut PointArena,
        top_left: Point,
        bottom_right: Point,
        source_key: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            top_left: arena.insert_owned(top_left.x, top_left.y, id),
            bottom_right: arena.insert_owned(bottom_right.x, bottom_right.y, id),
            source_key: source_key.into(),
            locked: false,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeTrait for Image {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        out.push((PointRole::TopLeft, self.top_left));
        out.push((PointRole::BottomRight, self.bottom_right));
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        let tl = arena.position(self.top_left);
        let br = arena.position(self.bottom_right);
        let rect = Rect::new(
            tl.x.min(br.x),
            tl.y.min(br.y),
            tl.x.max(br.x),
            tl.y.max(br.y),
        );
        rect.inflate(tolerance, tolerance).contains(point)
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
