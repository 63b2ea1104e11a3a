//! Text shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait};
use crate::arena::{PointArena, PointId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A text block laid out inside the rectangle spanned by its corner points.
/// Layout and glyph rendering are a renderer concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub(crate) id: ShapeId,
    pub top_left: PointId,
    pub bottom_right: PointId,
    /// Text content.
    pub content: String,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl Text {
    /// Create a new text block.
    pub fn new(
        arena: &mut PointArena,
        top_left: Point,
        bottom_right: Point,
        content: impl Into<String>,
    ) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            top_left: arena.insert_owned(top_left.x, top_left.y, id),
            bottom_right: arena.insert_owned(bottom_right.x, bottom_right.y, id),
            content: content.into(),
            locked: false,
            style: ShapeStyle::default(),
        }
    }
}

impl ShapeTrait for Text {
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
