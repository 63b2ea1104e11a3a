//! Shape definitions for the diagram editor.
//!
//! Shapes are a closed tagged variant. Each variant holds named point roles
//! as [`PointId`] handles into the shared [`PointArena`]; geometry queries
//! therefore take the arena as a parameter. Point-role rewiring
//! ([`Shape::replace_point`]) is how the connection graph merges and splits
//! joints.

mod arc;
mod bezier;
mod ellipse;
mod group;
mod image;
mod line;
mod path;
mod point;
mod rectangle;
mod text;

pub use arc::Arc;
pub use bezier::{CubicBezier, QuadraticBezier};
pub use ellipse::Ellipse;
pub use group::Group;
pub use image::Image;
pub use line::Line;
pub use path::Path;
pub use point::PointShape;
pub use rectangle::Rectangle;
pub use text::Text;

use crate::arena::{PointArena, PointId};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for shapes.
pub type ShapeId = Uuid;

/// Serializable stroke/fill color (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

/// Minimal style carried by every shape. Rendering is out of scope for this
/// crate; the style exists so overlay handles can flip to a selected variant
/// and the data model round-trips.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeStyle {
    pub stroke: Rgba,
    pub stroke_width: f64,
    pub fill: Option<Rgba>,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            stroke: Rgba::black(),
            stroke_width: 2.0,
            fill: None,
        }
    }
}

/// The role a point plays on its shape. Role identity is stable: which
/// [`PointId`] fills a role can change (rewiring), which roles exist cannot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointRole {
    /// The single point of a point shape.
    Point,
    Start,
    End,
    /// Numbered points of arcs and beziers.
    One,
    Two,
    Three,
    Four,
    TopLeft,
    BottomRight,
    /// Ordered point of a path figure.
    PathPoint(usize),
    /// Connector attachment site on a group.
    Connector(usize),
}

/// Errors raised by shape operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShapeError {
    /// Point-role rewiring hit a variant whose point set is structural rather
    /// than role-addressed. Silently skipping it would corrupt the connection
    /// graph, so this is the one non-recoverable failure in the core.
    #[error("shape variant `{0}` does not support point-role rewiring")]
    UnsupportedVariant(&'static str),
}

/// Common interface implemented by every shape variant.
pub trait ShapeTrait {
    /// Get the unique identifier.
    fn id(&self) -> ShapeId;

    /// Append this shape's (role, point) pairs in role order.
    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>);

    /// Axis-aligned bounding box over the shape's points.
    fn bounds(&self, arena: &PointArena) -> Rect {
        let mut points = Vec::new();
        self.collect_points(&mut points);
        bounds_of(arena, points.iter().map(|(_, id)| *id))
    }

    /// Check if a point (in world coordinates) hits this shape.
    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool;

    /// Get the style.
    fn style(&self) -> &ShapeStyle;

    /// Get mutable style.
    fn style_mut(&mut self) -> &mut ShapeStyle;
}

/// Enum wrapper for all shape variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Shape {
    Point(PointShape),
    Line(Line),
    Arc(Arc),
    CubicBezier(CubicBezier),
    QuadraticBezier(QuadraticBezier),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Text(Text),
    Image(Image),
    Path(Path),
    Group(Group),
}

macro_rules! for_each_variant {
    ($self:expr, $s:ident => $body:expr) => {
        match $self {
            Shape::Point($s) => $body,
            Shape::Line($s) => $body,
            Shape::Arc($s) => $body,
            Shape::CubicBezier($s) => $body,
            Shape::QuadraticBezier($s) => $body,
            Shape::Rectangle($s) => $body,
            Shape::Ellipse($s) => $body,
            Shape::Text($s) => $body,
            Shape::Image($s) => $body,
            Shape::Path($s) => $body,
            Shape::Group($s) => $body,
        }
    };
}

impl Shape {
    pub fn id(&self) -> ShapeId {
        for_each_variant!(self, s => s.id())
    }

    /// Human-readable variant name, used in errors and logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Shape::Point(_) => "point",
            Shape::Line(_) => "line",
            Shape::Arc(_) => "arc",
            Shape::CubicBezier(_) => "cubic-bezier",
            Shape::QuadraticBezier(_) => "quadratic-bezier",
            Shape::Rectangle(_) => "rectangle",
            Shape::Ellipse(_) => "ellipse",
            Shape::Text(_) => "text",
            Shape::Image(_) => "image",
            Shape::Path(_) => "path",
            Shape::Group(_) => "group",
        }
    }

    /// Ordered (role, point) pairs, recursive for groups.
    pub fn points(&self) -> Vec<(PointRole, PointId)> {
        let mut out = Vec::new();
        for_each_variant!(self, s => s.collect_points(&mut out));
        out
    }

    /// Point ids of this shape, deduplicated, in role order.
    pub fn point_ids(&self) -> Vec<PointId> {
        let mut ids = Vec::new();
        for (_, id) in self.points() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    pub fn bounds(&self, arena: &PointArena) -> Rect {
        for_each_variant!(self, s => s.bounds(arena))
    }

    pub fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        for_each_variant!(self, s => s.hit_test(arena, point, tolerance))
    }

    pub fn style(&self) -> &ShapeStyle {
        for_each_variant!(self, s => s.style())
    }

    pub fn style_mut(&mut self) -> &mut ShapeStyle {
        for_each_variant!(self, s => s.style_mut())
    }

    /// Whether the shape is locked against editing.
    pub fn locked(&self) -> bool {
        for_each_variant!(self, s => s.locked)
    }

    pub fn set_locked(&mut self, locked: bool) {
        for_each_variant!(self, s => s.locked = locked);
    }

    /// Rewire every role currently holding `old` to hold `new` instead.
    ///
    /// Returns `Ok(false)` without touching the shape when `old == new`
    /// (a rewrite onto itself would create a self-loop) or when no role
    /// holds `old`. Variants whose point sets are structural rather than
    /// role-addressed (`Path`, `Group`) raise
    /// [`ShapeError::UnsupportedVariant`].
    pub fn replace_point(&mut self, old: PointId, new: PointId) -> Result<bool, ShapeError> {
        if old == new {
            return Ok(false);
        }
        let replaced = match self {
            Shape::Point(s) => replace_roles(&mut [&mut s.point], old, new),
            Shape::Line(s) => replace_roles(&mut [&mut s.start, &mut s.end], old, new),
            Shape::Arc(s) => replace_roles(
                &mut [&mut s.point1, &mut s.point2, &mut s.point3, &mut s.point4],
                old,
                new,
            ),
            Shape::CubicBezier(s) => replace_roles(
                &mut [&mut s.point1, &mut s.point2, &mut s.point3, &mut s.point4],
                old,
                new,
            ),
            Shape::QuadraticBezier(s) => {
                replace_roles(&mut [&mut s.point1, &mut s.point2, &mut s.point3], old, new)
            }
            Shape::Rectangle(s) => {
                replace_roles(&mut [&mut s.top_left, &mut s.bottom_right], old, new)
            }
            Shape::Ellipse(s) => {
                replace_roles(&mut [&mut s.top_left, &mut s.bottom_right], old, new)
            }
            Shape::Text(s) => replace_roles(&mut [&mut s.top_left, &mut s.bottom_right], old, new),
            Shape::Image(s) => replace_roles(&mut [&mut s.top_left, &mut s.bottom_right], old, new),
            Shape::Path(_) | Shape::Group(_) => {
                return Err(ShapeError::UnsupportedVariant(self.kind_name()));
            }
        };
        Ok(replaced)
    }

    /// Whether `rect` intersects this shape. Open shapes (lines, beziers,
    /// paths) test their segments against the rectangle; closed shapes test
    /// their bounding box.
    pub fn intersects_rect(&self, arena: &PointArena, rect: Rect) -> bool {
        match self {
            Shape::Point(s) => rect.contains(arena.position(s.point)),
            Shape::Line(s) => polyline_intersects_rect(
                &[arena.position(s.start), arena.position(s.end)],
                rect,
            ),
            Shape::Path(s) => {
                let pts: Vec<Point> = s.points.iter().map(|&id| arena.position(id)).collect();
                polyline_intersects_rect(&pts, rect)
            }
            Shape::Group(g) => g.shapes.iter().any(|c| c.intersects_rect(arena, rect)),
            _ => {
                let bounds = self.bounds(arena);
                !rect.intersect(bounds).is_zero_area() || rect.contains(bounds.center())
            }
        }
    }
}

fn replace_roles(roles: &mut [&mut PointId], old: PointId, new: PointId) -> bool {
    let mut replaced = false;
    for role in roles {
        if **role == old {
            **role = new;
            replaced = true;
        }
    }
    replaced
}

/// Axis-aligned min/max bounds over a set of arena points.
pub fn bounds_of(arena: &PointArena, ids: impl Iterator<Item = PointId>) -> Rect {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    let mut any = false;
    for id in ids {
        let p = arena.position(id);
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
        any = true;
    }
    if any {
        Rect::new(min_x, min_y, max_x, max_y)
    } else {
        Rect::ZERO
    }
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Test if any polyline segment intersects or is inside a rectangle.
pub fn polyline_intersects_rect(points: &[Point], rect: Rect) -> bool {
    if points.iter().any(|p| rect.contains(*p)) {
        return true;
    }
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let edges = [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ];
    for w in points.windows(2) {
        for &(c, d) in &edges {
            if segments_intersect(w[0], w[1], c, d) {
                return true;
            }
        }
    }
    false
}

/// Test if two line segments (a-b) and (c-d) intersect.
fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let cross =
        |o: Point, p: Point, q: Point| (p.x - o.x) * (q.y - o.y) - (p.y - o.y) * (q.x - o.x);
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);
    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }
    // Collinear cases: check if an endpoint lies on the other segment
    let on_segment = |p: Point, q: Point, r: Point| {
        r.x >= p.x.min(q.x) && r.x <= p.x.max(q.x) && r.y >= p.y.min(q.y) && r.y <= p.y.max(q.y)
    };
    (d1.abs() < 1e-10 && on_segment(c, d, a))
        || (d2.abs() < 1e-10 && on_segment(c, d, b))
        || (d3.abs() < 1e-10 && on_segment(a, b, c))
        || (d4.abs() < 1e-10 && on_segment(a, b, d))
}
