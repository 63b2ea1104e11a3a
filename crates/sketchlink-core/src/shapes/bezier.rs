//! Cubic and quadratic bezier shapes.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use crate::arena::{PointArena, PointId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flattening resolution for hit tests.
const FLATTEN_STEPS: usize = 16;

/// A cubic bezier: endpoints one/four, control points two/three.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubicBezier {
    pub(crate) id: ShapeId,
    pub point1: PointId,
    pub point2: PointId,
    pub point3: PointId,
    pub point4: PointId,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl CubicBezier {
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

    fn flatten(&self, arena: &PointArena) -> Vec<Point> {
        let p1 = arena.position(self.point1);
        let p2 = arena.position(self.point2);
        let p3 = arena.position(self.point3);
        let p4 = arena.position(self.point4);
        (0..=FLATTEN_STEPS)
            .map(|i| {
                let t = i as f64 / FLATTEN_STEPS as f64;
                let mt = 1.0 - t;
                let a = mt * mt * mt;
                let b = 3.0 * mt * mt * t;
                let c = 3.0 * mt * t * t;
                let d = t * t * t;
                Point::new(
                    a * p1.x + b * p2.x + c * p3.x + d * p4.x,
                    a * p1.y + b * p2.y + c * p3.y + d * p4.y,
                )
            })
            .collect()
    }
}

impl ShapeTrait for CubicBezier {
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
        let pts = self.flatten(arena);
        point_to_polyline_dist(point, &pts) <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}

/// A quadratic bezier: endpoints one/three, control point two.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadraticBezier {
    pub(crate) id: ShapeId,
    pub point1: PointId,
    pub point2: PointId,
    pub point3: PointId,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl QuadraticBezier {
    pub fn new(arena: &mut PointArena, p1: Point, p2: Point, p3: Point) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            point1: arena.insert_owned(p1.x, p1.y, id),
            point2: arena.insert_owned(p2.x, p2.y, id),
            point3: arena.insert_owned(p3.x, p3.y, id),
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    fn flatten(&self, arena: &PointArena) -> Vec<Point> {
        let p1 = arena.position(self.point1);
        let p2 = arena.position(self.point2);
        let p3 = arena.position(self.point3);
        (0..=FLATTEN_STEPS)
            .map(|i| {
                let t = i as f64 / FLATTEN_STEPS as f64;
                let mt = 1.0 - t;
                let a = mt * mt;
                let b = 2.0 * mt * t;
                let c = t * t;
                Point::new(
                    a * p1.x + b * p2.x + c * p3.x,
                    a * p1.y + b * p2.y + c * p3.y,
                )
            })
            .collect()
    }
}

impl ShapeTrait for QuadraticBezier {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        out.push((PointRole::One, self.point1));
        out.push((PointRole::Two, self.point2));
        out.push((PointRole::Three, self.point3));
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        let pts = self.flatten(arena);
        point_to_polyline_dist(point, &pts) <= tolerance + self.style.stroke_width / 2.0
    }

    fn style(&self) -> &ShapeStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ShapeStyle {
        &mut self.style
    }
}
