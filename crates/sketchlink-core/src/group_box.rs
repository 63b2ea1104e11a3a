//! Aggregate bounds and transforms over a set of shapes.
//!
//! A `GroupBox` caches the movable points of a shape set plus their
//! axis-aligned bounds, then applies translate, per-edge scale and rotate
//! directly to the arena. Edge scales classify points against the bounds
//! captured before the tick, so a corner point responds to both of a
//! composed pair of edge scales.

use crate::arena::{PointArena, PointId};
use crate::shapes::{bounds_of, Shape};
use kurbo::{Point, Rect};

/// Tolerance for classifying a point as lying on a bounds edge.
const EDGE_EPSILON: f64 = 1e-9;

/// Movable-point cache and bounds for a dragged shape set.
#[derive(Debug, Clone)]
pub struct GroupBox {
    bounds: Rect,
    points: Vec<PointId>,
}

impl GroupBox {
    /// Build the cache from a shape set (normally the selection).
    ///
    /// A point is movable unless its shape is locked, or it is a connector
    /// owned by a shape outside the set. A joint shared by several shapes in
    /// the set appears once.
    pub fn new(arena: &PointArena, shapes: &[Shape]) -> Self {
        let points = collect_movable(arena, shapes);
        let bounds = bounds_of(arena, points.iter().copied());
        Self { bounds, points }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The cached movable points.
    pub fn points(&self) -> &[PointId] {
        &self.points
    }

    /// Refresh after an edit. With `rebuild` the movable cache is recomputed
    /// from `shapes` (membership may have changed); otherwise only the
    /// bounds are recomputed from the existing cache.
    pub fn update(&mut self, arena: &PointArena, shapes: &[Shape], rebuild: bool) {
        if rebuild {
            self.points = collect_movable(arena, shapes);
        }
        self.bounds = bounds_of(arena, self.points.iter().copied());
    }

    /// Translate every cached point.
    pub fn translate(&self, arena: &mut PointArena, dx: f64, dy: f64) {
        for &id in &self.points {
            arena.translate(id, dx, dy);
        }
    }

    /// Move points on the left edge of the captured bounds by `dx`.
    pub fn scale_left(&self, arena: &mut PointArena, dx: f64) {
        for &id in &self.points {
            if (arena.position(id).x - self.bounds.x0).abs() < EDGE_EPSILON {
                arena.translate(id, dx, 0.0);
            }
        }
    }

    /// Move points on the right edge of the captured bounds by `dx`.
    pub fn scale_right(&self, arena: &mut PointArena, dx: f64) {
        for &id in &self.points {
            if (arena.position(id).x - self.bounds.x1).abs() < EDGE_EPSILON {
                arena.translate(id, dx, 0.0);
            }
        }
    }

    /// Move points on the top edge of the captured bounds by `dy`.
    pub fn scale_top(&self, arena: &mut PointArena, dy: f64) {
        for &id in &self.points {
            if (arena.position(id).y - self.bounds.y0).abs() < EDGE_EPSILON {
                arena.translate(id, 0.0, dy);
            }
        }
    }

    /// Move points on the bottom edge of the captured bounds by `dy`.
    pub fn scale_bottom(&self, arena: &mut PointArena, dy: f64) {
        for &id in &self.points {
            if (arena.position(id).y - self.bounds.y1).abs() < EDGE_EPSILON {
                arena.translate(id, 0.0, dy);
            }
        }
    }

    /// Rotate the cached points around the bounds center, tracking the
    /// pointer angle in `accumulator` (degrees). The first tick of a gesture
    /// only records the reference angle and moves nothing; `None` is the
    /// gesture-start sentinel.
    pub fn rotate(&self, arena: &mut PointArena, x: f64, y: f64, accumulator: &mut Option<f64>) {
        let center = self.bounds.center();
        let angle = (y - center.y).atan2(x - center.x).to_degrees();
        let Some(previous) = *accumulator else {
            *accumulator = Some(angle);
            return;
        };
        let delta = (angle - previous).to_radians();
        Self::rotate_points(arena, center, delta, &self.points);
        *accumulator = Some(angle);
    }

    /// Rotate a point set around a center by an angle in radians.
    pub fn rotate_points(arena: &mut PointArena, center: Point, radians: f64, points: &[PointId]) {
        let (sin, cos) = radians.sin_cos();
        for &id in points {
            let p = arena.position(id);
            let dx = p.x - center.x;
            let dy = p.y - center.y;
            arena.set_position(
                id,
                Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos),
            );
        }
    }
}

fn collect_movable(arena: &PointArena, shapes: &[Shape]) -> Vec<PointId> {
    let set_ids: Vec<_> = shapes.iter().map(Shape::id).collect();
    let mut points = Vec::new();
    for shape in shapes {
        if shape.locked() {
            continue;
        }
        for id in shape.point_ids() {
            if let Some(node) = arena.get(id) {
                let foreign_connector =
                    node.connector && !node.owner.is_some_and(|owner| set_ids.contains(&owner));
                if foreign_connector {
                    continue;
                }
            }
            if !points.contains(&id) {
                points.push(id);
            }
        }
    }
    points
}
