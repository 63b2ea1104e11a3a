//! Path shape.

use super::{PointRole, ShapeId, ShapeStyle, ShapeTrait, point_to_polyline_dist};
use crate::arena::{PointArena, PointId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An open or closed polyline figure over an ordered point list. The point
/// set is structural (it can grow and shrink), so paths do not participate in
/// role-based point rewiring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    pub(crate) id: ShapeId,
    /// Ordered figure points.
    pub points: Vec<PointId>,
    pub closed: bool,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl Path {
    /// Create a new open path, allocating its points.
    pub fn new(arena: &mut PointArena, positions: Vec<Point>) -> Self {
        let id = Uuid::new_v4();
        let points = positions
            .into_iter()
            .map(|p| arena.insert_owned(p.x, p.y, id))
            .collect();
        Self {
            id,
            points,
            closed: false,
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    fn polyline(&self, arena: &PointArena) -> Vec<Point> {
        let mut pts: Vec<Point> = self.points.iter().map(|&id| arena.position(id)).collect();
        if self.closed && pts.len() > 2 {
            if let Some(&first) = pts.first() {
                pts.push(first);
            }
        }
        pts
    }
}

impl ShapeTrait for Path {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        for (i, &id) in self.points.iter().enumerate() {
            out.push((PointRole::PathPoint(i), id));
        }
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        let pts = self.polyline(arena);
        if pts.len() < 2 {
            return false;
        }
        point_to_polyline_dist(point, &pts) <= tolerance + self.style.stroke_width / 2.0
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
    fn test_open_path_hit() {
        let mut arena = PointArena::new();
        let path = Path::new(
            &mut arena,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 50.0),
            ],
        );
        assert!(path.hit_test(&arena, Point::new(25.0, 1.0), 3.0));
        assert!(!path.hit_test(&arena, Point::new(0.0, 50.0), 3.0));
    }

    #[test]
    fn test_closed_path_hits_closing_segment() {
        let mut arena = PointArena::new();
        let mut path = Path::new(
            &mut arena,
            vec![
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 50.0),
            ],
        );
        path.closed = true;
        // On the segment back to the first point
        assert!(path.hit_test(&arena, Point::new(25.0, 25.0), 3.0));
    }
}
