//! Group shape for combining multiple shapes.

use super::{PointRole, Shape, ShapeId, ShapeStyle, ShapeTrait};
use crate::arena::{PointArena, PointId};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A group of shapes manipulated as a single unit. Groups can contain other
/// groups. A group may expose connector points: attachment sites other
/// shapes link to, movable only when the group itself is dragged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub(crate) id: ShapeId,
    /// Child shapes in this group.
    pub shapes: Vec<Shape>,
    /// Connector attachment points owned by this group.
    pub connectors: Vec<PointId>,
    pub locked: bool,
    pub style: ShapeStyle,
}

impl Group {
    /// Create a new group from a list of shapes.
    pub fn new(shapes: Vec<Shape>) -> Self {
        Self {
            id: Uuid::new_v4(),
            shapes,
            connectors: Vec::new(),
            locked: false,
            style: ShapeStyle::default(),
        }
    }

    /// Add a connector point at a position, marking it in the arena.
    pub fn add_connector(&mut self, arena: &mut PointArena, position: Point) -> PointId {
        let point = arena.insert_owned(position.x, position.y, self.id);
        arena.set_connector(point, true);
        self.connectors.push(point);
        point
    }

    /// Dissolve this group and return its children.
    pub fn ungroup(self) -> Vec<Shape> {
        self.shapes
    }

    /// Whether a shape (at any nesting depth) belongs to this group.
    pub fn contains_shape(&self, id: ShapeId) -> bool {
        self.shapes.iter().any(|child| {
            child.id() == id
                || matches!(child, Shape::Group(g) if g.contains_shape(id))
        })
    }
}

impl ShapeTrait for Group {
    fn id(&self) -> ShapeId {
        self.id
    }

    fn collect_points(&self, out: &mut Vec<(PointRole, PointId)>) {
        for child in &self.shapes {
            for pair in child.points() {
                out.push(pair);
            }
        }
        for (i, &point) in self.connectors.iter().enumerate() {
            out.push((PointRole::Connector(i), point));
        }
    }

    fn hit_test(&self, arena: &PointArena, point: Point, tolerance: f64) -> bool {
        self.shapes
            .iter()
            .any(|child| child.hit_test(arena, point, tolerance))
            || self.connectors.iter().any(|&id| {
                let p = arena.position(id);
                let dx = point.x - p.x;
                let dy = point.y - p.y;
                dx * dx + dy * dy <= tolerance * tolerance
            })
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
    use crate::shapes::Line;

    #[test]
    fn test_group_collects_child_points() {
        let mut arena = PointArena::new();
        let a = Line::new(&mut arena, Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        let b = Line::new(&mut arena, Point::new(10.0, 0.0), Point::new(10.0, 10.0));
        let group = Group::new(vec![Shape::Line(a), Shape::Line(b)]);
        let mut points = Vec::new();
        group.collect_points(&mut points);
        assert_eq!(points.len(), 4);
    }

    #[test]
    fn test_contains_nested_shape() {
        let mut arena = PointArena::new();
        let inner_line = Line::new(&mut arena, Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        let inner_id = inner_line.id();
        let inner = Group::new(vec![Shape::Line(inner_line)]);
        let outer = Group::new(vec![Shape::Group(inner)]);
        assert!(outer.contains_shape(inner_id));
    }

    #[test]
    fn test_connector_is_flagged() {
        let mut arena = PointArena::new();
        let mut group = Group::new(Vec::new());
        let point = group.add_connector(&mut arena, Point::new(5.0, 5.0));
        assert!(arena.get(point).unwrap().connector);
        assert_eq!(arena.get(point).unwrap().owner, Some(group.id()));
    }
}
