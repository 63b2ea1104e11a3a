//! Shared point store.
//!
//! Every control point in a document lives in one [`PointArena`] and is
//! addressed by a stable integer [`PointId`]. Shapes hold ids, not
//! coordinates; two shapes holding the same id are topologically connected
//! through that point. Coordinates are mutated in place during drags — the
//! core is single-threaded and event-driven, so this is safe, unlike the
//! shape sequence which is copy-on-write (see [`crate::layer::Layer`]).

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::shapes::ShapeId;

/// Stable handle addressing a point in the arena.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PointId(pub u32);

/// A 2D control point, potentially shared by several shapes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointNode {
    pub x: f64,
    pub y: f64,
    /// The shape that created this point, if any.
    pub owner: Option<ShapeId>,
    /// Connector points are attachment sites exposed by a shape (typically a
    /// group); they are only movable when their owning shape is dragged.
    pub connector: bool,
}

impl PointNode {
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Arena of shared points. Insertion-ordered; a node stays valid for as long
/// as any shape references its id. Removal is explicit and reserved for
/// points the caller knows are unreferenced (tool chrome teardown); document
/// points abandoned by rewiring simply go unreferenced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PointArena {
    nodes: BTreeMap<PointId, PointNode>,
    next: u32,
}

impl PointArena {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an unowned point.
    pub fn insert(&mut self, x: f64, y: f64) -> PointId {
        self.insert_node(PointNode {
            x,
            y,
            owner: None,
            connector: false,
        })
    }

    /// Insert a point owned by a shape.
    pub fn insert_owned(&mut self, x: f64, y: f64, owner: ShapeId) -> PointId {
        self.insert_node(PointNode {
            x,
            y,
            owner: Some(owner),
            connector: false,
        })
    }

    fn insert_node(&mut self, node: PointNode) -> PointId {
        let id = PointId(self.next);
        self.next += 1;
        self.nodes.insert(id, node);
        id
    }

    pub fn get(&self, id: PointId) -> Option<&PointNode> {
        self.nodes.get(&id)
    }

    pub fn get_mut(&mut self, id: PointId) -> Option<&mut PointNode> {
        self.nodes.get_mut(&id)
    }

    /// Coordinates of a point, `Point::ZERO` for a dangling id.
    pub fn position(&self, id: PointId) -> Point {
        self.nodes.get(&id).map(PointNode::position).unwrap_or(Point::ZERO)
    }

    pub fn set_position(&mut self, id: PointId, position: Point) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.x = position.x;
            node.y = position.y;
        }
    }

    /// Move a point by a delta, in place.
    pub fn translate(&mut self, id: PointId, dx: f64, dy: f64) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.x += dx;
            node.y += dy;
        }
    }

    /// Duplicate a point at the same coordinates with a new owner. Used when
    /// splitting a joint: the clone starts life referenced by exactly one
    /// shape.
    pub fn clone_point(&mut self, id: PointId, owner: Option<ShapeId>) -> PointId {
        let node = match self.nodes.get(&id) {
            Some(node) => PointNode {
                x: node.x,
                y: node.y,
                owner,
                connector: node.connector,
            },
            None => PointNode {
                x: 0.0,
                y: 0.0,
                owner,
                connector: false,
            },
        };
        self.insert_node(node)
    }

    /// Remove a point. The caller owns the invariant that no shape still
    /// references the id.
    pub fn remove(&mut self, id: PointId) -> Option<PointNode> {
        self.nodes.remove(&id)
    }

    /// Mark a point as a connector attachment site.
    pub fn set_connector(&mut self, id: PointId, connector: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.connector = connector;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
