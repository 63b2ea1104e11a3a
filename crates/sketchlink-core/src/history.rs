//! Undo snapshots as explicit value types.
//!
//! The core never stores document state for undo; at gesture boundaries it
//! produces forward/inverse [`UndoOp`] pairs that the host's history service
//! can store, inspect, or serialize. Each op carries ids and deltas rather
//! than captured closures.

use crate::arena::{PointArena, PointId};
use crate::layer::Layer;
use crate::shapes::ShapeId;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A single undoable document edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum UndoOp {
    /// Translate a set of points (and, in shape-granularity move mode, the
    /// points of a set of shapes) by a delta.
    MoveBy {
        dx: f64,
        dy: f64,
        points: Vec<PointId>,
        shapes: Vec<ShapeId>,
    },
    /// Rewire one shape's point role from `old` to `new`.
    ReplacePoint {
        shape: ShapeId,
        old: PointId,
        new: PointId,
    },
    /// Set absolute positions for a set of points (scale/rotate gestures).
    SetPositions { moves: Vec<(PointId, Point)> },
}

impl UndoOp {
    /// Apply this op to the document.
    pub fn apply(&self, arena: &mut PointArena, layer: &mut Layer) {
        match self {
            UndoOp::MoveBy {
                dx,
                dy,
                points,
                shapes,
            } => {
                let mut moved: Vec<PointId> = points.clone();
                for &shape_id in shapes {
                    if let Some(shape) = layer.get(shape_id) {
                        for id in shape.point_ids() {
                            if !moved.contains(&id) {
                                moved.push(id);
                            }
                        }
                    }
                }
                for id in moved {
                    arena.translate(id, *dx, *dy);
                }
                layer.invalidate();
            }
            UndoOp::ReplacePoint { shape, old, new } => {
                layer.update_shape(*shape, |s| {
                    if let Err(err) = s.replace_point(*old, *new) {
                        log::warn!("undo rewire skipped: {err}");
                    }
                });
                layer.invalidate();
            }
            UndoOp::SetPositions { moves } => {
                for (id, position) in moves {
                    arena.set_position(*id, *position);
                }
                layer.invalidate();
            }
        }
    }

    /// The inverse of this op, when it is self-describing. `SetPositions`
    /// is not invertible without the prior coordinates, so snapshots pair it
    /// with an explicit before-image instead.
    pub fn inverse(&self) -> Option<UndoOp> {
        match self {
            UndoOp::MoveBy {
                dx,
                dy,
                points,
                shapes,
            } => Some(UndoOp::MoveBy {
                dx: -dx,
                dy: -dy,
                points: points.clone(),
                shapes: shapes.clone(),
            }),
            UndoOp::ReplacePoint { shape, old, new } => Some(UndoOp::ReplacePoint {
                shape: *shape,
                old: *new,
                new: *old,
            }),
            UndoOp::SetPositions { .. } => None,
        }
    }
}

/// A forward/inverse pair recorded at a gesture boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Restores the state before the gesture.
    pub undo: UndoOp,
    /// Re-applies the gesture.
    pub redo: UndoOp,
}

/// Recorder collecting snapshot pairs. Storage policy (limits, persistence)
/// belongs to the host.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a forward/inverse pair.
    pub fn snapshot(&mut self, undo: UndoOp, redo: UndoOp) {
        log::debug!("history snapshot: {redo:?}");
        self.entries.push(Snapshot { undo, redo });
    }

    /// Take the most recent snapshot off the log.
    pub fn pop(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    pub fn entries(&self) -> &[Snapshot] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
