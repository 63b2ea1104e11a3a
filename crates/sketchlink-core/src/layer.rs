//! Layer: a copy-on-write, z-ordered shape sequence.
//!
//! The shape sequence is deliberately immutable: every membership change
//! clones the vector and swaps the `Arc`. Readers holding the previous `Arc`
//! (a renderer mid-frame, an iterator in a handler) keep a consistent
//! snapshot, which is this core's substitute for locking. Point coordinates,
//! in contrast, are mutated in place in the point arena on every
//! pointer-move tick. That asymmetry is intentional:
//! sequence membership changes are rare and observable, coordinate changes
//! are hot and private to the event loop.

use crate::shapes::{Shape, ShapeId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A drawing layer holding shapes back-to-front.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    shapes: Arc<Vec<Shape>>,
    /// Bumped by [`Layer::invalidate`]; the sole repaint signal to the
    /// external renderer.
    #[serde(skip)]
    generation: u64,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self {
            shapes: Arc::new(Vec::new()),
            generation: 0,
        }
    }

    /// The current shape sequence snapshot, back-to-front.
    pub fn shapes(&self) -> &Arc<Vec<Shape>> {
        &self.shapes
    }

    /// Iterate front-to-back (hit-test priority order).
    pub fn shapes_rev(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().rev()
    }

    /// Append a shape on top. Copy-then-swap.
    pub fn add(&mut self, shape: Shape) {
        let mut next = (*self.shapes).clone();
        next.push(shape);
        self.shapes = Arc::new(next);
    }

    /// Remove a shape by id. Copy-then-swap; no-op for unknown ids.
    pub fn remove(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id() == id)?;
        let mut next = (*self.shapes).clone();
        let removed = next.remove(index);
        self.shapes = Arc::new(next);
        Some(removed)
    }

    /// Replace a shape in place in the z-order. Copy-then-swap; no-op for
    /// unknown ids.
    pub fn replace(&mut self, shape: Shape) {
        let Some(index) = self.shapes.iter().position(|s| s.id() == shape.id()) else {
            return;
        };
        let mut next = (*self.shapes).clone();
        next[index] = shape;
        self.shapes = Arc::new(next);
    }

    /// Run an edit against a shape, swapping in the edited copy.
    pub fn update_shape(&mut self, id: ShapeId, edit: impl FnOnce(&mut Shape)) {
        let Some(index) = self.shapes.iter().position(|s| s.id() == id) else {
            return;
        };
        let mut next = (*self.shapes).clone();
        edit(&mut next[index]);
        self.shapes = Arc::new(next);
    }

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    pub fn contains(&self, id: ShapeId) -> bool {
        self.shapes.iter().any(|s| s.id() == id)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Signal the external renderer that this layer needs repainting.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        log::trace!("layer invalidated (generation {})", self.generation);
    }

    /// Monotonic repaint-signal counter.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
