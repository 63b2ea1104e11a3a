//! Editor configuration.
//!
//! Everything the handlers used to look up ambiently is explicit here and
//! passed through the [`Editor`](crate::editor::Editor) context.

use serde::{Deserialize, Serialize};

/// Granularity of a move gesture's cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveMode {
    /// Snapshot the movable points of the selection.
    #[default]
    Point,
    /// Snapshot the selected shapes; their points are resolved per tick.
    Shape,
}

/// Editor-wide options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Pointer hit threshold in screen pixels; divided by zoom for model
    /// space.
    pub hit_threshold: f64,
    /// Current view zoom factor.
    pub zoom: f64,
    /// Move-gesture cache granularity.
    pub move_mode: MoveMode,
    /// Snap pointer positions to the grid.
    pub snap_to_grid: bool,
    /// Grid pitch in model units.
    pub grid_size: f64,
    /// Whether shape control points are drawn. The decorator snapshots and
    /// suppresses this flag while its handles are visible.
    pub show_points: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            hit_threshold: 7.0,
            zoom: 1.0,
            move_mode: MoveMode::default(),
            snap_to_grid: false,
            grid_size: crate::snap::GRID_SIZE,
            show_points: true,
        }
    }
}

impl Options {
    /// Hit radius in model units, compensated for zoom.
    pub fn hit_radius(&self) -> f64 {
        self.hit_threshold / self.zoom.max(f64::EPSILON)
    }
}
