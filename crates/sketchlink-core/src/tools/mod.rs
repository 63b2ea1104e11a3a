//! Interactive tools.

mod select;

pub use select::{DragKind, SelectionTool, ToolState};
