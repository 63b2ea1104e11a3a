//! SketchLink Core Library
//!
//! Platform-agnostic model and interaction logic for the SketchLink diagram
//! editor: shapes over a shared point arena, selection and transform
//! gestures, and connection-graph maintenance.

pub mod arena;
pub mod connection;
pub mod decorator;
pub mod editor;
pub mod group_box;
pub mod history;
pub mod input;
pub mod layer;
pub mod options;
pub mod shapes;
pub mod snap;
pub mod tools;

pub use arena::{PointArena, PointId, PointNode};
pub use connection::{disconnect_selection_points, try_connect_moved_points, usage_index};
pub use decorator::{BoxDecorator, Mode, SIZE_LARGE, SIZE_SMALL};
pub use editor::Editor;
pub use group_box::GroupBox;
pub use history::{History, Snapshot, UndoOp};
pub use hit_test::{shapes_in_rect, try_to_get_point, try_to_get_shape};
pub use input::{InputArgs, Modifiers, PointerEvent};
pub use layer::Layer;
pub use options::{MoveMode, Options};
pub use shapes::{Shape, ShapeError, ShapeId, ShapeStyle, ShapeTrait};
pub use snap::{snap_to_grid, GRID_SIZE};
pub use tools::{DragKind, SelectionTool, ToolState};
