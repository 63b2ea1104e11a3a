//! Grid snapping.

use kurbo::Point;

/// Default grid pitch in model units.
pub const GRID_SIZE: f64 = 20.0;

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}
