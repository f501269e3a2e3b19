//! Snap-to-grid quantization.

use crate::model::{GridSettings, WindowRect};

/// Rounds `value` to the nearest multiple of `grid_size`, halves rounding towards positive
/// infinity. A non-positive grid size leaves the value untouched.
pub fn snap_to_grid(value: i32, grid_size: i32) -> i32 {
    if grid_size <= 0 {
        return value;
    }
    let shifted = value.saturating_add(grid_size / 2);
    shifted.div_euclid(grid_size).saturating_mul(grid_size)
}

/// Snaps a single value when the grid is enabled.
pub fn snap_value(grid: GridSettings, value: i32) -> i32 {
    if grid.snap_enabled {
        snap_to_grid(value, grid.grid_size)
    } else {
        value
    }
}

/// Snaps every component of `rect` when the grid is enabled.
pub fn snap_rect(grid: GridSettings, rect: WindowRect) -> WindowRect {
    WindowRect {
        x: snap_value(grid, rect.x),
        y: snap_value(grid, rect.y),
        width: snap_value(grid, rect.width),
        height: snap_value(grid, rect.height),
    }
}
