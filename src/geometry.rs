//! Position and cell-side math shared by the map, the raycaster and the renderer.
//!
//! All pixel coordinates use the screen convention: x grows right, y grows
//! down, angles are measured from the positive x axis with 90 degrees
//! pointing down the screen.

use crate::direction::Direction;

/// Split an absolute position into the cell it's in and its fractional
/// position within that cell, each axis in [0, 1).
///
/// Floor-division semantics: positions left or above the origin floor
/// toward negative infinity, and a position exactly on a cell boundary
/// belongs to the cell on the positive side.
pub fn split_position(position: (f32, f32), square_size: f32) -> ((i32, i32), (f32, f32)) {
    let cell_x = (position.0 / square_size).floor();
    let cell_y = (position.1 / square_size).floor();
    let frac_x = (position.0 - cell_x * square_size) / square_size;
    let frac_y = (position.1 - cell_y * square_size) / square_size;
    ((cell_x as i32, cell_y as i32), (frac_x, frac_y))
}

/// Find the closest side of a cell given a fractional position inside it.
///
/// Ties break in the fixed order UP, DOWN, LEFT, RIGHT.
pub fn closest_side(position: (f32, f32)) -> Direction {
    let (x, y) = position;
    let values = [
        (y, Direction::UP),
        (1.0 - y, Direction::DOWN),
        (x, Direction::LEFT),
        (1.0 - x, Direction::RIGHT),
    ];
    let mut best = values[0];
    for &candidate in &values[1..] {
        if candidate.0 < best.0 {
            best = candidate;
        }
    }
    best.1
}

/// Distance from a fractional position to the nearest cell edge.
pub fn distance_to_closest_side(position: (f32, f32)) -> f32 {
    let (x, y) = position;
    y.min(1.0 - y).min(x).min(1.0 - x)
}

/// Find which side of a cell a moving point entered from.
///
/// Starts from `closest_side` and refines with the travel angle: a point
/// near a corner can sit closest to one edge while its direction of travel
/// shows it crossed the adjacent one.
pub fn entry_side(position: (f32, f32), direction: (f32, f32)) -> Direction {
    let candidate = closest_side(position);
    let angle = direction.1.atan2(direction.0).to_degrees().rem_euclid(360.0);
    // double angle check handles edge cases where rays hit the wrong side
    if candidate == Direction::UP {
        if angle <= 180.0 {
            candidate
        } else if angle <= 270.0 {
            Direction::RIGHT
        } else {
            Direction::LEFT
        }
    } else if candidate == Direction::RIGHT {
        if (90.0..=270.0).contains(&angle) {
            candidate
        } else if angle < 90.0 {
            Direction::UP
        } else {
            Direction::DOWN
        }
    } else if candidate == Direction::DOWN {
        if angle >= 180.0 {
            candidate
        } else if angle >= 90.0 {
            Direction::RIGHT
        } else {
            Direction::LEFT
        }
    } else if candidate == Direction::LEFT {
        if angle <= 90.0 || angle >= 270.0 {
            candidate
        } else if angle <= 180.0 {
            Direction::UP
        } else {
            Direction::DOWN
        }
    } else {
        Direction::NONE
    }
}

/// Rotate a vector by a number of exact 90-degree steps.
///
/// One step maps (x, y) to (-y, x): counterclockwise in math terms, which
/// reads as a clockwise turn on a y-down screen.
pub fn rotate_quarter(vector: (f32, f32), times: u32) -> (f32, f32) {
    let mut v = vector;
    for _ in 0..times % 4 {
        v = (-v.1, v.0);
    }
    v
}

/// Rotate a vector by an arbitrary angle in degrees (same chirality as
/// `rotate_quarter`).
pub fn rotate_degrees(vector: (f32, f32), degrees: f32) -> (f32, f32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (
        vector.0 * cos - vector.1 * sin,
        vector.0 * sin + vector.1 * cos,
    )
}

/// Pixel rect of a cell: (x, y, width, height).
pub fn cell_rect(x: i32, y: i32, square_size: f32) -> (f32, f32, f32, f32) {
    (
        x as f32 * square_size,
        y as f32 * square_size,
        square_size,
        square_size,
    )
}

/// Pixel rect of one square of a cell's 3x3 subdivision, by row-major index.
pub fn cell_subrect(
    x: i32,
    y: i32,
    square_size: f32,
    index: usize,
) -> Result<(f32, f32, f32, f32), String> {
    if index >= 9 {
        return Err(format!("subrect index must be an integer 0-9, got {}", index));
    }
    let top_left_x = x as f32 * square_size;
    let top_left_y = y as f32 * square_size;
    let x_offset = (index % 3) as f32;
    let y_offset = (index / 3) as f32;
    let third = square_size / 3.0;
    Ok((
        (top_left_x + third * x_offset).round(),
        (top_left_y + third * y_offset).round(),
        third.round(),
        third.round(),
    ))
}
