//! Portal teleportation scenarios exercised through the public API.

use raybox::{CellMap, Direction};

const SQUARE: f32 = 40.0;

fn map() -> CellMap {
    CellMap::new(12, 12, SQUARE)
}

/// Teleport from a fractional position inside `cell`, heading `direction`.
fn teleport_from(
    map: &CellMap,
    cell: (i32, i32),
    frac: (f32, f32),
    direction: (f32, f32),
) -> ((f32, f32), (f32, f32)) {
    let position = (
        (cell.0 as f32 + frac.0) * SQUARE,
        (cell.1 as f32 + frac.1) * SQUARE,
    );
    map.teleport(position, direction)
}

fn assert_close(actual: (f32, f32), expected: (f32, f32)) {
    assert!(
        (actual.0 - expected.0).abs() < 1e-3 && (actual.1 - expected.1).abs() < 1e-3,
        "expected ({}, {}), got ({}, {})",
        expected.0,
        expected.1,
        actual.0,
        actual.1
    );
}

#[test]
fn zero_rotation_pair_passes_straight_through() {
    // UP of (3, 3) linked to DOWN of (8, 8): the sides face the same way
    // a seamless floor/ceiling pair would, so heading is preserved
    let mut map = map();
    map.link_sides((3, 3), Direction::UP, (8, 8), Direction::DOWN);

    let (position, direction) = teleport_from(&map, (3, 3), (0.3, 0.0), (0.0, 1.0));

    assert_close(direction, (0.0, 1.0));
    assert_close(position, ((8.0 + 0.3) * SQUARE, (8.0 + 1.0) * SQUARE));
}

#[test]
fn quarter_rotated_pair_turns_the_heading() {
    // UP linked to RIGHT is one clockwise quarter turn
    let mut map = map();
    map.link_sides((3, 3), Direction::UP, (8, 8), Direction::RIGHT);

    let (position, direction) = teleport_from(&map, (3, 3), (0.5, 0.0), (0.0, 1.0));

    assert_close(direction, (1.0, 0.0));
    assert_close(position, ((8.0 + 1.0) * SQUARE, (8.0 + 0.5) * SQUARE));
}

#[test]
fn half_rotated_pair_reverses_the_heading() {
    // UP linked to UP: entering downward comes out moving upward
    let mut map = map();
    map.link_sides((3, 3), Direction::UP, (8, 8), Direction::UP);

    let (position, direction) = teleport_from(&map, (3, 3), (0.25, 0.0), (0.0, 1.0));

    assert_close(direction, (0.0, -1.0));
    // mirrored to 0.75, no remap (rotations = 0), at the partner's top edge
    assert_close(position, ((8.0 + 0.75) * SQUARE, 8.0 * SQUARE));
}

#[test]
fn three_quarter_rotated_pair() {
    // UP linked to LEFT is three clockwise quarter turns
    let mut map = map();
    map.link_sides((3, 3), Direction::UP, (8, 8), Direction::LEFT);

    let (position, direction) = teleport_from(&map, (3, 3), (0.5, 0.0), (0.0, 1.0));

    assert_close(direction, (-1.0, 0.0));
    assert_close(position, (8.0 * SQUARE, (8.0 + 0.5) * SQUARE));
}

#[test]
fn same_cell_up_down_portal_wraps_vertically() {
    let mut map = map();
    map.link_sides((0, 0), Direction::UP, (0, 0), Direction::DOWN);

    let (position, direction) = teleport_from(&map, (0, 0), (0.5, 0.0), (0.0, 1.0));

    assert_close(position, (0.5 * SQUARE, 1.0 * SQUARE));
    assert_close(direction, (0.0, 1.0));
}

#[test]
fn unlinked_side_passes_the_ray_through_unchanged() {
    let mut map = map();
    map.link_sides((3, 3), Direction::UP, (8, 8), Direction::DOWN);

    let position = ((3.0 + 0.02) * SQUARE, (3.0 + 0.5) * SQUARE);
    let direction = (1.0, 0.0);
    let (out_position, out_direction) = map.teleport(position, direction);

    assert_eq!(out_position, position);
    assert_eq!(out_direction, direction);
}

#[test]
fn oblique_heading_rotates_with_the_pair() {
    // entering diagonally through a quarter-rotated pair rotates the
    // diagonal by the same quarter turn
    let mut map = map();
    map.link_sides((3, 3), Direction::UP, (8, 8), Direction::RIGHT);

    let diagonal = (0.6f32, 0.8f32);
    let (_, direction) = teleport_from(&map, (3, 3), (0.5, 0.05), diagonal);

    // 180 degrees plus one quarter turn: (x, y) -> (y, -x)
    assert_close(direction, (0.8, -0.6));
}

#[test]
fn round_trip_through_a_pair_restores_the_heading() {
    let mut map = map();
    map.link_sides((2, 2), Direction::UP, (9, 9), Direction::RIGHT);

    let (mid_position, mid_direction) = teleport_from(&map, (2, 2), (0.3, 0.0), (0.0, 1.0));

    // the exit sits exactly on the partner's edge; step one pixel back
    // inside the portal cell before turning around
    let back_inside = (
        mid_position.0 - mid_direction.0,
        mid_position.1 - mid_direction.1,
    );
    let (end_position, end_direction) =
        map.teleport(back_inside, (-mid_direction.0, -mid_direction.1));

    assert_close(end_direction, (0.0, -1.0));
    // back at the original entry point, offset by the one-pixel step
    assert_close(end_position, ((2.0 + 0.3) * SQUARE, 2.0 * SQUARE + 1.0));
}
