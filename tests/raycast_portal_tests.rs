//! Ray marching through portal geometry, end to end.

use raybox::{cast_ray, CellContent, CellMap, Direction, SegmentEnd, WallKind};

const SQUARE: f32 = 50.0;

fn center(cell: (i32, i32)) -> (f32, f32) {
    (
        (cell.0 as f32 + 0.5) * SQUARE,
        (cell.1 as f32 + 0.5) * SQUARE,
    )
}

#[test]
fn ray_crosses_a_portal_and_hits_the_wall_behind_it() {
    let mut map = CellMap::new(12, 12, SQUARE);
    // LEFT to RIGHT is a facing pair: the ray keeps heading right and
    // resumes from the partner's right edge on row 8
    map.link_sides((6, 2), Direction::LEFT, (2, 8), Direction::RIGHT);
    map.set_cell_content(5, 8, CellContent::Wall(WallKind::Normal));

    let segments = cast_ray(&map, center((2, 2)), (1.0, 0.0), 10_000.0);

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].end_type, SegmentEnd::Portal);
    assert_eq!(segments[1].end_type, SegmentEnd::Wall(WallKind::Normal));
    // the wall face sits at the left edge of column 5
    assert!((segments[1].end.0 - 5.0 * SQUARE).abs() < 1.0);
    assert!((segments[1].end.1 - (8.0 + 0.5) * SQUARE).abs() < 1.0);
}

#[test]
fn rotated_portal_bends_the_ray_path() {
    let mut map = CellMap::new(12, 12, SQUARE);
    // entering the UP side comes out of the partner's RIGHT side: the ray
    // turns a quarter clockwise
    map.link_sides((5, 5), Direction::UP, (2, 9), Direction::RIGHT);

    let segments = cast_ray(&map, center((5, 2)), (0.0, 1.0), 10_000.0);

    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].end_type, SegmentEnd::Portal);
    // the second segment travels right along row 9 to the map border
    let last = segments.last().unwrap();
    assert_eq!(last.end_type, SegmentEnd::Wall(WallKind::Border));
    assert!((last.end.0 - 12.0 * SQUARE).abs() < 1.0);
    assert!((last.end.1 - (9.0 + 0.5) * SQUARE).abs() < 1.0);
}

#[test]
fn portal_segments_accumulate_total_distance() {
    let mut map = CellMap::new(12, 12, SQUARE);
    // LEFT to LEFT reverses the heading: the ray comes back out of the
    // partner's left edge moving left
    map.link_sides((6, 2), Direction::LEFT, (6, 8), Direction::LEFT);
    map.set_cell_content(3, 8, CellContent::Wall(WallKind::Normal));

    let segments = cast_ray(&map, center((2, 2)), (1.0, 0.0), 10_000.0);
    let total: f32 = segments.iter().map(|s| s.distance).sum();

    assert_eq!(segments.last().unwrap().end_type, SegmentEnd::Wall(WallKind::Normal));
    // 3.5 cells to the portal face, then 2 cells back to the wall face
    assert!((total - 5.5 * SQUARE).abs() < 1.0);
}

#[test]
fn every_segment_is_interior_to_the_map() {
    let mut map = CellMap::new(12, 12, SQUARE);
    map.link_sides((6, 6), Direction::UP, (3, 3), Direction::LEFT);

    let segments = cast_ray(&map, center((6, 4)), (0.0, 1.0), 10_000.0);
    for segment in &segments {
        for point in [segment.start, segment.end] {
            assert!(point.0 >= -1.0 && point.0 <= 12.0 * SQUARE + 1.0);
            assert!(point.1 >= -1.0 && point.1 <= 12.0 * SQUARE + 1.0);
        }
        assert!(segment.distance >= 0.0);
    }
    assert!(segments.last().unwrap().end_type.is_terminal());
}
