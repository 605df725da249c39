use crate::block::CellContent;
use crate::cell_map::CellMap;
use crate::geometry::{entry_side, rotate_degrees, split_position};
use crate::ray::{RaySegment, SegmentEnd};

/// Nudge past a cell boundary, as a fraction of the square size, so the
/// position after a crossing unambiguously belongs to the entered cell.
const BOUNDARY_NUDGE: f32 = 1e-4;

/// March a single ray through the map.
///
/// The ray advances cell boundary to cell boundary. Walls and mirrors end
/// it (mirror cells terminate like walls, tagged so the renderer can tell
/// them apart); a linked portal side closes the current segment and starts
/// the next one at the teleport exit; `max_distance` caps total travel
/// across all segments.
pub fn cast_ray(
    map: &CellMap,
    origin: (f32, f32),
    direction: (f32, f32),
    max_distance: f32,
) -> Vec<RaySegment> {
    let length = (direction.0 * direction.0 + direction.1 * direction.1).sqrt();
    if length == 0.0 {
        return Vec::new();
    }
    let mut dir = (direction.0 / length, direction.1 / length);
    let nudge = BOUNDARY_NUDGE * map.square_size;

    let mut segments = Vec::new();
    let mut pos = origin;
    let mut segment_start = origin;
    let mut segment_distance = 0.0f32;
    let mut traveled = 0.0f32;

    loop {
        let (cell, frac) = split_position(pos, map.square_size);
        match map.content_at(cell.0, cell.1) {
            CellContent::Wall(kind) => {
                segments.push(RaySegment {
                    start: segment_start,
                    end: pos,
                    distance: segment_distance,
                    end_type: SegmentEnd::Wall(kind),
                });
                return segments;
            }
            CellContent::Mirror { .. } => {
                segments.push(RaySegment {
                    start: segment_start,
                    end: pos,
                    distance: segment_distance,
                    end_type: SegmentEnd::Mirror,
                });
                return segments;
            }
            CellContent::Portal { links } => {
                // only a ray that marched into this cell can teleport;
                // a segment that just started here is on its way out
                if segment_distance > 0.0 && links.get(entry_side(frac, dir)).is_some() {
                    segments.push(RaySegment {
                        start: segment_start,
                        end: pos,
                        distance: segment_distance,
                        end_type: SegmentEnd::Portal,
                    });
                    let (exit, exit_dir) = map.teleport(pos, dir);
                    dir = exit_dir;
                    segment_start = exit;
                    segment_distance = 0.0;
                    // resolve which cell the exit belongs to before advancing
                    pos = (exit.0 + dir.0 * nudge, exit.1 + dir.1 * nudge);
                    continue;
                }
            }
            CellContent::Empty => {}
        }

        let step = distance_to_boundary(pos, dir, map.square_size) + nudge;
        if traveled + step >= max_distance {
            let remaining = max_distance - traveled;
            let end = (pos.0 + dir.0 * remaining, pos.1 + dir.1 * remaining);
            segments.push(RaySegment {
                start: segment_start,
                end,
                distance: segment_distance + remaining,
                end_type: SegmentEnd::MaxDistance,
            });
            return segments;
        }
        pos = (pos.0 + dir.0 * step, pos.1 + dir.1 * step);
        traveled += step;
        segment_distance += step;
    }
}

/// Distance along `dir` from `pos` to the nearest gridline crossing.
fn distance_to_boundary(pos: (f32, f32), dir: (f32, f32), square_size: f32) -> f32 {
    axis_distance(pos.0, dir.0, square_size).min(axis_distance(pos.1, dir.1, square_size))
}

fn axis_distance(p: f32, d: f32, square_size: f32) -> f32 {
    if d == 0.0 {
        return f32::INFINITY;
    }
    let next = if d > 0.0 {
        (p / square_size).floor() * square_size + square_size
    } else {
        (p / square_size).ceil() * square_size - square_size
    };
    (next - p) / d
}

/// One ray of a fan, with its angular offset from the facing direction
/// (degrees; negative is toward the left edge of the view).
#[derive(Debug, Clone)]
pub struct CastRay {
    pub angle_offset: f32,
    pub segments: Vec<RaySegment>,
}

impl CastRay {
    /// Total distance traveled across every segment.
    pub fn total_distance(&self) -> f32 {
        self.segments.iter().map(|segment| segment.distance).sum()
    }

    /// End type of the last segment.
    pub fn end_type(&self) -> Option<SegmentEnd> {
        self.segments.last().map(|segment| segment.end_type)
    }

    /// Distance corrected for the fisheye distortion of a flat projection
    /// plane.
    pub fn corrected_distance(&self) -> f32 {
        self.total_distance() * self.angle_offset.to_radians().cos()
    }
}

/// Fans `ray_count` rays evenly across a field of view.
#[derive(Debug, Clone)]
pub struct Raycaster {
    pub fov_degrees: f32,
    pub ray_count: usize,
}

impl Raycaster {
    pub fn new(fov_degrees: f32, ray_count: usize) -> Self {
        Raycaster { fov_degrees, ray_count }
    }

    /// Cast the whole fan from `origin` looking along `facing`.
    pub fn cast_fan(
        &self,
        map: &CellMap,
        origin: (f32, f32),
        facing: (f32, f32),
        max_distance: f32,
    ) -> Vec<CastRay> {
        let mut rays = Vec::with_capacity(self.ray_count);
        for i in 0..self.ray_count {
            let angle_offset = self.fov_degrees * ((i as f32 + 0.5) / self.ray_count as f32)
                - self.fov_degrees / 2.0;
            let direction = rotate_degrees(facing, angle_offset);
            rays.push(CastRay {
                angle_offset,
                segments: cast_ray(map, origin, direction, max_distance),
            });
        }
        rays
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::WallKind;
    use crate::direction::Direction;

    fn map() -> CellMap {
        CellMap::new(10, 10, 50.0)
    }

    #[test]
    fn ray_hits_a_wall() {
        let mut map = map();
        map.set_cell_content(5, 2, CellContent::Wall(WallKind::Normal));

        let segments = cast_ray(&map, (125.0, 125.0), (1.0, 0.0), 1000.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_type, SegmentEnd::Wall(WallKind::Normal));
        // the wall face sits at x = 250
        assert!((segments[0].end.0 - 250.0).abs() < 1.0);
        assert!((segments[0].distance - 125.0).abs() < 1.0);
    }

    #[test]
    fn ray_stops_at_the_map_border() {
        let map = map();
        let segments = cast_ray(&map, (125.0, 125.0), (-1.0, 0.0), 10_000.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_type, SegmentEnd::Wall(WallKind::Border));
        assert!((segments[0].end.0 - 0.0).abs() < 1.0);
    }

    #[test]
    fn ray_terminates_at_mirrors_without_reflecting() {
        let mut map = map();
        map.set_cell_content(2, 5, CellContent::Mirror { sides: Direction::ALL });
        let segments = cast_ray(&map, (275.0, 275.0), (-1.0, 0.0), 1000.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_type, SegmentEnd::Mirror);
    }

    #[test]
    fn ray_respects_max_distance() {
        let map = map();
        let segments = cast_ray(&map, (125.0, 125.0), (1.0, 0.0), 60.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_type, SegmentEnd::MaxDistance);
        assert!((segments[0].distance - 60.0).abs() < 1.0);
    }

    #[test]
    fn ray_continues_through_a_linked_portal() {
        let mut map = map();
        // LEFT side of (5, 2) linked to RIGHT side of (5, 7): the ray
        // teleports across the map and keeps going left until the border
        map.link_sides((5, 2), Direction::LEFT, (5, 7), Direction::RIGHT);

        let segments = cast_ray(&map, (125.0, 125.0), (1.0, 0.0), 10_000.0);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].end_type, SegmentEnd::Portal);
        assert_eq!(segments[1].end_type, SegmentEnd::Wall(WallKind::Border));
        // second segment starts at the partner's right edge, row 7
        assert!((segments[1].start.0 - 300.0).abs() < 1.0);
        assert!((segments[1].start.1 - 375.0).abs() < 1.0);
    }

    #[test]
    fn ray_passes_through_an_unlinked_portal_side() {
        let mut map = map();
        map.link_sides((5, 2), Direction::UP, (5, 7), Direction::DOWN);

        // enters the portal cell from the left, which is unlinked
        let segments = cast_ray(&map, (125.0, 125.0), (1.0, 0.0), 10_000.0);
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].end_type, SegmentEnd::Wall(WallKind::Border));
    }

    #[test]
    fn cycling_portals_are_bounded_by_max_distance() {
        // DOWN side of (5, 2) faces the UP side of (5, 6): a ray falling
        // through the gap teleports back up and falls forever
        let mut map = map();
        map.link_sides((5, 2), Direction::DOWN, (5, 6), Direction::UP);

        let segments = cast_ray(&map, (275.0, 175.0), (0.0, 1.0), 2000.0);
        assert!(segments.len() > 3);
        assert_eq!(segments.last().unwrap().end_type, SegmentEnd::MaxDistance);
        let total: f32 = segments.iter().map(|s| s.distance).sum();
        assert!((total - 2000.0).abs() < 1.0);
    }

    #[test]
    fn fan_spans_the_field_of_view() {
        let map = map();
        let caster = Raycaster::new(70.0, 7);
        let rays = caster.cast_fan(&map, (250.0, 250.0), (1.0, 0.0), 10_000.0);
        assert_eq!(rays.len(), 7);
        assert!(rays.first().unwrap().angle_offset < 0.0);
        assert!(rays.last().unwrap().angle_offset > 0.0);
        assert!(rays.iter().all(|ray| !ray.segments.is_empty()));
    }
}
