use crate::block::WallKind;

/// What terminated (or interrupted) a ray segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentEnd {
    /// The segment ran into a wall.
    Wall(WallKind),
    /// The segment ran into a mirror cell.
    Mirror,
    /// The segment entered a linked portal side; the next segment in the
    /// list continues from the teleport exit.
    Portal,
    /// The ray exhausted its travel budget.
    MaxDistance,
}

impl SegmentEnd {
    /// Whether this end terminates the whole ray rather than one segment.
    pub fn is_terminal(self) -> bool {
        !matches!(self, SegmentEnd::Portal)
    }
}

/// One straight piece of a ray's path. A ray that never crosses a portal
/// is a single segment; each teleport starts a new one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySegment {
    pub start: (f32, f32),
    pub end: (f32, f32),
    /// Length of this segment in pixels.
    pub distance: f32,
    pub end_type: SegmentEnd,
}
