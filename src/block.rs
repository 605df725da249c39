use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// Wall variants; `Border` marks the implicit wall surrounding the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    Normal,
    Border,
}

/// A portal side's destination: target cell coordinate plus the simple
/// side of that cell the link attaches to. A lookup relation into the map,
/// never a reference to another cell.
pub type PortalTarget = ((i32, i32), Direction);

/// Per-side link table of a portal cell, indexed by the four simple directions.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PortalLinks {
    slots: [Option<PortalTarget>; 4],
}

impl PortalLinks {
    fn slot(side: Direction) -> usize {
        assert!(side.is_simple(), "portal links are indexed by simple directions");
        side.bits().trailing_zeros() as usize
    }

    pub fn get(&self, side: Direction) -> Option<PortalTarget> {
        self.slots[Self::slot(side)]
    }

    pub fn set(&mut self, side: Direction, target: PortalTarget) {
        self.slots[Self::slot(side)] = Some(target);
    }

    pub fn clear(&mut self, side: Direction) {
        self.slots[Self::slot(side)] = None;
    }

    /// Whether every side is unlinked.
    pub fn is_unlinked(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// The linked sides as a compound direction, for side visualization.
    pub fn sides(&self) -> Direction {
        let mut sides = Direction::NONE;
        for side in Direction::ALL.components() {
            if self.get(side).is_some() {
                sides |= side;
            }
        }
        sides
    }

    /// All linked sides with their targets, in component order.
    pub fn entries(&self) -> Vec<(Direction, PortalTarget)> {
        Direction::ALL
            .components()
            .into_iter()
            .filter_map(|side| self.get(side).map(|target| (side, target)))
            .collect()
    }
}

/// What a map cell holds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum CellContent {
    #[default]
    Empty,
    Wall(WallKind),
    Mirror {
        /// Which edges of the cell reflect.
        sides: Direction,
    },
    Portal {
        links: PortalLinks,
    },
}

impl CellContent {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellContent::Empty)
    }

    pub fn is_portal(&self) -> bool {
        matches!(self, CellContent::Portal { .. })
    }

    /// Whether the player can stand in this cell. Mirrors and portals are
    /// solid for movement; only rays pass through portals.
    pub fn is_walkable(&self) -> bool {
        self.is_empty()
    }
}
