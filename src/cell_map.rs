use crate::block::{CellContent, WallKind};
use crate::direction::Direction;
use crate::geometry::{entry_side, rotate_quarter, split_position};

/// Individual map cell. Identity is its (column, row) coordinate in the
/// map; it has no lifecycle of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cell {
    pub content: CellContent,
}

/// Two-dimensional cell mapping of a map's layout in squares.
///
/// Owns every cell for its whole lifetime; created once at fixed
/// dimensions and mutated in place. `square_size` is only used for
/// pixel/cell coordinate conversion.
#[derive(Debug, Clone)]
pub struct CellMap {
    pub columns: i32,
    pub rows: i32,
    pub square_size: f32,
    cells: Vec<Cell>,
}

impl CellMap {
    /// Create a map with every cell empty.
    pub fn new(columns: i32, rows: i32, square_size: f32) -> Self {
        CellMap {
            columns,
            rows,
            square_size,
            cells: vec![Cell::default(); (columns * rows) as usize],
        }
    }

    fn index(&self, x: i32, y: i32) -> usize {
        (y * self.columns + x) as usize
    }

    /// Whether a cell coordinate lies on the map.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.columns && y >= 0 && y < self.rows
    }

    /// Content of the cell at (x, y). Out-of-range coordinates are a
    /// caller bug and panic.
    pub fn get(&self, x: i32, y: i32) -> &CellContent {
        &self.cells[self.index(x, y)].content
    }

    /// Content at (x, y), treating everything beyond the map edge as the
    /// surrounding border wall.
    pub fn content_at(&self, x: i32, y: i32) -> CellContent {
        if !self.contains(x, y) {
            return CellContent::Wall(WallKind::Border);
        }
        self.cells[self.index(x, y)].content
    }

    /// Set the content of a cell.
    ///
    /// Overwriting a portal with non-portal content first unlinks every
    /// remaining link, so no other cell is left pointing at a cell that is
    /// no longer a portal.
    pub fn set_cell_content(&mut self, x: i32, y: i32, new_content: CellContent) {
        if let CellContent::Portal { links } = *self.get(x, y) {
            if !new_content.is_portal() {
                for (side, (target, target_side)) in links.entries() {
                    self.unlink_sides((x, y), side, target, target_side);
                }
            }
        }
        let index = self.index(x, y);
        self.cells[index].content = new_content;
    }

    /// Reset every cell to empty, running portal unlink cascades uniformly.
    pub fn clear(&mut self) {
        for column in 0..self.columns {
            for row in 0..self.rows {
                self.set_cell_content(column, row, CellContent::Empty);
            }
        }
    }

    /// Link two cell sides together for portal mechanics.
    ///
    /// Either end is upgraded to a portal if it isn't one, keeping any
    /// links already present on its other sides. Both locations may name
    /// the same cell as long as the sides differ (a self-loop).
    ///
    /// Re-linking an already-linked side replaces that single side's link;
    /// the old partner keeps its own outgoing link until it is explicitly
    /// unlinked or its cell is overwritten.
    pub fn link_sides(
        &mut self,
        first_location: (i32, i32),
        first_side: Direction,
        second_location: (i32, i32),
        second_side: Direction,
    ) {
        assert!(
            first_side.is_simple() && second_side.is_simple(),
            "portal sides must be simple directions"
        );
        if first_location == second_location {
            assert_ne!(first_side, second_side, "cannot link a side to itself");
            let mut links = match *self.get(first_location.0, first_location.1) {
                CellContent::Portal { links } => links,
                _ => Default::default(),
            };
            links.set(first_side, (first_location, second_side));
            links.set(second_side, (first_location, first_side));
            self.set_cell_content(first_location.0, first_location.1, CellContent::Portal { links });
        } else {
            let mut first_links = match *self.get(first_location.0, first_location.1) {
                CellContent::Portal { links } => links,
                _ => Default::default(),
            };
            let mut second_links = match *self.get(second_location.0, second_location.1) {
                CellContent::Portal { links } => links,
                _ => Default::default(),
            };
            first_links.set(first_side, (second_location, second_side));
            second_links.set(second_side, (first_location, first_side));
            self.set_cell_content(
                first_location.0,
                first_location.1,
                CellContent::Portal { links: first_links },
            );
            self.set_cell_content(
                second_location.0,
                second_location.1,
                CellContent::Portal { links: second_links },
            );
        }
    }

    /// Unlink two cell sides linked together for portal mechanics.
    ///
    /// A no-op unless both locations currently hold portals; redundant
    /// unlinks are legitimate editor input. A portal whose last link is
    /// removed collapses back to an empty cell.
    pub fn unlink_sides(
        &mut self,
        first_location: (i32, i32),
        first_side: Direction,
        second_location: (i32, i32),
        second_side: Direction,
    ) {
        if first_location == second_location {
            let index = self.index(first_location.0, first_location.1);
            let CellContent::Portal { mut links } = self.cells[index].content else {
                return;
            };
            links.clear(first_side);
            links.clear(second_side);
            self.cells[index].content = if links.is_unlinked() {
                CellContent::Empty
            } else {
                CellContent::Portal { links }
            };
        } else {
            let first_index = self.index(first_location.0, first_location.1);
            let second_index = self.index(second_location.0, second_location.1);
            let (
                CellContent::Portal { links: mut first_links },
                CellContent::Portal { links: mut second_links },
            ) = (self.cells[first_index].content, self.cells[second_index].content)
            else {
                return;
            };
            first_links.clear(first_side);
            second_links.clear(second_side);
            self.cells[first_index].content = if first_links.is_unlinked() {
                CellContent::Empty
            } else {
                CellContent::Portal { links: first_links }
            };
            self.cells[second_index].content = if second_links.is_unlinked() {
                CellContent::Empty
            } else {
                CellContent::Portal { links: second_links }
            };
        }
    }

    /// Teleport a position and heading through the portal cell it stands
    /// in, accounting for the relative rotation of the linked sides.
    ///
    /// The cell must hold a portal; the caller only invokes this while
    /// standing on one. An unlinked entry side passes the ray through
    /// unchanged.
    pub fn teleport(
        &self,
        position: (f32, f32),
        direction: (f32, f32),
    ) -> ((f32, f32), (f32, f32)) {
        let (cell, mut cell_pos) = split_position(position, self.square_size);
        let enter_side = entry_side(cell_pos, direction);

        let CellContent::Portal { links } = *self.get(cell.0, cell.1) else {
            panic!("teleport invoked on non-portal cell ({}, {})", cell.0, cell.1);
        };
        let Some((other_location, other_side)) = links.get(enter_side) else {
            return (position, direction);
        };

        // base teleport through the opposite-facing wall
        if enter_side.intersects(Direction::UP | Direction::DOWN) {
            cell_pos.0 = 1.0 - cell_pos.0;
        }
        if enter_side.intersects(Direction::LEFT | Direction::RIGHT) {
            cell_pos.1 = 1.0 - cell_pos.1;
        }
        let mut direction = rotate_quarter(direction, 2);

        // extra rotation for the relative orientation of the linked sides
        let rotations = other_side.turns_from(enter_side);
        direction = rotate_quarter(direction, rotations);
        cell_pos = match rotations {
            0 => cell_pos,
            1 => (1.0 - cell_pos.1, cell_pos.0),
            2 => (1.0 - cell_pos.0, 1.0 - cell_pos.1),
            _ => (cell_pos.1, 1.0 - cell_pos.0),
        };

        let location = (
            (other_location.0 as f32 + cell_pos.0) * self.square_size,
            (other_location.1 as f32 + cell_pos.1) * self.square_size,
        );
        (location, direction)
    }

    /// Whether a pixel position lies strictly inside the map.
    pub fn in_bounds(&self, position: (f32, f32)) -> bool {
        position.0 > 0.0
            && position.0 < self.columns as f32 * self.square_size
            && position.1 > 0.0
            && position.1 < self.rows as f32 * self.square_size
    }

    /// Flatten the layout to one character per cell, row per line.
    /// Walls are '#', mirrors 'M', portals 'P', empty cells '.'.
    pub fn to_layout_string(&self) -> String {
        let mut result = String::new();
        for y in 0..self.rows {
            for x in 0..self.columns {
                result.push(match self.get(x, y) {
                    CellContent::Empty => '.',
                    CellContent::Wall(WallKind::Normal) => '#',
                    CellContent::Wall(WallKind::Border) => 'B',
                    CellContent::Mirror { .. } => 'M',
                    CellContent::Portal { .. } => 'P',
                });
            }
            result.push('\n');
        }
        result
    }
}
