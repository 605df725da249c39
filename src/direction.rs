use bitflags::bitflags;

bitflags! {
    /// Cardinal directions for movement and rotation.
    ///
    /// Compound values (unions of more than one cardinal) are valid for
    /// marking cell sides; the rotation-counting operations only accept
    /// simple (single-cardinal) values.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
    pub struct Direction: u8 {
        const NONE  = 0;
        const UP    = 1 << 0;
        const RIGHT = 1 << 1;
        const DOWN  = 1 << 2;
        const LEFT  = 1 << 3;
        const ALL   = Self::UP.bits() | Self::RIGHT.bits() | Self::DOWN.bits() | Self::LEFT.bits();
    }
}

impl Direction {
    /// Whether this is a single cardinal direction.
    pub fn is_simple(self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Position of a simple direction on the clockwise circle UP=0, RIGHT=1, DOWN=2, LEFT=3.
    fn position(self) -> u32 {
        debug_assert!(self.is_simple());
        self.bits().trailing_zeros()
    }

    fn from_position(position: i32) -> Direction {
        Direction::from_bits_truncate(1 << position.rem_euclid(4))
    }

    /// Rotate a direction by any number of right angles.
    ///
    /// A compound value rotates componentwise and re-unions, so a compound
    /// shape rotates rigidly.
    pub fn rotate(self, times: i32, ccw: bool) -> Direction {
        let components = self.components();
        if components.len() > 1 {
            return components
                .into_iter()
                .fold(Direction::NONE, |acc, d| acc | d.rotate(times, ccw));
        }
        assert!(self.is_simple(), "cannot rotate an empty direction");
        let delta = if ccw { -times } else { times };
        Direction::from_position(self.position() as i32 + delta)
    }

    /// Count 90-degree clockwise rotations from `other` to `self` (0-3).
    ///
    /// Named to stay clear of the set-difference operation bitflags
    /// already defines. Panics on compound operands; rotation counting is
    /// only defined between single cardinals.
    pub fn turns_from(self, other: Direction) -> u32 {
        assert!(
            self.is_simple() && other.is_simple(),
            "cannot count rotations between compound directions"
        );
        (self.position() as i32 - other.position() as i32).rem_euclid(4) as u32
    }

    /// Indices of a 3x3 grid that correspond to the cardinal components present.
    ///
    /// UP=1, DOWN=7, LEFT=3, RIGHT=5 in row-major order; the center (4) and
    /// corners are never produced.
    pub fn subrect_indices(self) -> Vec<usize> {
        let mut indices = Vec::new();
        if self.contains(Direction::UP) {
            indices.push(1);
        }
        if self.contains(Direction::DOWN) {
            indices.push(7);
        }
        if self.contains(Direction::LEFT) {
            indices.push(3);
        }
        if self.contains(Direction::RIGHT) {
            indices.push(5);
        }
        indices
    }

    /// The individual cardinals that compose a compound direction,
    /// in the fixed order UP, DOWN, LEFT, RIGHT.
    pub fn components(self) -> Vec<Direction> {
        let mut directions = Vec::new();
        if self.contains(Direction::UP) {
            directions.push(Direction::UP);
        }
        if self.contains(Direction::DOWN) {
            directions.push(Direction::DOWN);
        }
        if self.contains(Direction::LEFT) {
            directions.push(Direction::LEFT);
        }
        if self.contains(Direction::RIGHT) {
            directions.push(Direction::RIGHT);
        }
        directions
    }
}

bitflags! {
    /// Combination of movement inputs relative to the player's facing.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MovementCombo: u8 {
        const NONE     = 0;
        const FORWARD  = 1 << 0;
        const BACKWARD = 1 << 1;
        const LEFT     = 1 << 2;
        const RIGHT    = 1 << 3;
    }
}

impl MovementCombo {
    /// Resolve conflicting directions; opposing inputs cancel out.
    pub fn resolved(self) -> MovementCombo {
        let mut new = self;
        if !self.is_legal() {
            if self.contains(MovementCombo::LEFT) && self.contains(MovementCombo::RIGHT) {
                new &= !(MovementCombo::LEFT | MovementCombo::RIGHT);
            }
            if self.contains(MovementCombo::FORWARD) && self.contains(MovementCombo::BACKWARD) {
                new &= !(MovementCombo::FORWARD | MovementCombo::BACKWARD);
            }
        }
        new
    }

    /// Whether a combination of directions is legal as-is.
    pub fn is_legal(self) -> bool {
        matches!(self.bits(), 0 | 1 | 2 | 4 | 5 | 6 | 8 | 9 | 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_is_cyclic() {
        for d in [Direction::UP, Direction::RIGHT, Direction::DOWN, Direction::LEFT] {
            assert_eq!(d.rotate(4, false), d);
            assert_eq!(d.rotate(1, false).rotate(1, true), d);
            assert_eq!(d.rotate(-1, false), d.rotate(1, true));
        }
    }

    #[test]
    fn clockwise_order() {
        assert_eq!(Direction::UP.rotate(1, false), Direction::RIGHT);
        assert_eq!(Direction::RIGHT.rotate(1, false), Direction::DOWN);
        assert_eq!(Direction::DOWN.rotate(1, false), Direction::LEFT);
        assert_eq!(Direction::LEFT.rotate(1, false), Direction::UP);
    }

    #[test]
    fn compound_rotates_rigidly() {
        let corner = Direction::UP | Direction::RIGHT;
        assert_eq!(corner.rotate(1, false), Direction::RIGHT | Direction::DOWN);
        assert_eq!(Direction::ALL.rotate(3, true), Direction::ALL);
    }

    #[test]
    fn turns_from_counts_clockwise() {
        assert_eq!(Direction::RIGHT.turns_from(Direction::UP), 1);
        assert_eq!(Direction::UP.turns_from(Direction::RIGHT), 3);
        assert_eq!(Direction::DOWN.turns_from(Direction::UP), 2);
        for a in [Direction::UP, Direction::RIGHT, Direction::DOWN, Direction::LEFT] {
            for b in [Direction::UP, Direction::RIGHT, Direction::DOWN, Direction::LEFT] {
                assert_eq!((a.turns_from(b) + b.turns_from(a)) % 4, 0);
            }
        }
    }

    #[test]
    #[should_panic]
    fn turns_from_rejects_compound() {
        let _ = (Direction::UP | Direction::LEFT).turns_from(Direction::UP);
    }

    #[test]
    fn subrect_indices_fixed_order() {
        assert_eq!(Direction::ALL.subrect_indices(), vec![1, 7, 3, 5]);
        assert_eq!((Direction::UP | Direction::RIGHT).subrect_indices(), vec![1, 5]);
        assert_eq!(Direction::NONE.subrect_indices(), Vec::<usize>::new());
    }

    #[test]
    fn components_fixed_order() {
        assert_eq!(
            Direction::ALL.components(),
            vec![Direction::UP, Direction::DOWN, Direction::LEFT, Direction::RIGHT]
        );
        assert_eq!(Direction::LEFT.components(), vec![Direction::LEFT]);
    }

    #[test]
    fn movement_combo_resolution() {
        let combo = MovementCombo::FORWARD | MovementCombo::BACKWARD | MovementCombo::LEFT;
        assert!(!combo.is_legal());
        assert_eq!(combo.resolved(), MovementCombo::LEFT);

        let legal = MovementCombo::FORWARD | MovementCombo::RIGHT;
        assert!(legal.is_legal());
        assert_eq!(legal.resolved(), legal);
    }
}
