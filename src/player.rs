use crate::cell_map::CellMap;
use crate::direction::MovementCombo;
use crate::geometry::{rotate_degrees, split_position};

/// The observer walking around the map with a precise floating-point
/// position and a unit facing vector.
#[derive(Debug, Clone)]
pub struct Player {
    pub position: (f32, f32),
    pub direction: (f32, f32),
    /// Collision radius in pixels (must be smaller than a cell).
    pub radius: f32,
    /// Pixels traveled per second.
    pub speed: f32,
    /// Degrees turned per second when a turn key is held.
    pub turn_speed: f32,
}

impl Player {
    pub fn new(position: (f32, f32), radius: f32, speed: f32, turn_speed: f32) -> Self {
        Player {
            position,
            direction: (1.0, 0.0),
            radius,
            speed,
            turn_speed,
        }
    }

    /// Turn the facing vector by an angle in degrees (positive turns
    /// clockwise on screen).
    pub fn turn(&mut self, degrees: f32) {
        self.direction = rotate_degrees(self.direction, degrees);
    }

    /// Flip the facing vector around.
    pub fn flip(&mut self) {
        self.direction = (-self.direction.0, -self.direction.1);
    }

    /// Move according to the held movement keys, sliding along walls.
    ///
    /// Conflicting opposite inputs cancel; each axis is resolved
    /// separately so a blocked axis doesn't stop the other.
    pub fn update(&mut self, combo: MovementCombo, map: &CellMap, delta_time: f32) {
        let combo = combo.resolved();
        let (dx, dy) = self.direction;

        let mut movement = (0.0f32, 0.0f32);
        if combo.contains(MovementCombo::FORWARD) {
            movement.0 += dx;
            movement.1 += dy;
        }
        if combo.contains(MovementCombo::BACKWARD) {
            movement.0 -= dx;
            movement.1 -= dy;
        }
        // on a y-down screen, the player's right hand points a quarter
        // turn clockwise from the facing vector
        if combo.contains(MovementCombo::RIGHT) {
            movement.0 += -dy;
            movement.1 += dx;
        }
        if combo.contains(MovementCombo::LEFT) {
            movement.0 += dy;
            movement.1 += -dx;
        }

        let magnitude = (movement.0 * movement.0 + movement.1 * movement.1).sqrt();
        if magnitude == 0.0 {
            return;
        }
        let step = self.speed * delta_time;
        let (move_x, move_y) = (movement.0 / magnitude * step, movement.1 / magnitude * step);

        if move_x != 0.0 {
            let next = (self.position.0 + move_x, self.position.1);
            if self.can_stand(map, next, (move_x.signum(), 0.0)) {
                self.position = next;
            }
        }
        if move_y != 0.0 {
            let next = (self.position.0, self.position.1 + move_y);
            if self.can_stand(map, next, (0.0, move_y.signum())) {
                self.position = next;
            }
        }
    }

    /// Whether the leading edge of the player at `position`, moving along
    /// `heading`, rests in a walkable cell.
    fn can_stand(&self, map: &CellMap, position: (f32, f32), heading: (f32, f32)) -> bool {
        let leading = (
            position.0 + heading.0 * self.radius,
            position.1 + heading.1 * self.radius,
        );
        if !map.in_bounds(leading) {
            return false;
        }
        let ((cell_x, cell_y), _) = split_position(leading, map.square_size);
        map.content_at(cell_x, cell_y).is_walkable()
    }

    /// The cell the player's center stands in.
    pub fn cell(&self, map: &CellMap) -> (i32, i32) {
        split_position(self.position, map.square_size).0
    }
}
