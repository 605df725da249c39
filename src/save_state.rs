use serde::{Deserialize, Serialize};
use std::fs;

use crate::block::CellContent;
use crate::cell_map::CellMap;
use crate::player::Player;

/// Snapshot of the map layout and the player, serialized to JSON.
///
/// Only non-empty cells are stored; portals carry their full link tables,
/// so restoring re-establishes every pair (and any deliberately dangling
/// half-link) exactly as saved.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveState {
    pub columns: i32,
    pub rows: i32,
    pub square_size: f32,
    pub cells: Vec<SavedCell>,
    pub player: SavedPlayer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedCell {
    pub x: i32,
    pub y: i32,
    pub content: CellContent,
}

/// Minimal player data for saving/loading.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedPlayer {
    pub x: f32,
    pub y: f32,
    pub dir_x: f32,
    pub dir_y: f32,
}

impl SaveState {
    /// Create a save state from the current map and player.
    pub fn capture(map: &CellMap, player: &Player) -> Self {
        let mut cells = Vec::new();
        for y in 0..map.rows {
            for x in 0..map.columns {
                let content = *map.get(x, y);
                if !content.is_empty() {
                    cells.push(SavedCell { x, y, content });
                }
            }
        }

        SaveState {
            columns: map.columns,
            rows: map.rows,
            square_size: map.square_size,
            cells,
            player: SavedPlayer {
                x: player.position.0,
                y: player.position.1,
                dir_x: player.direction.0,
                dir_y: player.direction.1,
            },
        }
    }

    /// Save to file
    pub fn save_to_file(&self, path: &str) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize save state: {}", e))?;

        fs::write(path, json).map_err(|e| format!("Failed to write save file: {}", e))?;

        Ok(())
    }

    /// Load from file
    pub fn load_from_file(path: &str) -> Result<Self, String> {
        let json =
            fs::read_to_string(path).map_err(|e| format!("Failed to read save file: {}", e))?;

        let save_state: SaveState =
            serde_json::from_str(&json).map_err(|e| format!("Failed to parse save file: {}", e))?;

        Ok(save_state)
    }

    /// Restore the map from this save state.
    pub fn restore_map(&self) -> CellMap {
        let mut map = CellMap::new(self.columns, self.rows, self.square_size);
        for cell in &self.cells {
            map.set_cell_content(cell.x, cell.y, cell.content);
        }
        map
    }

    /// Apply the saved player position and facing to a player.
    pub fn restore_player(&self, player: &mut Player) {
        player.position = (self.player.x, self.player.y);
        player.direction = (self.player.dir_x, self.player.dir_y);
    }
}
