use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::direction::Direction;

/// User actions that edit the map.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum EditAction {
    /// Place a normal wall at (x, y)
    PlaceWall { x: i32, y: i32 },
    /// Place or toggle a mirror side at (x, y)
    PlaceMirror { x: i32, y: i32, side: Direction },
    /// Erase the cell at (x, y)
    Erase { x: i32, y: i32 },
    /// Pick the first half of a portal pair
    PickPortalSide { x: i32, y: i32, side: Direction },
    /// Link two portal sides together
    LinkPortal {
        first: (i32, i32),
        first_side: Direction,
        second: (i32, i32),
        second_side: Direction,
    },
    /// Clear the whole map
    ClearMap,
    /// Save the map to a file
    SaveMap { path: String },
    /// Load the map from a file
    LoadMap { path: String },
}

/// Logged edit with a timestamp relative to session start.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedEdit {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    pub action: EditAction,
}

/// Session edit logger.
pub struct EditLog {
    start_time: Instant,
    entries: Vec<LoggedEdit>,
}

impl EditLog {
    pub fn new() -> Self {
        EditLog {
            start_time: Instant::now(),
            entries: Vec::new(),
        }
    }

    /// Log an edit with the current timestamp.
    pub fn log(&mut self, action: EditAction) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;
        self.entries.push(LoggedEdit { timestamp_ms, action });
    }

    pub fn entries(&self) -> &[LoggedEdit] {
        &self.entries
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), String> {
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| format!("Failed to serialize edit log: {}", e))?;
        std::fs::write(path, json).map_err(|e| format!("Failed to write edit log: {}", e))?;
        Ok(())
    }

    /// Print log to console
    pub fn print(&self) {
        println!("\n=== Edit Log ({} events) ===", self.entries.len());
        for (i, logged) in self.entries.iter().enumerate() {
            println!("[{:6}ms] #{:3} {:?}", logged.timestamp_ms, i + 1, logged.action);
        }
        println!("=== End of Log ===\n");
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut walls = 0;
        let mut mirrors = 0;
        let mut erases = 0;
        let mut links = 0;
        let mut clears = 0;

        for logged in &self.entries {
            match &logged.action {
                EditAction::PlaceWall { .. } => walls += 1,
                EditAction::PlaceMirror { .. } => mirrors += 1,
                EditAction::Erase { .. } => erases += 1,
                EditAction::LinkPortal { .. } => links += 1,
                EditAction::ClearMap => clears += 1,
                _ => {}
            }
        }

        let duration = self.entries.last().map_or(0, |last| last.timestamp_ms);

        format!(
            "Session Duration: {}ms\n\
             Total Edits: {}\n\
             Placed: {} walls, {} mirror sides, {} portal links\n\
             Erased: {} cells, {} full clears",
            duration,
            self.entries.len(),
            walls,
            mirrors,
            links,
            erases,
            clears
        )
    }
}

impl Default for EditLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_accumulate_in_order() {
        let mut log = EditLog::new();
        log.log(EditAction::PlaceWall { x: 1, y: 2 });
        log.log(EditAction::Erase { x: 1, y: 2 });
        assert_eq!(log.entries().len(), 2);
        assert!(matches!(log.entries()[0].action, EditAction::PlaceWall { x: 1, y: 2 }));
    }

    #[test]
    fn summary_counts_by_kind() {
        let mut log = EditLog::new();
        log.log(EditAction::PlaceWall { x: 0, y: 0 });
        log.log(EditAction::PlaceWall { x: 1, y: 0 });
        log.log(EditAction::ClearMap);
        let summary = log.summary();
        assert!(summary.contains("2 walls"));
        assert!(summary.contains("1 full clears"));
    }
}
