//! Snapshot module - read-only state view and persisted save data
//!
//! [`GameState`] is what the presentation layer renders. It carries the one-move render hints
//! (`is_new`, `merged_from`) that are recomputed every time it is produced.
//!
//! [`SaveSnapshot`] is the minimal blob needed to resume a game. It never carries ids or render
//! hints; a reloaded game gets fresh ids.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::types::{is_valid_grid_size, Position, TileId, MAX_TILE_VALUE, MIN_TILE_VALUE};

/// A tile as seen by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub id: TileId,
    pub value: u64,
    pub row: u8,
    pub col: u8,
    /// Spawned by the last board change
    pub is_new: bool,
    /// Produced by a merge during the last move
    pub merged_from: Option<[TileId; 2]>,
}

/// Externally observable engine state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub grid: Vec<Vec<Option<TileView>>>,
    pub score: u64,
    pub best_score: u64,
    pub game_over: bool,
    pub won: bool,
    pub grid_size: u8,
}

impl GameState {
    /// Value matrix with 0 for empty cells.
    ///
    /// Useful for comparing states while ignoring ids and render hints.
    pub fn values(&self) -> Vec<Vec<u64>> {
        self.grid
            .iter()
            .map(|row| row.iter().map(|c| c.map_or(0, |t| t.value)).collect())
            .collect()
    }

    /// All tiles, row-major
    pub fn tiles(&self) -> impl Iterator<Item = &TileView> + '_ {
        self.grid.iter().flat_map(|row| row.iter().flatten())
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            grid: Vec::new(),
            score: 0,
            best_score: 0,
            game_over: false,
            won: false,
            grid_size: 0,
        }
    }
}

/// One tile in a save blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SavedTile {
    pub row: u8,
    pub col: u8,
    pub value: u64,
}

impl SavedTile {
    pub fn new(row: u8, col: u8, value: u64) -> Self {
        Self { row, col, value }
    }

    pub fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

/// Everything needed to resume a game exactly where it was saved.
///
/// `best_score` is deliberately absent: it is tracked by whoever owns the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveSnapshot {
    pub grid_size: u8,
    pub tiles: Vec<SavedTile>,
    pub score: u64,
    /// Target reached and not yet acknowledged
    pub won: bool,
    /// Player chose to keep playing after a win
    pub continued: bool,
    /// Successful moves in this game
    #[serde(default)]
    pub moves: u32,
}

impl SaveSnapshot {
    /// Check the structural rules a snapshot must satisfy before it is loaded.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidGridSize`] when `grid_size` is outside 4..=8
    /// - [`EngineError::TooManyTiles`] / [`EngineError::EmptyBoard`] for a wrong tile count
    /// - [`EngineError::TileOutOfBounds`] / [`EngineError::DuplicatePosition`] for bad positions
    /// - [`EngineError::InvalidTileValue`] when a value is not a power of two in 2..=2^62
    /// - [`EngineError::ConflictingFlags`] when both `won` and `continued` are set
    pub fn validate(&self) -> Result<(), EngineError> {
        if !is_valid_grid_size(self.grid_size) {
            return Err(EngineError::InvalidGridSize(self.grid_size));
        }

        let capacity = (self.grid_size as usize) * (self.grid_size as usize);
        if self.tiles.len() > capacity {
            return Err(EngineError::TooManyTiles {
                count: self.tiles.len(),
                capacity,
            });
        }
        if self.tiles.is_empty() {
            return Err(EngineError::EmptyBoard);
        }
        if self.won && self.continued {
            return Err(EngineError::ConflictingFlags);
        }

        let mut seen = HashSet::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            if tile.row >= self.grid_size || tile.col >= self.grid_size {
                return Err(EngineError::TileOutOfBounds {
                    row: tile.row,
                    col: tile.col,
                    grid_size: self.grid_size,
                });
            }
            if !seen.insert(tile.position()) {
                return Err(EngineError::DuplicatePosition {
                    row: tile.row,
                    col: tile.col,
                });
            }
            let in_range = (MIN_TILE_VALUE..=MAX_TILE_VALUE).contains(&tile.value);
            if !in_range || !tile.value.is_power_of_two() {
                return Err(EngineError::InvalidTileValue {
                    row: tile.row,
                    col: tile.col,
                    value: tile.value,
                });
            }
        }

        Ok(())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tiles: Vec<SavedTile>) -> SaveSnapshot {
        SaveSnapshot {
            grid_size: 4,
            tiles,
            score: 0,
            won: false,
            continued: false,
            moves: 0,
        }
    }

    #[test]
    fn test_validate_accepts_well_formed() {
        let s = snapshot(vec![SavedTile::new(0, 0, 2), SavedTile::new(3, 3, 2048)]);
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_grid_size() {
        let mut s = snapshot(vec![]);
        s.grid_size = 3;
        assert_eq!(s.validate(), Err(EngineError::InvalidGridSize(3)));
    }

    #[test]
    fn test_validate_rejects_duplicates() {
        let s = snapshot(vec![SavedTile::new(1, 1, 2), SavedTile::new(1, 1, 4)]);
        assert_eq!(
            s.validate(),
            Err(EngineError::DuplicatePosition { row: 1, col: 1 })
        );
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let s = snapshot(vec![SavedTile::new(0, 4, 2)]);
        assert!(matches!(
            s.validate(),
            Err(EngineError::TileOutOfBounds { row: 0, col: 4, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_power_of_two() {
        for value in [0, 1, 3, 6, 12, 1 << 63] {
            let s = snapshot(vec![SavedTile::new(0, 0, value)]);
            assert!(
                matches!(s.validate(), Err(EngineError::InvalidTileValue { .. })),
                "value {} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_validate_accepts_value_ceiling() {
        let s = snapshot(vec![SavedTile::new(0, 0, MAX_TILE_VALUE)]);
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_empty_board() {
        assert_eq!(snapshot(vec![]).validate(), Err(EngineError::EmptyBoard));
    }

    #[test]
    fn test_validate_rejects_won_and_continued() {
        let mut s = snapshot(vec![SavedTile::new(0, 0, 2048)]);
        s.won = true;
        s.continued = true;
        assert_eq!(s.validate(), Err(EngineError::ConflictingFlags));
    }

    #[test]
    fn test_validate_rejects_too_many_tiles() {
        let tiles = (0..17).map(|i| SavedTile::new(i / 4, i % 4, 2)).collect();
        let s = snapshot(tiles);
        assert_eq!(
            s.validate(),
            Err(EngineError::TooManyTiles {
                count: 17,
                capacity: 16
            })
        );
    }

    #[test]
    fn test_json_uses_camel_case_and_defaults_moves() {
        let s = snapshot(vec![SavedTile::new(2, 1, 8)]);
        let json = s.to_json().unwrap();
        assert!(json.contains("\"gridSize\":4"));
        assert!(json.contains("\"continued\":false"));

        let legacy = r#"{"gridSize":5,"tiles":[],"score":12,"won":false,"continued":true}"#;
        let parsed = SaveSnapshot::from_json(legacy).unwrap();
        assert_eq!(parsed.grid_size, 5);
        assert_eq!(parsed.moves, 0);
        assert!(parsed.continued);
    }
}
