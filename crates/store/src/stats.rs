//! Session stats - one record per finished play session

use serde::{Deserialize, Serialize};
use tile_merge_core::{GridEngine, SpawnSource};

/// Summary of one play session, appended to the stats sink when the session ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub game_key: String,
    pub grid_size: u8,
    pub score: u64,
    pub best_score: u64,
    pub max_tile: u64,
    pub moves: u32,
    pub won: bool,
    pub game_over: bool,
    pub duration_ms: u64,
}

impl SessionRecord {
    /// Summarize the engine's current game
    pub fn from_engine<R: SpawnSource>(
        game_key: &str,
        engine: &GridEngine<R>,
        duration_ms: u64,
    ) -> Self {
        Self {
            game_key: game_key.to_string(),
            grid_size: engine.grid_size(),
            score: engine.score(),
            best_score: engine.best_score(),
            max_tile: engine.max_tile(),
            moves: engine.moves(),
            // A continued game has already reached the target.
            won: engine.won() || engine.continued(),
            game_over: engine.game_over(),
            duration_ms,
        }
    }
}
