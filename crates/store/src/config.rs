//! Store configuration

use std::path::PathBuf;

/// Where saved games and session stats live
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    /// Fixed identifier every key of this game is scoped under
    pub game_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".tile-merge"),
            game_key: "2048".to_string(),
        }
    }
}

impl StoreConfig {
    /// Create from environment variables, falling back to the defaults
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();

        let data_dir = env::var("TILE_MERGE_DATA_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let game_key = env::var("TILE_MERGE_GAME_KEY")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .unwrap_or(defaults.game_key);

        Self { data_dir, game_key }
    }

    /// Key of the saved game blob
    pub fn save_key(&self) -> String {
        format!("{}.save", self.game_key)
    }

    /// Key of the historical best score
    pub fn best_key(&self) -> String {
        format!("{}.best", self.game_key)
    }
}
