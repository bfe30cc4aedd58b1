//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the tile-merging rules, state management, and save format.
//! It has **no dependencies** on rendering, input devices, or storage, making it:
//!
//! - **Deterministic**: Same seed (or scripted spawns) produces identical games
//! - **Testable**: Every rule is reachable through the public engine API
//! - **Portable**: Can sit behind a terminal, a web page, or a headless driver
//!
//! # Module Structure
//!
//! - [`grid`]: N x N board with line extraction and the move-availability scan
//! - [`line`]: single-pass slide and merge of one row or column
//! - [`engine`]: [`GridEngine`], moves, spawning, win/loss flags, scores, lifecycle
//! - [`rng`]: spawn sources (seedable LCG and scripted spawns)
//! - [`snapshot`]: render-facing [`GameState`] and persisted [`SaveSnapshot`]
//! - [`error`]: [`EngineError`] for rejected calls and corrupt saves
//!
//! # Game Rules
//!
//! - **Move**: every line slides towards the chosen edge; equal neighbours merge once
//! - **Spawn**: after a board-changing move one tile appears in a random empty cell (2: 90%, 4: 10%)
//! - **Won**: raised the first time a tile reaches the target (2048); `continue_game` clears it
//! - **Game over**: no empty cell and no equal orthogonal neighbours
//! - **Score**: sum of all merged values; the best score survives reset and resize
//!
//! # Example
//!
//! ```
//! use tile_merge_core::GridEngine;
//! use tile_merge_types::Direction;
//!
//! let mut game = GridEngine::new(4, 12345).unwrap();
//! assert_eq!(game.grid().occupied().count(), 2);
//!
//! for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
//!     game.move_tiles(direction);
//! }
//!
//! let state = game.state();
//! assert_eq!(state.grid_size, 4);
//! assert!(state.best_score >= state.score);
//!
//! // Resume the same position elsewhere
//! let mut other = GridEngine::new(4, 1).unwrap();
//! other.load_from_save(&game.save_data()).unwrap();
//! assert_eq!(other.state().values(), state.values());
//! ```

pub mod engine;
pub mod error;
pub mod grid;
pub mod line;
pub mod rng;
pub mod snapshot;

pub use tile_merge_types as types;

// Re-export commonly used types for convenience
pub use engine::GridEngine;
pub use error::EngineError;
pub use grid::{Grid, Tile};
pub use line::{merge_line, MergeRecord};
pub use rng::{ScriptedSpawns, SimpleRng, SpawnSource};
pub use snapshot::{GameState, SaveSnapshot, SavedTile, TileView};
