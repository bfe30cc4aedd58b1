//! Persistence collaborator for the tile-merge engine
//!
//! The engine only knows how to produce and consume a [`SaveSnapshot`](tile_merge_core::SaveSnapshot)
//! and a best score. This crate is the outside world around it:
//!
//! - [`config`]: where data lives (`TILE_MERGE_DATA_DIR`, `TILE_MERGE_GAME_KEY`)
//! - [`store`]: key-value blob storage and the append-only stats sink, in memory or on disk
//! - [`stats`]: the per-session record reported when a session ends
//! - [`session`]: [`GameSession`], which owns an engine and keeps the store in sync
//!
//! # Keys
//!
//! All keys are scoped under the configured game key (default `2048`):
//!
//! | Key | Content |
//! |-----|---------|
//! | `<game>.save` | JSON `SaveSnapshot` of the game in progress |
//! | `<game>.best` | Historical best score as a decimal string |
//!
//! Session records are appended to the stats sink (`stats.jsonl` for [`FileStore`]).

pub mod config;
pub mod session;
pub mod stats;
pub mod store;

pub use config::StoreConfig;
pub use session::{GameSession, ResumeOutcome};
pub use stats::SessionRecord;
pub use store::{FileStore, KeyValueStore, MemoryStore, StatsSink};
