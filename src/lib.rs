//! Tile merge (workspace facade crate).
//!
//! This package exposes `tile_merge::{core,store,types}` as one public API while the
//! implementation lives in dedicated crates under `crates/`.

pub use tile_merge_core as core;
pub use tile_merge_store as store;
pub use tile_merge_types as types;
