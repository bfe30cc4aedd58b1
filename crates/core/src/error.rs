//! Error module - integration errors rejected by the engine
//!
//! The engine has no runtime failure modes. Every variant here describes a caller bug (an
//! out-of-range grid size) or a corrupt save blob, and the engine state is left untouched
//! whenever one is returned.

use std::fmt;

/// Errors returned by engine operations that can be misused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Grid size outside `MIN_GRID_SIZE..=MAX_GRID_SIZE`
    InvalidGridSize(u8),
    /// Snapshot declares more tiles than the grid has cells
    TooManyTiles { count: usize, capacity: usize },
    /// Snapshot has no tiles; a game in progress always holds at least one
    EmptyBoard,
    /// Snapshot tile lies outside the declared grid
    TileOutOfBounds { row: u8, col: u8, grid_size: u8 },
    /// Two snapshot tiles share a cell
    DuplicatePosition { row: u8, col: u8 },
    /// Snapshot tile value is not a power of two in `MIN_TILE_VALUE..=MAX_TILE_VALUE`
    InvalidTileValue { row: u8, col: u8, value: u64 },
    /// Snapshot is both waiting for a win acknowledgement and already continued
    ConflictingFlags,
}

impl EngineError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::InvalidGridSize(_) => "invalid_grid_size",
            EngineError::TooManyTiles { .. } => "too_many_tiles",
            EngineError::EmptyBoard => "empty_board",
            EngineError::TileOutOfBounds { .. } => "tile_out_of_bounds",
            EngineError::DuplicatePosition { .. } => "duplicate_position",
            EngineError::InvalidTileValue { .. } => "invalid_tile_value",
            EngineError::ConflictingFlags => "conflicting_flags",
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidGridSize(n) => {
                write!(f, "grid size {} is outside the supported range 4..=8", n)
            }
            EngineError::TooManyTiles { count, capacity } => {
                write!(f, "snapshot has {} tiles but the grid holds {}", count, capacity)
            }
            EngineError::EmptyBoard => write!(f, "snapshot has no tiles"),
            EngineError::TileOutOfBounds {
                row,
                col,
                grid_size,
            } => write!(
                f,
                "tile at ({}, {}) lies outside a {}x{} grid",
                row, col, grid_size, grid_size
            ),
            EngineError::DuplicatePosition { row, col } => {
                write!(f, "more than one tile at ({}, {})", row, col)
            }
            EngineError::InvalidTileValue { row, col, value } => write!(
                f,
                "tile at ({}, {}) has value {}, expected a power of two in 2..=2^62",
                row, col, value
            ),
            EngineError::ConflictingFlags => {
                write!(f, "snapshot is marked both won and continued")
            }
        }
    }
}

impl std::error::Error for EngineError {}
