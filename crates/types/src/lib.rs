//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine and its
//! collaborators. All types are pure data structures with no external dependencies, making
//! them usable in any context (core logic, persistence, text drivers).
//!
//! # Grid Dimensions
//!
//! The board is a square grid of `N x N` cells:
//!
//! - **Minimum**: 4x4 (the classic board)
//! - **Maximum**: 8x8
//! - **Coordinates**: `(row, col)`, both 0-indexed, row 0 at the top
//!
//! # Game Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_GRID_SIZE` | 4 | Smallest accepted grid size |
//! | `MAX_GRID_SIZE` | 8 | Largest accepted grid size |
//! | `DEFAULT_GRID_SIZE` | 4 | Grid size used when none is given |
//! | `DEFAULT_TARGET` | 2048 | Tile value that raises the `won` flag |
//! | `INITIAL_TILES` | 2 | Tiles spawned on a fresh board |
//! | `SPAWN_FOUR_PER_MILLE` | 100 | Chance (out of 1000) that a spawn is a 4 |
//! | `MAX_TILE_VALUE` | 2^62 | Largest tile value accepted from a save |
//!
//! # Examples
//!
//! ```
//! use tile_merge_types::{Command, Direction, DEFAULT_TARGET, MAX_GRID_SIZE};
//!
//! // Parse a direction (case-insensitive)
//! assert_eq!(Direction::from_str("Left"), Some(Direction::Left));
//! assert_eq!(Direction::from_str("u"), Some(Direction::Up));
//!
//! // Parse a text command
//! assert_eq!(Command::from_str("size 5"), Some(Command::SetGridSize(5)));
//! assert_eq!(Command::from_str("continue"), Some(Command::Continue));
//!
//! assert_eq!(DEFAULT_TARGET, 2048);
//! assert_eq!(MAX_GRID_SIZE, 8);
//! ```

/// Smallest accepted grid size (4x4)
pub const MIN_GRID_SIZE: u8 = 4;

/// Largest accepted grid size (8x8)
pub const MAX_GRID_SIZE: u8 = 8;

/// Grid size used by default
pub const DEFAULT_GRID_SIZE: u8 = 4;

/// Tile value that triggers the `won` flag by convention
pub const DEFAULT_TARGET: u64 = 2048;

/// Tiles spawned when a board is (re)initialized
pub const INITIAL_TILES: usize = 2;

/// Probability of spawning a 4 instead of a 2, out of 1000
pub const SPAWN_FOUR_PER_MILLE: u32 = 100;

/// Smallest tile value
pub const MIN_TILE_VALUE: u64 = 2;

/// Largest tile value a save may carry. Two of them still merge without overflowing `u64`.
pub const MAX_TILE_VALUE: u64 = 1 << 62;

/// Opaque tile identifier.
///
/// Ids are stable across moves until a tile is consumed by a merge. They are not persisted;
/// a reloaded game gets fresh ids.
pub type TileId = u32;

/// Whether `n` is inside the accepted grid size range.
pub fn is_valid_grid_size(n: u8) -> bool {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_size_bounds() {
        assert!(!is_valid_grid_size(3));
        assert!(is_valid_grid_size(4));
        assert!(is_valid_grid_size(8));
        assert!(!is_valid_grid_size(9));
    }

    #[test]
    fn spawn_odds_are_one_in_ten() {
        assert_eq!(SPAWN_FOUR_PER_MILLE, 100);
        assert_eq!(MIN_TILE_VALUE, 2);
        assert_eq!(INITIAL_TILES, 2);
        assert!(MAX_TILE_VALUE.is_power_of_two());
        assert!(MAX_TILE_VALUE.checked_mul(2).is_some());
    }
}

/// The four move directions
///
/// Each direction names the edge tiles slide towards (the *leading edge*):
/// - **Up**: row 0
/// - **Down**: row N-1
/// - **Left**: column 0
/// - **Right**: column N-1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions, in the order used by `legal_moves`
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Parse direction from string (case-insensitive, single-letter aliases accepted)
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_types::Direction;
    ///
    /// assert_eq!(Direction::from_str("up"), Some(Direction::Up));
    /// assert_eq!(Direction::from_str("RIGHT"), Some(Direction::Right));
    /// assert_eq!(Direction::from_str("d"), Some(Direction::Down));
    /// assert_eq!(Direction::from_str("sideways"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// Commands the presentation layer forwards to the engine
///
/// These commands are used by both interactive drivers and scripted play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Slide all tiles towards an edge
    Move(Direction),
    /// Discard the board and score, respawn two tiles
    Reset,
    /// Destructively resize the board (range checked by the engine)
    SetGridSize(u8),
    /// Acknowledge a win and keep playing
    Continue,
}

impl Command {
    /// Parse a text command
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_merge_types::{Command, Direction};
    ///
    /// assert_eq!(Command::from_str("left"), Some(Command::Move(Direction::Left)));
    /// assert_eq!(Command::from_str("reset"), Some(Command::Reset));
    /// assert_eq!(Command::from_str("size 6"), Some(Command::SetGridSize(6)));
    /// assert_eq!(Command::from_str("size"), None);
    /// assert_eq!(Command::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let mut parts = s.split_whitespace();
        let head = parts.next()?.to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            return None;
        }

        match (head.as_str(), arg) {
            ("reset" | "restart", None) => Some(Command::Reset),
            ("continue", None) => Some(Command::Continue),
            ("size", Some(n)) => n.parse().ok().map(Command::SetGridSize),
            (other, None) => Direction::from_str(other).map(Command::Move),
            _ => None,
        }
    }
}

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}
