//! Grid module - manages board occupancy
//!
//! The grid is an N x N board where each cell is empty or holds one tile.
//! Uses a flat row-major buffer so moves are plain index rewrites.
//! Coordinates: (row, col), both ranging 0..N, row 0 at the top.
//! A tile's position is the slot it lives in, so it can never disagree with its coordinates.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{Direction, Position, TileId, MAX_GRID_SIZE};

/// Flat indices of one line, ordered from the leading edge
pub type LineIndices = ArrayVec<usize, { MAX_GRID_SIZE as usize }>;

/// An occupied cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub id: TileId,
    pub value: u64,
}

impl Tile {
    pub fn new(id: TileId, value: u64) -> Self {
        Self { id, value }
    }

    /// Equal values whose sum still fits in a `u64`
    pub fn merges_with(&self, other: &Tile) -> bool {
        self.value == other.value && self.value.checked_mul(2).is_some()
    }
}

/// A cell on the grid
pub type Cell = Option<Tile>;

/// The game grid - N x N cells using flat buffer storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: u8,
    /// Flat buffer of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new empty grid. Range checking of `size` is the engine's job.
    pub fn new(size: u8) -> Self {
        let n = size as usize;
        Self {
            size,
            cells: vec![None; n * n],
        }
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        Some((pos.row as usize) * (self.size as usize) + (pos.col as usize))
    }

    /// Position of a flat index
    #[inline(always)]
    pub fn position(&self, idx: usize) -> Position {
        let n = self.size as usize;
        Position::new((idx / n) as u8, (idx % n) as u8)
    }

    /// Side length of the grid
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Get cell at position. Returns None if out of bounds.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Set cell at position. Returns false if out of bounds.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Whether the position is inside the grid and holds a tile
    pub fn is_occupied(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Some(_)))
    }

    /// Flat indices of line `i` for `direction`, starting at the leading edge.
    ///
    /// Left/right lines are rows, up/down lines are columns.
    pub fn line(&self, direction: Direction, i: usize) -> LineIndices {
        let n = self.size as usize;
        let mut out = LineIndices::new();
        for k in 0..n {
            let (row, col) = match direction {
                Direction::Left => (i, k),
                Direction::Right => (i, n - 1 - k),
                Direction::Up => (k, i),
                Direction::Down => (n - 1 - k, i),
            };
            out.push(row * n + col);
        }
        out
    }

    /// Read-only view of the flat buffer
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Positions of all empty cells in row-major order
    pub fn empty_positions(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| self.position(idx))
            .collect()
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }

    /// Occupied cells with their positions, row-major
    pub fn occupied(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|tile| (self.position(idx), tile)))
    }

    /// Largest tile value on the grid, 0 when empty
    pub fn max_value(&self) -> u64 {
        self.cells
            .iter()
            .flatten()
            .map(|tile| tile.value)
            .max()
            .unwrap_or(0)
    }

    /// Whether any move could change the board: an empty cell exists, or two orthogonal
    /// neighbours hold equal values.
    pub fn has_available_move(&self) -> bool {
        let n = self.size as usize;
        for row in 0..n {
            for col in 0..n {
                let Some(tile) = self.cells[row * n + col] else {
                    return true;
                };
                if col + 1 < n {
                    if let Some(right) = self.cells[row * n + col + 1] {
                        if tile.merges_with(&right) {
                            return true;
                        }
                    }
                }
                if row + 1 < n {
                    if let Some(below) = self.cells[(row + 1) * n + col] {
                        if tile.merges_with(&below) {
                            return true;
                        }
                    }
                }
            }
        }
        false
    }

    /// Clear the entire grid
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = None;
        }
    }

    /// Plain value matrix, 0 for empty cells
    pub fn to_values(&self) -> Vec<Vec<u64>> {
        self.cells
            .chunks(self.size as usize)
            .map(|row| row.iter().map(|c| c.map_or(0, |t| t.value)).collect())
            .collect()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.max_value().max(2).to_string().len();
        for row in self.cells.chunks(self.size as usize) {
            let mut first = true;
            for cell in row {
                if !first {
                    f.write_str(" ")?;
                }
                first = false;
                match cell {
                    Some(tile) => write!(f, "{:>width$}", tile.value, width = width)?,
                    None => write!(f, "{:>width$}", ".", width = width)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
