//! Line module - slide and merge for a single row or column
//!
//! A move processes each line independently. The caller compacts the line (drops gaps, keeps
//! traversal order from the leading edge) and hands the dense tiles to [`merge_line`], which
//! runs one forward scan:
//!
//! - equal neighbours `L[i]`, `L[i+1]` become one tile of double value with a fresh id
//! - the scan skips past both sources, so a merged tile never merges again in the same move
//! - anything else is kept as-is
//!
//! `[2, 2, 2]` therefore becomes `[4, 2]`, and `[2, 2, 2, 2]` becomes `[4, 4]`.

use arrayvec::ArrayVec;

use crate::grid::Tile;
use crate::types::{TileId, MAX_GRID_SIZE};

/// Dense tiles of one line, at most one per cell
pub type LineTiles = ArrayVec<Tile, { MAX_GRID_SIZE as usize }>;

/// One merge performed during a move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRecord {
    /// Id of the tile produced by the merge
    pub merged: TileId,
    /// Ids of the two consumed tiles, in scan order
    pub sources: [TileId; 2],
}

/// Result of merging one line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineOutcome {
    pub tiles: LineTiles,
    pub merges: ArrayVec<MergeRecord, { MAX_GRID_SIZE as usize / 2 }>,
    /// Sum of the values of all merged tiles
    pub gained: u64,
}

/// Hands out monotonically increasing tile ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: TileId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn next_id(&mut self) -> TileId {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Id that the next call to `next_id` returns
    pub fn peek(&self) -> TileId {
        self.next
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge a compacted line in traversal order.
pub fn merge_line(tiles: &[Tile], ids: &mut IdAllocator) -> LineOutcome {
    let mut out = LineOutcome::default();
    let mut i = 0;

    while i < tiles.len() {
        let current = tiles[i];
        match tiles.get(i + 1) {
            Some(next) if current.merges_with(next) => {
                let value = current.value * 2;
                let merged = Tile::new(ids.next_id(), value);
                out.tiles.push(merged);
                out.merges.push(MergeRecord {
                    merged: merged.id,
                    sources: [current.id, next.id],
                });
                out.gained = out.gained.saturating_add(value);
                i += 2;
            }
            _ => {
                out.tiles.push(current);
                i += 1;
            }
        }
    }

    out
}

/// Collect the occupied cells of a line, in the order given, dropping gaps.
pub fn compact<'a>(cells: impl IntoIterator<Item = &'a Option<Tile>>) -> LineTiles {
    cells.into_iter().flatten().copied().collect()
}
