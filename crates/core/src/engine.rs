//! Engine module - owns the board and applies moves
//!
//! This module ties together the grid, the line merge, the spawn source and the save format.
//! It handles move application, spawning, win/loss detection, score bookkeeping and the game
//! lifecycle (reset, resize, continue, resume).
//!
//! Every operation runs to completion synchronously. The engine mutates itself in place and is
//! not meant to be shared between callers without external locking.

use arrayvec::ArrayVec;
use tracing::{debug, info, warn};

use crate::error::EngineError;
use crate::grid::{Grid, Tile};
use crate::line::{compact, merge_line, IdAllocator, MergeRecord};
use crate::rng::{SimpleRng, SpawnSource};
use crate::snapshot::{GameState, SaveSnapshot, SavedTile, TileView};
use crate::types::*;

/// Board after a move that changed something
struct Slide {
    grid: Grid,
    merges: Vec<MergeRecord>,
    gained: u64,
}

/// The tile-merging puzzle engine
#[derive(Debug, Clone)]
pub struct GridEngine<R: SpawnSource = SimpleRng> {
    grid: Grid,
    source: R,
    ids: IdAllocator,
    score: u64,
    /// High-water mark of every score seen by this instance, survives reset and resize.
    best_score: u64,
    target: u64,
    /// Target reached and not yet acknowledged.
    won: bool,
    /// Player acknowledged a win; no further win is raised this game.
    continued: bool,
    game_over: bool,
    /// Successful moves in the current game.
    moves: u32,
    // Render hints describing the last board change only.
    last_spawned: ArrayVec<TileId, INITIAL_TILES>,
    last_merges: Vec<MergeRecord>,
}

impl GridEngine<SimpleRng> {
    /// Create a new game of `grid_size` x `grid_size` with the given RNG seed.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidGridSize`] when `grid_size` is outside 4..=8.
    pub fn new(grid_size: u8, seed: u32) -> Result<Self, EngineError> {
        Self::with_source(grid_size, SimpleRng::new(seed))
    }
}

impl<R: SpawnSource> GridEngine<R> {
    /// Create a new game that draws spawns from `source`.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidGridSize`] when `grid_size` is outside 4..=8.
    pub fn with_source(grid_size: u8, source: R) -> Result<Self, EngineError> {
        if !is_valid_grid_size(grid_size) {
            return Err(EngineError::InvalidGridSize(grid_size));
        }
        Ok(Self::build(grid_size, source))
    }

    fn build(grid_size: u8, source: R) -> Self {
        let mut engine = Self {
            grid: Grid::new(grid_size),
            source,
            ids: IdAllocator::new(),
            score: 0,
            best_score: 0,
            target: DEFAULT_TARGET,
            won: false,
            continued: false,
            game_over: false,
            moves: 0,
            last_spawned: ArrayVec::new(),
            last_merges: Vec::new(),
        };
        engine.start_board();
        engine
    }

    /// Use a different target value for the `won` flag.
    pub fn with_target(mut self, target: u64) -> Self {
        self.target = target.max(MIN_TILE_VALUE * 2);
        self.refresh_flags();
        self
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_size(&self) -> u8 {
        self.grid.size()
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn won(&self) -> bool {
        self.won
    }

    pub fn continued(&self) -> bool {
        self.continued
    }

    pub fn target(&self) -> u64 {
        self.target
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn max_tile(&self) -> u64 {
        self.grid.max_value()
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    /// Discard the board, clear score and flags, spawn the initial tiles.
    fn start_board(&mut self) {
        self.grid.clear();
        self.score = 0;
        self.won = false;
        self.continued = false;
        self.game_over = false;
        self.moves = 0;
        self.last_merges.clear();
        self.last_spawned.clear();

        for _ in 0..INITIAL_TILES {
            if let Some(id) = self.spawn_tile() {
                self.last_spawned.push(id);
            }
        }
        self.refresh_flags();
    }

    /// Spawn one tile into a random empty cell. Returns its id, or None on a full grid.
    fn spawn_tile(&mut self) -> Option<TileId> {
        let empty = self.grid.empty_positions();
        if empty.is_empty() {
            return None;
        }

        let pick = self.source.pick_cell(&empty).min(empty.len() - 1);
        let pos = empty[pick];
        let mut value = self.source.pick_value();
        if value < MIN_TILE_VALUE || !value.is_power_of_two() {
            warn!(value, "spawn source returned an invalid value, using {}", MIN_TILE_VALUE);
            value = MIN_TILE_VALUE;
        }

        let tile = Tile::new(self.ids.next_id(), value);
        self.grid.set(pos, Some(tile));
        debug!(row = pos.row, col = pos.col, value, "spawned tile");
        Some(tile.id)
    }

    /// Recompute `won` and `game_over` from the board.
    fn refresh_flags(&mut self) {
        if !self.won && !self.continued && self.grid.max_value() >= self.target {
            self.won = true;
            info!(target_value = self.target, score = self.score, "target tile reached");
        }

        let was_over = self.game_over;
        self.game_over = !self.grid.has_available_move();
        if self.game_over && !was_over {
            info!(score = self.score, moves = self.moves, "no moves left");
        }
    }

    /// Slide every line of `grid` towards `direction`'s edge.
    ///
    /// Returns None when nothing moved and nothing merged. Ids for merged tiles come from
    /// `ids`, so callers pass a copy when they only want to probe.
    fn slide(grid: &Grid, direction: Direction, ids: &mut IdAllocator) -> Option<Slide> {
        let mut next = grid.clone();
        let mut merges = Vec::new();
        let mut gained = 0;
        let mut changed = false;

        for i in 0..grid.size() as usize {
            let indices = grid.line(direction, i);
            let dense = compact(indices.iter().map(|&idx| &grid.cells()[idx]));
            let outcome = merge_line(&dense, ids);

            for (k, &idx) in indices.iter().enumerate() {
                let cell = outcome.tiles.get(k).copied();
                if cell != grid.cells()[idx] {
                    changed = true;
                }
                next.cells_mut()[idx] = cell;
            }

            merges.extend(outcome.merges);
            gained = outcome.gained.saturating_add(gained);
        }

        changed.then_some(Slide {
            grid: next,
            merges,
            gained,
        })
    }

    /// Apply a move. Returns whether the board changed.
    ///
    /// A move that changes nothing leaves the grid, score and ids untouched and spawns nothing.
    /// After game over every move returns false.
    pub fn move_tiles(&mut self, direction: Direction) -> bool {
        if self.game_over {
            return false;
        }

        let mut ids = self.ids;
        let Some(slide) = Self::slide(&self.grid, direction, &mut ids) else {
            debug!(direction = direction.as_str(), "move changed nothing");
            return false;
        };

        self.grid = slide.grid;
        self.ids = ids;
        self.score = self.score.saturating_add(slide.gained);
        self.best_score = self.best_score.max(self.score);
        self.moves = self.moves.wrapping_add(1);
        self.last_merges = slide.merges;
        self.last_spawned.clear();

        debug!(
            direction = direction.as_str(),
            merges = self.last_merges.len(),
            gained = slide.gained,
            score = self.score,
            "move applied"
        );

        if let Some(id) = self.spawn_tile() {
            self.last_spawned.push(id);
        }
        self.refresh_flags();

        true
    }

    /// Whether a move in `direction` would change the board
    pub fn can_move(&self, direction: Direction) -> bool {
        if self.game_over {
            return false;
        }
        let mut ids = self.ids;
        Self::slide(&self.grid, direction, &mut ids).is_some()
    }

    /// Legal moves in [`Direction::ALL`] order: `[up, down, left, right]`
    pub fn legal_moves(&self) -> [bool; 4] {
        Direction::ALL.map(|d| self.can_move(d))
    }

    /// Start over on the same grid size. Best score is kept.
    pub fn reset(&mut self) {
        info!(
            grid_size = self.grid.size(),
            score = self.score,
            "resetting game"
        );
        self.start_board();
    }

    /// Destructively resize: discards the board and score, keeps the best score.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidGridSize`] when `n` is outside 4..=8; nothing changes.
    pub fn set_grid_size(&mut self, n: u8) -> Result<(), EngineError> {
        if !is_valid_grid_size(n) {
            return Err(EngineError::InvalidGridSize(n));
        }
        info!(from = self.grid.size(), to = n, "resizing grid");
        self.grid = Grid::new(n);
        self.start_board();
        Ok(())
    }

    /// Acknowledge a win and keep playing. No-op when no win is pending.
    ///
    /// Returns whether a pending win was acknowledged.
    pub fn continue_game(&mut self) -> bool {
        if !self.won {
            return false;
        }
        self.won = false;
        self.continued = true;
        info!(score = self.score, "continuing after win");
        true
    }

    /// Raise the best score to `value` if it is larger.
    pub fn update_best_score(&mut self, value: u64) {
        self.best_score = self.best_score.max(value);
    }

    /// Apply a text-level command.
    ///
    /// Returns whether the engine state changed.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidGridSize`] for an out-of-range `SetGridSize`.
    pub fn apply(&mut self, command: Command) -> Result<bool, EngineError> {
        match command {
            Command::Move(direction) => Ok(self.move_tiles(direction)),
            Command::Reset => {
                self.reset();
                Ok(true)
            }
            Command::SetGridSize(n) => {
                self.set_grid_size(n)?;
                Ok(true)
            }
            Command::Continue => Ok(self.continue_game()),
        }
    }

    /// Write the observable state into `out`, reusing its allocations.
    pub fn state_into(&self, out: &mut GameState) {
        let n = self.grid.size() as usize;

        out.grid.resize_with(n, Vec::new);
        for (r, row) in out.grid.iter_mut().enumerate() {
            row.clear();
            for c in 0..n {
                let cell = self.grid.cells()[r * n + c];
                row.push(cell.map(|tile| self.tile_view(tile, r, c)));
            }
        }

        out.score = self.score;
        out.best_score = self.best_score;
        out.game_over = self.game_over;
        out.won = self.won;
        out.grid_size = self.grid.size();
    }

    fn tile_view(&self, tile: Tile, row: usize, col: usize) -> TileView {
        TileView {
            id: tile.id,
            value: tile.value,
            row: row as u8,
            col: col as u8,
            is_new: self.last_spawned.contains(&tile.id),
            merged_from: self
                .last_merges
                .iter()
                .find(|m| m.merged == tile.id)
                .map(|m| m.sources),
        }
    }

    /// Read-only snapshot of the observable state
    pub fn state(&self) -> GameState {
        let mut s = GameState::default();
        self.state_into(&mut s);
        s
    }

    /// Export the data needed to resume this game.
    pub fn save_data(&self) -> SaveSnapshot {
        SaveSnapshot {
            grid_size: self.grid.size(),
            tiles: self
                .grid
                .occupied()
                .map(|(pos, tile)| SavedTile::new(pos.row, pos.col, tile.value))
                .collect(),
            score: self.score,
            won: self.won,
            continued: self.continued,
            moves: self.moves,
        }
    }

    /// Replace the game with `snapshot`. Tiles get fresh ids.
    ///
    /// The best score is raised to the snapshot's score but otherwise kept.
    ///
    /// # Errors
    ///
    /// Any structural error from [`SaveSnapshot::validate`]; the engine is left untouched.
    pub fn load_from_save(&mut self, snapshot: &SaveSnapshot) -> Result<(), EngineError> {
        if let Err(err) = snapshot.validate() {
            warn!(code = err.code(), "rejected save snapshot: {}", err);
            return Err(err);
        }

        let mut grid = Grid::new(snapshot.grid_size);
        for saved in &snapshot.tiles {
            grid.set(saved.position(), Some(Tile::new(self.ids.next_id(), saved.value)));
        }

        self.grid = grid;
        self.score = snapshot.score;
        self.best_score = self.best_score.max(snapshot.score);
        self.won = snapshot.won;
        self.continued = snapshot.continued;
        self.moves = snapshot.moves;
        self.last_merges.clear();
        self.last_spawned.clear();
        self.game_over = !self.grid.has_available_move();

        info!(
            grid_size = snapshot.grid_size,
            tiles = snapshot.tiles.len(),
            score = snapshot.score,
            "resumed saved game"
        );
        Ok(())
    }
}

impl Default for GridEngine<SimpleRng> {
    fn default() -> Self {
        Self::build(DEFAULT_GRID_SIZE, SimpleRng::default())
    }
}
