//! Game session - owns one engine and keeps its store in sync
//!
//! This is the "current game" context the engine expects around it: it serializes calls into
//! the engine, persists the snapshot and best score after every change, and reports the session
//! to the stats sink when it ends.

use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use tile_merge_core::{GridEngine, SaveSnapshot, SimpleRng, SpawnSource};
use tile_merge_types::Command;

use crate::config::StoreConfig;
use crate::stats::SessionRecord;
use crate::store::{KeyValueStore, StatsSink};

/// How a session obtained its board when it was opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// No saved game existed
    Fresh,
    /// The saved game was loaded
    Resumed,
    /// A saved game existed but was unusable; a new game was started
    Discarded,
}

pub struct GameSession<S, R = SimpleRng>
where
    S: KeyValueStore + StatsSink,
    R: SpawnSource,
{
    store: S,
    engine: GridEngine<R>,
    config: StoreConfig,
    outcome: ResumeOutcome,
}

impl<S, R> GameSession<S, R>
where
    S: KeyValueStore + StatsSink,
    R: SpawnSource,
{
    /// Seed the engine's best score from the store and resume the saved game if there is one.
    ///
    /// An unreadable or structurally invalid save is logged and replaced by a fresh game.
    ///
    /// # Errors
    ///
    /// Only store I/O failures; bad blobs never fail the open.
    pub fn open(store: S, engine: GridEngine<R>, config: StoreConfig) -> Result<Self> {
        let mut session = Self {
            store,
            engine,
            config,
            outcome: ResumeOutcome::Fresh,
        };
        session.load_best()?;
        session.outcome = session.resume()?;
        Ok(session)
    }

    fn load_best(&mut self) -> Result<()> {
        let key = self.config.best_key();
        let Some(text) = self.store.get(&key)? else {
            return Ok(());
        };
        match text.trim().parse::<u64>() {
            Ok(best) => self.engine.update_best_score(best),
            Err(err) => warn!(key = %key, "ignoring unreadable best score: {}", err),
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<ResumeOutcome> {
        let key = self.config.save_key();
        let Some(blob) = self.store.get(&key)? else {
            return Ok(ResumeOutcome::Fresh);
        };

        let loaded = SaveSnapshot::from_json(&blob)
            .map_err(anyhow::Error::from)
            .and_then(|snapshot| {
                self.engine
                    .load_from_save(&snapshot)
                    .map_err(anyhow::Error::from)
            });

        match loaded {
            Ok(()) => Ok(ResumeOutcome::Resumed),
            Err(err) => {
                warn!(key = %key, "discarding saved game: {:#}", err);
                self.engine.reset();
                self.save()?;
                Ok(ResumeOutcome::Discarded)
            }
        }
    }

    pub fn outcome(&self) -> ResumeOutcome {
        self.outcome
    }

    pub fn engine(&self) -> &GridEngine<R> {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GridEngine<R> {
        &mut self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Forward a command to the engine and persist the result if anything changed.
    ///
    /// # Errors
    ///
    /// Engine rejections (out-of-range grid size) and store failures.
    pub fn apply(&mut self, command: Command) -> Result<bool> {
        let changed = self.engine.apply(command)?;
        if changed {
            self.save()?;
        }
        Ok(changed)
    }

    /// Persist the current snapshot and best score.
    pub fn save(&mut self) -> Result<()> {
        let blob = self
            .engine
            .save_data()
            .to_json()
            .context("failed to encode save snapshot")?;
        self.store.set(&self.config.save_key(), &blob)?;
        self.store
            .set(&self.config.best_key(), &self.engine.best_score().to_string())?;
        Ok(())
    }

    /// End the session: report it to the stats sink and keep the save only if play can go on.
    pub fn finish(&mut self, duration: Duration) -> Result<SessionRecord> {
        let duration_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        let record = SessionRecord::from_engine(&self.config.game_key, &self.engine, duration_ms);
        self.store.append(&record)?;

        if self.engine.game_over() {
            self.store.remove(&self.config.save_key())?;
            self.store
                .set(&self.config.best_key(), &self.engine.best_score().to_string())?;
        } else {
            self.save()?;
        }

        info!(
            score = record.score,
            best = record.best_score,
            moves = record.moves,
            duration_ms,
            "session finished"
        );
        Ok(record)
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
