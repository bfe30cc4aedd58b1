//! Headless tile-merge runner (default binary).
//!
//! Reads one command per line from stdin (`up`, `down`, `left`, `right`, `reset`, `size <n>`,
//! `continue`, `quit`), applies it to the saved game and prints the board after each command.
//! The game is persisted under the data directory so the next run resumes it.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tile_merge::core::{GridEngine, SimpleRng};
use tile_merge::store::{FileStore, GameSession, StoreConfig};
use tile_merge::types::{Command, DEFAULT_GRID_SIZE, DEFAULT_TARGET};

#[derive(Parser, Debug)]
struct Args {
    /// Grid size for a new game (4-8). Ignored when a saved game is resumed.
    #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
    size: u8,
    /// Spawn RNG seed (random when omitted).
    #[arg(long)]
    seed: Option<u32>,
    /// Tile value that counts as a win.
    #[arg(long, default_value_t = DEFAULT_TARGET)]
    target: u64,
    /// Directory holding the saved game, best score and session stats.
    #[arg(long, env = "TILE_MERGE_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Optional tracing filter, e.g. "info", "debug".
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(args.log.clone()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = StoreConfig::from_env();
    if let Some(dir) = args.data_dir.clone() {
        config.data_dir = dir;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, data_dir = %config.data_dir.display(), "starting");

    let engine = GridEngine::with_source(args.size, SimpleRng::new(seed))?.with_target(args.target);
    let store = FileStore::open(&config)?;
    let mut session = GameSession::open(store, engine, config)?;
    info!(outcome = ?session.outcome(), "game ready");

    let started = Instant::now();
    let result = run(&mut session);

    // Always report the session, even if the loop failed.
    session.finish(started.elapsed())?;
    result
}

fn run(session: &mut GameSession<FileStore>) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    print_state(&mut stdout, session)?;

    for line in stdin.lock().lines() {
        let line = line?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "q" | "exit") {
            break;
        }

        let Some(command) = Command::from_str(input) else {
            writeln!(stdout, "unknown command: {}", input)?;
            continue;
        };

        match session.apply(command) {
            Ok(true) => print_state(&mut stdout, session)?,
            Ok(false) => writeln!(stdout, "nothing changed")?,
            Err(err) => {
                warn!("command rejected: {:#}", err);
                writeln!(stdout, "error: {:#}", err)?;
            }
        }
    }

    Ok(())
}

fn print_state(out: &mut impl Write, session: &GameSession<FileStore>) -> Result<()> {
    let engine = session.engine();
    write!(out, "{}", engine.grid())?;
    writeln!(
        out,
        "score {}  best {}  moves {}",
        engine.score(),
        engine.best_score(),
        engine.moves()
    )?;
    if engine.won() {
        writeln!(out, "you reached {}! type `continue` to keep going", engine.target())?;
    }
    if engine.game_over() {
        writeln!(out, "game over. type `reset` to play again")?;
    }
    out.flush()?;
    Ok(())
}
