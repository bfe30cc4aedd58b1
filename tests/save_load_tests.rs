//! Save/load tests - snapshot export, resume and rejection of corrupt blobs

use tile_merge::core::{EngineError, GridEngine, SaveSnapshot, SavedTile, ScriptedSpawns};
use tile_merge::types::{Direction, Position};

fn play(engine: &mut GridEngine, moves: usize) {
    for step in 0..moves {
        engine.move_tiles(Direction::ALL[step % 4]);
    }
}

#[test]
fn test_roundtrip_on_fresh_engine() {
    let mut original = GridEngine::new(4, 2024).unwrap();
    play(&mut original, 40);

    let save = original.save_data();
    let mut restored = GridEngine::new(4, 7).unwrap();
    restored.load_from_save(&save).unwrap();

    let a = original.state();
    let b = restored.state();
    assert_eq!(a.values(), b.values());
    assert_eq!(a.score, b.score);
    assert_eq!(a.game_over, b.game_over);
    assert_eq!(a.won, b.won);
    assert_eq!(a.grid_size, b.grid_size);
    assert_eq!(restored.moves(), original.moves());

    // Render hints are not persisted.
    assert!(b.tiles().all(|t| !t.is_new && t.merged_from.is_none()));
    // Exporting again gives the same blob.
    assert_eq!(restored.save_data(), save);
}

#[test]
fn test_roundtrip_through_json() {
    let mut original = GridEngine::new(6, 55).unwrap();
    play(&mut original, 25);

    let json = original.save_data().to_json().unwrap();
    let parsed = SaveSnapshot::from_json(&json).unwrap();

    let mut restored = GridEngine::new(4, 1).unwrap();
    restored.load_from_save(&parsed).unwrap();
    assert_eq!(restored.grid_size(), 6);
    assert_eq!(restored.state().values(), original.state().values());
    assert_eq!(restored.score(), original.score());
}

#[test]
fn test_continued_win_does_not_reappear_after_load() {
    let spawns = ScriptedSpawns::new([
        (Position::new(0, 0), 2),
        (Position::new(3, 3), 2),
        (Position::new(3, 0), 2),
    ]);
    let mut engine = GridEngine::with_source(4, spawns).unwrap();
    engine
        .load_from_save(&SaveSnapshot {
            grid_size: 4,
            tiles: vec![SavedTile::new(0, 0, 1024), SavedTile::new(0, 1, 1024)],
            score: 5000,
            won: false,
            continued: false,
            moves: 100,
        })
        .unwrap();

    assert!(engine.move_tiles(Direction::Left));
    assert!(engine.won());
    engine.continue_game();

    let save = engine.save_data();
    assert!(!save.won);
    assert!(save.continued);

    let mut restored = GridEngine::new(4, 3).unwrap();
    restored.load_from_save(&save).unwrap();
    assert!(!restored.won());
    assert!(restored.continued());

    // Further moves with the 2048 tile on board must not raise it again.
    for d in Direction::ALL {
        restored.move_tiles(d);
        assert!(!restored.won());
    }
}

#[test]
fn test_pending_win_survives_load() {
    let save = SaveSnapshot {
        grid_size: 4,
        tiles: vec![SavedTile::new(1, 1, 2048), SavedTile::new(2, 2, 4)],
        score: 20000,
        won: true,
        continued: false,
        moves: 900,
    };
    let mut engine = GridEngine::new(4, 1).unwrap();
    engine.load_from_save(&save).unwrap();
    assert!(engine.won());
    assert!(engine.state().won);
    assert_eq!(engine.best_score(), 20000);
}

#[test]
fn test_load_keeps_higher_best_score() {
    let mut engine = GridEngine::new(4, 1).unwrap();
    engine.update_best_score(99999);
    engine
        .load_from_save(&SaveSnapshot {
            grid_size: 4,
            tiles: vec![SavedTile::new(0, 0, 2)],
            score: 10,
            won: false,
            continued: false,
            moves: 1,
        })
        .unwrap();
    assert_eq!(engine.best_score(), 99999);
    assert_eq!(engine.score(), 10);
}

#[test]
fn test_corrupt_snapshots_are_rejected() {
    let mut engine = GridEngine::new(4, 1).unwrap();
    let before = engine.save_data();

    let cases = [
        (
            SaveSnapshot {
                grid_size: 9,
                tiles: vec![],
                score: 0,
                won: false,
                continued: false,
                moves: 0,
            },
            "invalid_grid_size",
        ),
        (
            SaveSnapshot {
                grid_size: 4,
                tiles: vec![SavedTile::new(2, 2, 8), SavedTile::new(2, 2, 8)],
                score: 0,
                won: false,
                continued: false,
                moves: 0,
            },
            "duplicate_position",
        ),
        (
            SaveSnapshot {
                grid_size: 4,
                tiles: vec![SavedTile::new(0, 0, 24)],
                score: 0,
                won: false,
                continued: false,
                moves: 0,
            },
            "invalid_tile_value",
        ),
        (
            SaveSnapshot {
                grid_size: 5,
                tiles: vec![SavedTile::new(5, 0, 2)],
                score: 0,
                won: false,
                continued: false,
                moves: 0,
            },
            "tile_out_of_bounds",
        ),
        (
            SaveSnapshot {
                grid_size: 4,
                tiles: vec![],
                score: 0,
                won: false,
                continued: false,
                moves: 0,
            },
            "empty_board",
        ),
        (
            SaveSnapshot {
                grid_size: 4,
                tiles: vec![SavedTile::new(0, 0, 1 << 63), SavedTile::new(0, 1, 1 << 63)],
                score: 0,
                won: false,
                continued: false,
                moves: 0,
            },
            "invalid_tile_value",
        ),
        (
            SaveSnapshot {
                grid_size: 4,
                tiles: vec![SavedTile::new(0, 0, 2048)],
                score: 20000,
                won: true,
                continued: true,
                moves: 900,
            },
            "conflicting_flags",
        ),
    ];

    for (snapshot, code) in cases {
        let err: EngineError = engine.load_from_save(&snapshot).unwrap_err();
        assert_eq!(err.code(), code);
        assert_eq!(engine.save_data(), before);
    }
}

#[test]
fn test_loaded_full_board_is_game_over() {
    let tiles = (0..16u8)
        .map(|i| {
            let (r, c) = (i / 4, i % 4);
            SavedTile::new(r, c, 1 << (1 + (r + c) % 2))
        })
        .collect();
    let mut engine = GridEngine::new(4, 1).unwrap();
    engine
        .load_from_save(&SaveSnapshot {
            grid_size: 4,
            tiles,
            score: 0,
            won: false,
            continued: false,
            moves: 0,
        })
        .unwrap();
    assert!(engine.game_over());
}

#[test]
fn test_save_wire_format() {
    let mut engine = GridEngine::new(5, 31).unwrap();
    engine.move_tiles(Direction::Left);

    let json = engine.save_data().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["gridSize"], 5);
    assert!(value["tiles"].is_array());
    for tile in value["tiles"].as_array().unwrap() {
        assert!(tile["row"].as_u64().unwrap() < 5);
        assert!(tile["col"].as_u64().unwrap() < 5);
        assert!(tile["value"].as_u64().unwrap() >= 2);
    }
    assert!(value.get("bestScore").is_none());
    assert!(value.get("gameOver").is_none());
}

#[test]
fn test_largest_saved_tiles_merge_without_overflow() {
    let top = tile_merge::types::MAX_TILE_VALUE;
    let mut engine = GridEngine::new(4, 8).unwrap();
    engine
        .load_from_save(&SaveSnapshot {
            grid_size: 4,
            tiles: vec![SavedTile::new(0, 0, top), SavedTile::new(0, 1, top)],
            score: u64::MAX - 1,
            won: false,
            continued: true,
            moves: 5,
        })
        .unwrap();

    assert!(engine.move_tiles(Direction::Left));
    assert_eq!(engine.max_tile(), top * 2);
    assert_eq!(engine.score(), u64::MAX);
    assert!(engine.grid().occupied().all(|(_, t)| t.value >= 2));
}
