//! Integration tests for HEXCLAIM
//!
//! Tests the full stack: board setup, engine, bot search, snapshot store and
//! the arena driving games

use hexclaim_arena::{
    run_series, ArenaConfig, BotConfig, BotDriver, EndReason, GameRunner,
};
use hexclaim_core::{
    choose_move, generate, Board, MemoryStore, PlayerKind, SetupConfig, Snapshot, SnapshotStore,
    Turn,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ============================================================================
// TEST FIXTURES
// ============================================================================

/// Seeded board with the given seats
fn seeded_board(bots: usize, humans: usize, seed: u64) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(&SetupConfig::default().with_players(bots, humans), &mut rng).unwrap()
}

// ============================================================================
// BOARD FILES
// ============================================================================

#[test]
fn test_board_file_round_trip() {
    let board = seeded_board(1, 1, 21);
    let path = std::env::temp_dir().join(format!("hexclaim-board-{}.json", std::process::id()));

    board.save(&path).unwrap();
    let loaded = Board::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded, board);
}

#[test]
fn test_load_rejects_broken_board() {
    let mut board = seeded_board(1, 1, 22);
    board.players[0].position = board.players[1].position;
    let path = std::env::temp_dir().join(format!("hexclaim-broken-{}.json", std::process::id()));

    board.save(&path).unwrap();
    let loaded = Board::load(&path);
    std::fs::remove_file(&path).ok();

    assert!(loaded.is_err());
}

// ============================================================================
// MIXED GAMES
// ============================================================================

#[test]
fn test_human_and_bot_alternate_through_store() {
    let mut store = MemoryStore::new();
    store.insert(&Snapshot::new(1, seeded_board(1, 1, 5)));
    let mut driver = BotDriver::new(store, BotConfig::with_depth(1));

    for _ in 0..200 {
        let report = driver.play_pending().unwrap();
        assert!(report.played <= 1);

        // Human answers with the first legal move
        let mut snapshot = driver.store().load(1).unwrap();
        let player = match snapshot.turn() {
            Turn::AwaitingMove(p) => p,
            Turn::Finished => break,
        };
        if snapshot.board.players[player].kind != PlayerKind::Human {
            continue;
        }
        let Some(&target) = snapshot.board.legal_moves(player).first() else {
            break;
        };
        snapshot.apply_move(player, target).unwrap();
        driver.store_mut().save(&snapshot.changes()).unwrap();
    }

    let snapshot = driver.into_store().load(1).unwrap();
    assert!(snapshot.game.sequence_num > 0);
    assert!(snapshot.board.validate().is_ok());
}

#[test]
fn test_deeper_bot_is_deterministic() {
    let board = seeded_board(2, 0, 8);
    assert_eq!(choose_move(&board, 0, 2), choose_move(&board, 0, 2));
}

// ============================================================================
// SERIES
// ============================================================================

#[test]
fn test_selfplay_series_terminates() {
    let config = ArenaConfig::with_games(3)
        .with_bot(BotConfig::with_depth(1))
        .with_parallel(false)
        .with_seed(9);
    let result = run_series(&config).unwrap();

    assert_eq!(result.games, 3);
    assert_eq!(result.move_limit, 0);
}

#[test]
fn test_runner_final_board_is_closed() {
    let record = GameRunner::new(BotConfig::with_depth(0)).play(seeded_board(3, 0, 4));
    if record.end == EndReason::Finished {
        assert_eq!(record.board.remaining_resources(), 0);
    }
    assert_eq!(record.scores.len(), 3);
    assert!(record.board.validate().is_ok());
}
