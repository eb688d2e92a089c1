//! Series play - many seeded games with the same configuration
//!
//! Level 1 - Orchestration

use hexclaim_core::{generate_seeded, SetupError};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::ArenaConfig;
use crate::game_runner::{EndReason, GameRecord, GameRunner};

/// Aggregated results of a series
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeriesResult {
    /// Games played
    pub games: usize,
    /// Outright wins per seat
    pub wins: Vec<usize>,
    /// Games where the top score was shared
    pub shared: usize,
    /// Average of seat 0's margin over the best other seat
    pub avg_margin: f64,
    /// Average number of moves per game
    pub avg_moves: f64,
    pub finished: usize,
    pub move_limit: usize,
    pub no_candidate: usize,
}

impl SeriesResult {
    fn from_records(seats: usize, records: &[GameRecord]) -> Self {
        let mut result = SeriesResult {
            games: records.len(),
            wins: vec![0; seats],
            ..Default::default()
        };
        if records.is_empty() {
            return result;
        }

        let mut margin_sum = 0i64;
        let mut moves_sum = 0usize;
        for record in records {
            match record.winner() {
                Some(id) => {
                    if let Some(w) = result.wins.get_mut(id) {
                        *w += 1;
                    }
                }
                None => result.shared += 1,
            }
            match record.end {
                EndReason::Finished => result.finished += 1,
                EndReason::MoveLimit => result.move_limit += 1,
                EndReason::NoCandidate => result.no_candidate += 1,
            }
            margin_sum += record.margin(0);
            moves_sum += record.moves.len();
        }

        let n = records.len() as f64;
        result.avg_margin = margin_sum as f64 / n;
        result.avg_moves = moves_sum as f64 / n;
        result
    }

    /// Share of outright wins for a seat
    pub fn win_rate(&self, seat: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            self.wins.get(seat).copied().unwrap_or(0) as f64 / self.games as f64
        }
    }
}

/// Play a series of games
pub fn run_series(config: &ArenaConfig) -> Result<SeriesResult, SetupError> {
    run_series_with(config, |_| {})
}

/// Play a series, calling `on_game` after each game finishes.
///
/// Game `i` is played on the board generated from `seed + i`, so results do
/// not depend on `parallel`.
pub fn run_series_with<F>(config: &ArenaConfig, on_game: F) -> Result<SeriesResult, SetupError>
where
    F: Fn(&GameRecord) + Sync,
{
    tracing::info!(
        games = config.games,
        depth = config.bot.depth,
        parallel = config.parallel,
        "starting series"
    );

    let runner = GameRunner::new(config.bot);
    let play_one = |index: usize| -> Result<GameRecord, SetupError> {
        let seed = config.seed.wrapping_add(index as u64);
        let board = generate_seeded(&config.setup, seed)?;
        let record = runner.play(board);
        on_game(&record);
        Ok(record)
    };

    let records: Vec<GameRecord> = if config.parallel {
        (0..config.games)
            .into_par_iter()
            .map(play_one)
            .collect::<Result<_, _>>()?
    } else {
        (0..config.games).map(play_one).collect::<Result<_, _>>()?
    };

    let result = SeriesResult::from_records(config.setup.player_count(), &records);
    tracing::info!(
        games = result.games,
        shared = result.shared,
        avg_margin = result.avg_margin,
        "series complete"
    );
    Ok(result)
}
