//! Bot driver - answers pending bot turns in a snapshot store
//!
//! Level 1/2 - Orchestration and phases

use hexclaim_core::{BotPlayer, PlayerId, SnapshotStore, StoreError, Turn};
use serde::{Deserialize, Serialize};

use crate::config::BotConfig;

/// What happened to one game during a pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnResult {
    /// A move was stored
    Played { player: PlayerId, target: usize, finished: bool },
    /// The game was left as it was
    Skipped,
}

/// Counts for one or more passes over the store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverReport {
    pub played: usize,
    pub skipped: usize,
    /// Games that ended with a stored move
    pub finished: usize,
}

impl DriverReport {
    fn record(&mut self, result: TurnResult) {
        match result {
            TurnResult::Played { finished, .. } => {
                self.played += 1;
                if finished {
                    self.finished += 1;
                }
            }
            TurnResult::Skipped => self.skipped += 1,
        }
    }

    fn merge(&mut self, other: DriverReport) {
        self.played += other.played;
        self.skipped += other.skipped;
        self.finished += other.finished;
    }
}

/// Plays the bot's move in every game waiting on a bot
pub struct BotDriver<S: SnapshotStore> {
    store: S,
    bot: BotPlayer,
}

impl<S: SnapshotStore> BotDriver<S> {
    pub fn new(store: S, config: BotConfig) -> Self {
        Self {
            store,
            bot: BotPlayer::new(config.search()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Keep passing over the store until no bot move is played, at most
    /// `max_passes` times
    pub fn run_until_idle(&mut self, max_passes: usize) -> Result<DriverReport, StoreError> {
        let mut total = DriverReport::default();
        for pass in 0..max_passes {
            let report = self.play_pending()?;
            total.merge(report);
            if report.played == 0 {
                tracing::debug!(pass, "driver idle");
                break;
            }
        }
        Ok(total)
    }

    /// One move for each game currently waiting on a bot.
    ///
    /// A game that fails to load or has no candidate move is logged and
    /// skipped; only the listing itself can fail the pass.
    pub fn play_pending(&mut self) -> Result<DriverReport, StoreError> {
        let pending = self.store.pending_bot_games()?;
        let mut report = DriverReport::default();

        for game_id in pending {
            let result = match self.play_game(game_id) {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(game = game_id, error = %e, "bot turn failed");
                    TurnResult::Skipped
                }
            };
            report.record(result);
        }

        tracing::info!(
            played = report.played,
            skipped = report.skipped,
            finished = report.finished,
            "bot pass complete"
        );
        Ok(report)
    }

    /// Play the bot's move in one game
    pub fn play_game(&mut self, game_id: u64) -> Result<TurnResult, StoreError> {
        let mut snapshot = self.store.load(game_id)?;

        let player = match snapshot.turn() {
            Turn::AwaitingMove(player) => player,
            Turn::Finished => return Err(StoreError::Finished(game_id)),
        };
        if !snapshot.board.player(player).is_some_and(|p| p.is_bot()) {
            tracing::debug!(game = game_id, player, "not a bot turn");
            return Ok(TurnResult::Skipped);
        }

        let Some(target) = self.bot.best_move(&snapshot.board, player) else {
            tracing::warn!(game = game_id, player, "bot has no legal move");
            return Ok(TurnResult::Skipped);
        };

        let outcome = match snapshot.apply_move(player, target) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(game = game_id, error = %e, "bot move rejected");
                return Ok(TurnResult::Skipped);
            }
        };

        self.store.save(&snapshot.changes())?;
        tracing::debug!(game = game_id, player, target, turn = ?outcome.turn, "bot moved");

        Ok(TurnResult::Played {
            player,
            target,
            finished: outcome.end_of_game(),
        })
    }
}
