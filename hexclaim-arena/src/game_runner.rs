//! Game runner - plays single games with the bot on every seat
//!
//! Level 3 - Step-level implementation

use hexclaim_core::{Board, BotPlayer, PlayerId, Turn};
use serde::{Deserialize, Serialize};

use crate::config::BotConfig;

/// Why a game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Nobody but the last mover could move
    Finished,
    /// Move cap reached
    MoveLimit,
    /// The turn player had no candidate move
    NoCandidate,
}

/// Outcome of a single game
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameRecord {
    /// (player, target) in play order
    pub moves: Vec<(PlayerId, usize)>,
    /// Indexed by player id
    pub scores: Vec<i64>,
    /// Players sharing the top score
    pub winners: Vec<PlayerId>,
    pub end: EndReason,
    pub board: Board,
}

impl GameRecord {
    fn new(board: Board, moves: Vec<(PlayerId, usize)>, end: EndReason) -> Self {
        let scores: Vec<i64> = board.players.iter().map(|p| p.score).collect();
        let top = scores.iter().copied().max();
        let winners = scores
            .iter()
            .enumerate()
            .filter(|&(_, &s)| Some(s) == top)
            .map(|(id, _)| id)
            .collect();
        Self {
            moves,
            scores,
            winners,
            end,
            board,
        }
    }

    /// Single winner, if any
    pub fn winner(&self) -> Option<PlayerId> {
        match self.winners.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    /// Score of `player` minus the best other score
    pub fn margin(&self, player: PlayerId) -> i64 {
        let own = self.scores.get(player).copied().unwrap_or(0);
        let best_other = self
            .scores
            .iter()
            .enumerate()
            .filter(|&(id, _)| id != player)
            .map(|(_, &s)| s)
            .max()
            .unwrap_or(0);
        own - best_other
    }

    pub fn is_finished(&self) -> bool {
        self.end == EndReason::Finished
    }
}

/// Plays whole games, the search choosing for every player
pub struct GameRunner {
    config: BotConfig,
    bot: BotPlayer,
}

impl GameRunner {
    pub fn new(config: BotConfig) -> Self {
        Self {
            config,
            bot: BotPlayer::new(config.search()),
        }
    }

    /// Play `board` to completion
    pub fn play(&self, mut board: Board) -> GameRecord {
        let mut moves = Vec::new();
        let mut turn = match board.mobile_players().next() {
            Some(p) => Turn::AwaitingMove(p.id),
            None => Turn::Finished,
        };

        let end = loop {
            let Turn::AwaitingMove(player) = turn else {
                break EndReason::Finished;
            };
            if moves.len() >= self.config.max_moves {
                break EndReason::MoveLimit;
            }
            let Some(target) = self.bot.best_move(&board, player) else {
                tracing::warn!(player, "no candidate move, stopping game");
                break EndReason::NoCandidate;
            };
            match board.apply_move(player, target) {
                Ok(outcome) => {
                    moves.push((player, target));
                    turn = outcome.turn;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "search produced a rejected move");
                    break EndReason::NoCandidate;
                }
            }
        };

        board.clear_modified();
        tracing::debug!(moves = moves.len(), ?end, "game over");
        GameRecord::new(board, moves, end)
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexclaim_core::{generate_seeded, PlayerKind, SetupConfig};

    fn small_board() -> Board {
        let mut board = Board::uniform(5, 5, 1, 1);
        board.add_player(6, PlayerKind::Bot);
        board.add_player(18, PlayerKind::Bot);
        board
    }

    #[test]
    fn test_play_to_finish() {
        let runner = GameRunner::new(BotConfig::with_depth(0));
        let record = runner.play(small_board());

        assert_eq!(record.end, EndReason::Finished);
        assert!(!record.moves.is_empty());
        assert_eq!(record.scores.iter().sum::<i64>(), 25);
        assert_eq!(record.board.remaining_resources(), 0);
        assert!(!record.winners.is_empty());
    }

    #[test]
    fn test_move_limit() {
        let runner = GameRunner::new(BotConfig::with_depth(0).with_max_moves(2));
        let record = runner.play(small_board());
        assert_eq!(record.end, EndReason::MoveLimit);
        assert_eq!(record.moves.len(), 2);
        assert_eq!(record.moves[0].0, 0);
        assert_eq!(record.moves[1].0, 1);
    }

    #[test]
    fn test_no_candidate() {
        let mut board = Board::uniform(3, 1, 1, 0);
        board.cells[1].state = 1;
        board.add_player(1, PlayerKind::Bot);
        let record = GameRunner::new(BotConfig::default()).play(board);
        assert_eq!(record.end, EndReason::NoCandidate);
        assert!(record.moves.is_empty());
        assert_eq!(record.winner(), Some(0));
    }

    #[test]
    fn test_margin() {
        let board = generate_seeded(&SetupConfig::default().with_players(2, 0), 1).unwrap();
        let record = GameRunner::new(BotConfig::with_depth(1)).play(board);
        assert_eq!(record.margin(0), -record.margin(1));
        if let Some(winner) = record.winner() {
            assert!(record.margin(winner) > 0);
        }
    }
}
