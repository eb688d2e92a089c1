//! Bounded-depth move search for bot players
//!
//! Every candidate move is simulated on its own copy of the board. With depth
//! left, the players that move before control comes back are simulated with
//! a search on their own behalf one level shallower, then the searcher's own
//! continuation is searched the same way. Boards are compared by score
//! margin, see [`evaluate`].

use serde::{Deserialize, Serialize};

use crate::board::{Board, PlayerId};
use crate::connectivity::reachable_targets;
use crate::engine::Turn;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Default number of plies explored past the candidate move
pub const DEFAULT_DEPTH: u32 = 2;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Search parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub depth: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl SearchConfig {
    pub fn with_depth(depth: u32) -> Self {
        Self { depth }
    }
}

// ============================================================================
// BOT PLAYER
// ============================================================================

/// Search-driven player
#[derive(Clone, Debug, Default)]
pub struct BotPlayer {
    pub config: SearchConfig,
}

impl BotPlayer {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn with_depth(depth: u32) -> Self {
        Self::new(SearchConfig::with_depth(depth))
    }

    /// Target cell for `player`, `None` when it has no legal move
    pub fn best_move(&self, board: &Board, player: PlayerId) -> Option<usize> {
        choose_move(board, player, self.config.depth)
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Score margin of `player` over everyone else.
///
/// An immobile player is additionally charged every resource still on the
/// board, since it can no longer compete for them.
pub fn evaluate(board: &Board, player: PlayerId) -> i64 {
    let Some(me) = board.player(player) else {
        return i64::MIN;
    };
    let others: i64 = board
        .players
        .iter()
        .filter(|p| p.id != player)
        .map(|p| p.score)
        .sum();

    let mut score = me.score - others;
    if !me.can_move {
        score -= board.remaining_resources();
    }
    score
}

// ============================================================================
// SEARCH
// ============================================================================

/// Best line found for a player
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// Cell to move to now
    pub target: usize,
    /// Evaluation of `board` for the searching player
    pub score: i64,
    /// Board at the end of the simulated line
    pub board: Board,
}

/// Pick a target for `player`, looking `depth` plies ahead
pub fn choose_move(board: &Board, player: PlayerId, depth: u32) -> Option<usize> {
    match search(board, player, depth) {
        Some(result) => {
            tracing::debug!(
                player,
                target = result.target,
                score = result.score,
                depth,
                "bot move chosen"
            );
            Some(result.target)
        }
        None => {
            tracing::debug!(player, depth, "bot has no candidate move");
            None
        }
    }
}

/// Explore every legal move of `player` and keep the strictly best one.
///
/// Ties go to the first candidate in traversal order, so the result is
/// deterministic for a given board and depth.
pub fn search(board: &Board, player: PlayerId, depth: u32) -> Option<SearchResult> {
    let from = board.player(player)?.position;
    let candidates = reachable_targets(&board.cells, board.grid(), board.coord(from));

    let mut best: Option<SearchResult> = None;
    for target in candidates {
        let line = simulate_line(board, player, target, depth);
        let score = evaluate(&line, player);

        let improves = match &best {
            Some(current) => score > current.score,
            None => true,
        };
        if improves {
            best = Some(SearchResult {
                target,
                score,
                board: line,
            });
        }
    }

    best
}

/// Play `target` on a copy of `board` and simulate what follows
fn simulate_line(board: &Board, player: PlayerId, target: usize, depth: u32) -> Board {
    let mut branch = board.clone();
    let mut turn = branch.move_unchecked(player, target).turn;

    if depth == 0 {
        return branch;
    }

    // Everyone moving before control returns plays for themselves
    while let Turn::AwaitingMove(next) = turn {
        if next == player || !branch.players[player].can_move {
            break;
        }
        match search(&branch, next, depth - 1) {
            Some(reply) => turn = branch.move_unchecked(next, reply.target).turn,
            None => {
                turn = Turn::Finished;
                break;
            }
        }
    }

    if turn == Turn::AwaitingMove(player) {
        if let Some(continuation) = search(&branch, player, depth - 1) {
            branch = continuation.board;
        }
    }

    branch
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, PlayerKind};

    fn strip(cells: &[(u32, u32)]) -> Board {
        Board {
            width: cells.len(),
            height: 1,
            cells: cells
                .iter()
                .enumerate()
                .map(|(pos, &(res, state))| Cell::new(pos, res, state))
                .collect(),
            players: vec![],
        }
    }

    /// [1][A][5][ ][B] with cell 3 doubled
    fn greedy_board() -> Board {
        let mut board = strip(&[(1, 1), (0, 1), (5, 1), (0, 2), (0, 1)]);
        board.add_player(1, PlayerKind::Bot);
        board.add_player(4, PlayerKind::Human);
        board
    }

    #[test]
    fn test_evaluate_margin() {
        let mut board = greedy_board();
        board.players[0].score = 10;
        board.players[1].score = 4;
        assert_eq!(evaluate(&board, 0), 6);
        assert_eq!(evaluate(&board, 1), -6);
    }

    #[test]
    fn test_evaluate_penalizes_immobile() {
        let mut board = greedy_board();
        board.players[0].can_move = false;
        // Open cells hold 1 + 5
        assert_eq!(evaluate(&board, 0), -6);
    }

    #[test]
    fn test_picks_best_capture() {
        let board = greedy_board();
        assert_eq!(choose_move(&board, 0, 0), Some(2));
        assert_eq!(choose_move(&board, 0, 1), Some(2));
    }

    #[test]
    fn test_search_does_not_touch_input() {
        let board = greedy_board();
        let before = board.clone();
        let _ = search(&board, 0, 2);
        assert_eq!(board, before);
    }

    #[test]
    fn test_no_candidate() {
        let mut board = strip(&[(0, 0), (1, 1), (0, 0)]);
        board.add_player(1, PlayerKind::Bot);
        assert_eq!(choose_move(&board, 0, 2), None);
        assert_eq!(choose_move(&board, 3, 2), None);
    }

    #[test]
    fn test_deterministic() {
        let mut board = Board::uniform(6, 6, 2, 1);
        board.cells[14].state = 2;
        board.cells[20].state = 0;
        board.add_player(7, PlayerKind::Bot);
        board.add_player(28, PlayerKind::Bot);

        let first = choose_move(&board, 0, 2);
        let second = choose_move(&board, 0, 2);
        assert!(first.is_some());
        assert_eq!(first, second);
        assert!(board.can_move(0, first.unwrap()));
    }

    #[test]
    fn test_bot_player_uses_config() {
        let bot = BotPlayer::with_depth(0);
        let board = greedy_board();
        assert_eq!(bot.best_move(&board, 0), Some(2));
        assert_eq!(BotPlayer::default().config.depth, DEFAULT_DEPTH);
    }
}
