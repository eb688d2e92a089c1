//! Random board generation for new games

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::board::{Board, PlayerKind};
use crate::error::SetupError;
use crate::grid::{to_column, to_index, to_row};

/// Smallest side that still leaves an interior to start on
pub const MIN_SIDE: usize = 5;

/// Players start at least this many cells away from every edge
const START_MARGIN: usize = 2;

/// Parameters for a new board
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetupConfig {
    pub width: usize,
    pub height: usize,
    /// Cell resources are drawn from `1..=max_resources`
    pub max_resources: u32,
    pub bots: usize,
    pub humans: usize,
}

impl Default for SetupConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
            max_resources: 3,
            bots: 1,
            humans: 1,
        }
    }
}

impl SetupConfig {
    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_players(mut self, bots: usize, humans: usize) -> Self {
        self.bots = bots;
        self.humans = humans;
        self
    }

    pub fn player_count(&self) -> usize {
        self.bots + self.humans
    }
}

/// Generate a board with a deterministic seed
pub fn generate_seeded(config: &SetupConfig, seed: u64) -> Result<Board, SetupError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(config, &mut rng)
}

/// Generate a board.
///
/// The outer ring is mostly holes, the second ring is patchy and the
/// interior is solid. Some live cells are doubled (state 2). Players start
/// on distinct interior cells, bots first.
pub fn generate<R: Rng>(config: &SetupConfig, rng: &mut R) -> Result<Board, SetupError> {
    let (width, height) = (config.width, config.height);
    if width < MIN_SIDE || height < MIN_SIDE {
        return Err(SetupError::GridTooSmall {
            width,
            height,
            min: MIN_SIDE,
        });
    }

    let players = config.player_count();
    if players == 0 {
        return Err(SetupError::NoPlayers);
    }
    let available = (width - 2 * START_MARGIN) * (height - 2 * START_MARGIN);
    if players > available {
        return Err(SetupError::TooManyPlayers { players, available });
    }

    let max_resources = config.max_resources.max(1);
    let mut board = Board::uniform(width, height, 0, 0);
    for cell in board.cells.iter_mut() {
        let ring = edge_distance(cell.position, width, height);
        let alive = match ring {
            0 => rng.gen_range(0..8) > 5,
            1 => rng.gen_range(0..8) > 2,
            _ => true,
        };
        if alive {
            cell.state = if rng.gen_range(0..4) > 2 { 2 } else { 1 };
        }
        cell.resources = rng.gen_range(1..=max_resources);
    }

    let mut starts: Vec<usize> = Vec::with_capacity(players);
    while starts.len() < players {
        let col = rng.gen_range(START_MARGIN..width - START_MARGIN);
        let row = rng.gen_range(START_MARGIN..height - START_MARGIN);
        let pos = to_index(col, row, width);
        if !starts.contains(&pos) {
            starts.push(pos);
        }
    }

    let kinds = std::iter::repeat(PlayerKind::Bot)
        .take(config.bots)
        .chain(std::iter::repeat(PlayerKind::Human).take(config.humans));
    for (pos, kind) in starts.into_iter().zip(kinds) {
        board.add_player(pos, kind);
    }

    tracing::debug!(width, height, players, "board generated");
    Ok(board)
}

/// Distance of a cell to the nearest edge (0 on the border)
fn edge_distance(pos: usize, width: usize, height: usize) -> usize {
    let col = to_column(pos, width);
    let row = to_row(pos, width);
    col.min(width - 1 - col).min(row).min(height - 1 - row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_board_is_valid() {
        let board = generate_seeded(&SetupConfig::default().with_players(2, 2), 7).unwrap();
        assert_eq!(board.cells.len(), 100);
        assert_eq!(board.players.len(), 4);
        assert!(board.validate().is_ok());
        assert!(board.players[0].is_bot());
        assert!(board.players[1].is_bot());
        assert!(!board.players[2].is_bot());
    }

    #[test]
    fn test_seed_reproducible() {
        let config = SetupConfig::default();
        let a = generate_seeded(&config, 42).unwrap();
        let b = generate_seeded(&config, 42).unwrap();
        let c = generate_seeded(&config, 43).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_players_start_inside_margin() {
        let config = SetupConfig::default().with_players(3, 3);
        for seed in 0..20 {
            let board = generate_seeded(&config, seed).unwrap();
            for player in &board.players {
                assert!(edge_distance(player.position, 10, 10) >= START_MARGIN);
                assert!(board.cells[player.position].is_alive());
                assert!(player.score >= 1 && player.score <= 3);
            }
        }
    }

    #[test]
    fn test_interior_always_alive() {
        let board = generate_seeded(&SetupConfig::default(), 3).unwrap();
        for cell in &board.cells {
            if edge_distance(cell.position, 10, 10) >= 2 {
                assert!(cell.state == 1 || cell.state == 2);
            }
            assert!(cell.state <= 2);
        }
    }

    #[test]
    fn test_rejects_small_grid() {
        let config = SetupConfig::default().with_size(4, 10);
        assert_eq!(
            generate_seeded(&config, 0),
            Err(SetupError::GridTooSmall { width: 4, height: 10, min: 5 })
        );
    }

    #[test]
    fn test_rejects_crowded_grid() {
        // 5x5 leaves a single starting cell
        let config = SetupConfig::default().with_size(5, 5).with_players(1, 1);
        assert_eq!(
            generate_seeded(&config, 0),
            Err(SetupError::TooManyPlayers { players: 2, available: 1 })
        );
        let config = SetupConfig::default().with_players(0, 0);
        assert_eq!(generate_seeded(&config, 0), Err(SetupError::NoPlayers));
    }
}
