//! Configuration types for bot play
//!
//! Level 4 - Utilities and configuration

use hexclaim_core::{SearchConfig, SetupConfig, DEFAULT_DEPTH};
use serde::{Deserialize, Serialize};

/// How a bot plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Search depth
    pub depth: u32,
    /// Moves after which a self-play game is abandoned
    pub max_moves: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            max_moves: 500,
        }
    }
}

impl BotConfig {
    /// Create config searching at the given depth
    pub fn with_depth(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Set the move cap
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn search(&self) -> SearchConfig {
        SearchConfig::with_depth(self.depth)
    }
}

/// Series configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Board generation parameters shared by every game
    pub setup: SetupConfig,
    /// Bot used for every seat
    pub bot: BotConfig,
    /// Number of games to play
    pub games: usize,
    /// Whether to run games in parallel
    pub parallel: bool,
    /// Seed of the first board, game `i` uses `seed + i`
    pub seed: u64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            setup: SetupConfig::default().with_players(2, 0),
            bot: BotConfig::default(),
            games: 10,
            parallel: true,
            seed: 42,
        }
    }
}

impl ArenaConfig {
    /// Create config for a number of games
    pub fn with_games(games: usize) -> Self {
        Self {
            games,
            ..Default::default()
        }
    }

    pub fn with_setup(mut self, setup: SetupConfig) -> Self {
        self.setup = setup;
        self
    }

    pub fn with_bot(mut self, bot: BotConfig) -> Self {
        self.bot = bot;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ArenaConfig::default();
        assert_eq!(config.bot.depth, DEFAULT_DEPTH);
        assert_eq!(config.setup.player_count(), 2);
        assert!(config.parallel);
    }

    #[test]
    fn test_builders() {
        let config = ArenaConfig::with_games(3)
            .with_bot(BotConfig::with_depth(1).with_max_moves(20))
            .with_parallel(false)
            .with_seed(7);
        assert_eq!(config.games, 3);
        assert_eq!(config.bot.search().depth, 1);
        assert_eq!(config.bot.max_moves, 20);
        assert!(!config.parallel);
        assert_eq!(config.seed, 7);
    }
}
