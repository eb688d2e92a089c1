//! HEXCLAIM Arena - Bot-driven game play
//!
//! This crate drives games with the search engine:
//! - Self-play of whole games for measurement
//! - A driver that answers pending bot turns in a snapshot store
//! - Seeded series of games, optionally in parallel
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run_series, BotDriver::run_until_idle (orchestration)
//! - Level 2: BotDriver::play_pending (phases)
//! - Level 3: GameRunner::play, BotDriver::play_game (steps)
//! - Level 4: utilities, configuration

mod config;
mod driver;
mod game_runner;
mod series;

pub use config::{ArenaConfig, BotConfig};
pub use driver::{BotDriver, DriverReport, TurnResult};
pub use game_runner::{EndReason, GameRecord, GameRunner};
pub use series::{run_series, run_series_with, SeriesResult};
