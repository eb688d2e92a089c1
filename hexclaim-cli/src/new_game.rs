//! New command - generate a random board

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use hexclaim_core::{generate, SetupConfig};

#[derive(Args)]
pub struct NewArgs {
    /// Grid width
    #[arg(long, default_value = "10")]
    pub width: usize,

    /// Grid height
    #[arg(long, default_value = "10")]
    pub height: usize,

    /// Number of bot players (seated first)
    #[arg(long, default_value = "1")]
    pub bots: usize,

    /// Number of human players
    #[arg(long, default_value = "1")]
    pub humans: usize,

    /// Highest resource count per cell
    #[arg(long, default_value = "3")]
    pub max_resources: u32,

    /// Board JSON file to write
    #[arg(long, value_name = "FILE")]
    pub output: PathBuf,
}

pub fn run(args: NewArgs, seed: Option<u64>) -> Result<()> {
    let config = SetupConfig {
        width: args.width,
        height: args.height,
        max_resources: args.max_resources,
        bots: args.bots,
        humans: args.humans,
    };
    let mut rng = create_rng(seed);
    let board = generate(&config, &mut rng).context("Failed to generate board")?;

    board
        .save(&args.output)
        .with_context(|| format!("Failed to write board: {}", args.output.display()))?;

    tracing::info!(
        "Generated {}x{} board with {} players: {}",
        board.width,
        board.height,
        board.players.len(),
        args.output.display()
    );
    Ok(())
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}
