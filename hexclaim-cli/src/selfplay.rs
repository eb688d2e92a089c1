//! Selfplay command - bot-only series with a progress bar

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use hexclaim_arena::{run_series_with, ArenaConfig, BotConfig, SeriesResult};
use hexclaim_core::{SetupConfig, DEFAULT_DEPTH};

#[derive(Args)]
pub struct SelfplayArgs {
    /// Number of games
    #[arg(long, default_value = "10")]
    pub games: usize,

    /// Search depth
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,

    /// Bots per game
    #[arg(long, default_value = "2")]
    pub players: usize,

    /// Grid width
    #[arg(long, default_value = "10")]
    pub width: usize,

    /// Grid height
    #[arg(long, default_value = "10")]
    pub height: usize,

    /// Maximum moves per game
    #[arg(long, default_value = "500")]
    pub max_moves: usize,

    /// Play games in parallel
    #[arg(long)]
    pub parallel: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SelfplayArgs, seed: Option<u64>) -> Result<()> {
    let config = ArenaConfig::with_games(args.games)
        .with_setup(
            SetupConfig::default()
                .with_size(args.width, args.height)
                .with_players(args.players, 0),
        )
        .with_bot(BotConfig::with_depth(args.depth).with_max_moves(args.max_moves))
        .with_parallel(args.parallel)
        .with_seed(seed.unwrap_or_else(rand::random));

    let progress = ProgressBar::new(args.games as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} games ({elapsed})")
            .context("Invalid progress template")?,
    );

    let result = run_series_with(&config, |_| progress.inc(1)).context("Failed to set up games")?;
    progress.finish_and_clear();

    if args.json {
        println!("{}", json_report(&result, &config)?);
    } else {
        print_text_results(&result, &config);
    }
    Ok(())
}

/// Series result plus the settings needed to reproduce it
#[derive(serde::Serialize)]
struct JsonReport<'a> {
    seed: u64,
    depth: u32,
    players: usize,
    width: usize,
    height: usize,
    #[serde(flatten)]
    result: &'a SeriesResult,
}

fn json_report(result: &SeriesResult, config: &ArenaConfig) -> Result<String> {
    let report = JsonReport {
        seed: config.seed,
        depth: config.bot.depth,
        players: config.setup.player_count(),
        width: config.setup.width,
        height: config.setup.height,
        result,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn print_text_results(result: &SeriesResult, config: &ArenaConfig) {
    println!("\n=== Selfplay Results ===");
    println!("Seed:        {}", config.seed);
    println!("Total games: {}", result.games);
    for (seat, wins) in result.wins.iter().enumerate() {
        println!(
            "Seat {} wins: {} ({:.1}%)",
            seat,
            wins,
            result.win_rate(seat) * 100.0
        );
    }
    println!("Shared:      {}", result.shared);
    println!("Avg margin:  {:.2}", result.avg_margin);
    println!("Avg moves:   {:.1}", result.avg_moves);
    println!(
        "Ended:       {} finished, {} at move limit, {} without candidate",
        result.finished, result.move_limit, result.no_candidate
    );
}
