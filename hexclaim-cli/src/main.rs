//! HEXCLAIM CLI - Command-line interface
//!
//! Commands:
//! - new: Generate a board
//! - show: Render a board
//! - bot-move: Ask the bot for a move
//! - apply: Apply a move to a board file
//! - selfplay: Run a series of bot-only games

mod apply;
mod bot_move;
mod new_game;
mod selfplay;
mod show;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexclaim")]
#[command(about = "HEXCLAIM hex territory game engine")]
struct Cli {
    /// Random seed for reproducibility
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a random board
    New(new_game::NewArgs),
    /// Render a board with scores
    Show(show::ShowArgs),
    /// Print the bot's chosen target
    BotMove(bot_move::BotMoveArgs),
    /// Check and apply a move
    Apply(apply::ApplyArgs),
    /// Play bot-only games and report
    Selfplay(selfplay::SelfplayArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::New(args) => new_game::run(args, cli.seed),
        Commands::Show(args) => show::run(args),
        Commands::BotMove(args) => bot_move::run(args),
        Commands::Apply(args) => apply::run(args),
        Commands::Selfplay(args) => selfplay::run(args, cli.seed),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
