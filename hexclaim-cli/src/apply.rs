//! Apply command - check and play one move on a board file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexclaim_core::{Board, MoveOutcome, Turn};

#[derive(Args)]
pub struct ApplyArgs {
    /// Board JSON file
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Moving player
    #[arg(long)]
    pub player: usize,

    /// Target cell index
    #[arg(long)]
    pub target: usize,

    /// Where to write the result (defaults to the input file)
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn run(args: ApplyArgs) -> Result<()> {
    let mut board = Board::load(&args.board)
        .with_context(|| format!("Failed to load board: {}", args.board.display()))?;

    let outcome = board
        .apply_move(args.player, args.target)
        .context("Move rejected")?;
    print_summary(&board, &outcome);

    board.clear_modified();
    let output = args.output.as_ref().unwrap_or(&args.board);
    board
        .save(output)
        .with_context(|| format!("Failed to write board: {}", output.display()))?;
    Ok(())
}

fn print_summary(board: &Board, outcome: &MoveOutcome) {
    println!("Changed cells: {}", board.modified_cells().count());
    for player in board.modified_players() {
        println!("  Player {}: score {}, at {}", player.id, player.score, player.position);
    }
    if !outcome.isolated_cells.is_empty() {
        println!("Collected {} isolated cells", outcome.isolated_cells.len());
    }
    for id in &outcome.boxed_in {
        println!("Player {} is boxed in", id);
    }
    for id in &outcome.blocked {
        println!("Player {} is blocked", id);
    }
    match outcome.turn {
        Turn::AwaitingMove(next) => println!("Next: player {}", next),
        Turn::Finished => println!("Game finished"),
    }
}
