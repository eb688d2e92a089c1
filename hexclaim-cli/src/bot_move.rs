//! Bot-move command - ask the search for a move

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use hexclaim_core::{choose_move, Board, DEFAULT_DEPTH};

#[derive(Args)]
pub struct BotMoveArgs {
    /// Board JSON file
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,

    /// Player to move
    #[arg(long)]
    pub player: usize,

    /// Search depth
    #[arg(long, default_value_t = DEFAULT_DEPTH)]
    pub depth: u32,
}

pub fn run(args: BotMoveArgs) -> Result<()> {
    let board = Board::load(&args.board)
        .with_context(|| format!("Failed to load board: {}", args.board.display()))?;
    if board.player(args.player).is_none() {
        bail!("Unknown player: {}", args.player);
    }

    match choose_move(&board, args.player, args.depth) {
        Some(target) => {
            let coord = board.coord(target);
            println!("{} (col {}, row {})", target, coord.col, coord.row);
        }
        None => println!("none"),
    }
    Ok(())
}
