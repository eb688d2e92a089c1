//! Show command - render a board as text

use std::fmt::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use hexclaim_core::Board;

#[derive(Args)]
pub struct ShowArgs {
    /// Board JSON file
    #[arg(long, value_name = "FILE")]
    pub board: PathBuf,
}

pub fn run(args: ShowArgs) -> Result<()> {
    let board = Board::load(&args.board)
        .with_context(|| format!("Failed to load board: {}", args.board.display()))?;
    print!("{}", render(&board));
    Ok(())
}

/// Top row first; odd rows are shifted right by half a cell.
///
/// `.` inert, `@N` player N, otherwise the cell's resources with `+` on
/// doubled cells.
pub fn render(board: &Board) -> String {
    let mut out = String::new();
    for row in (0..board.height).rev() {
        if row % 2 == 1 {
            out.push_str("  ");
        }
        for col in 0..board.width {
            let cell = &board.cells[row * board.width + col];
            let token = match (cell.owner, cell.state) {
                (Some(id), _) => format!("@{}", id),
                (None, 0) => ".".to_string(),
                (None, 1) => cell.resources.to_string(),
                (None, _) => format!("{}+", cell.resources),
            };
            let _ = write!(out, "{:>4}", token);
        }
        out.push('\n');
    }

    out.push('\n');
    for player in &board.players {
        let _ = writeln!(
            out,
            "Player {} ({:?}): score {}{}",
            player.id,
            player.kind,
            player.score,
            if player.can_move { "" } else { ", blocked" }
        );
    }
    let _ = writeln!(out, "Unclaimed: {}", board.remaining_resources());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexclaim_core::PlayerKind;

    #[test]
    fn test_render_tokens() {
        let mut board = Board::uniform(3, 2, 2, 1);
        board.cells[1].state = 0;
        board.cells[2].state = 2;
        board.add_player(3, PlayerKind::Bot);

        let text = render(&board);
        let lines: Vec<&str> = text.lines().collect();
        // Row 1 is odd and printed first
        assert_eq!(lines[0], "    @0   2   2");
        assert_eq!(lines[1], "   2   .  2+");
        assert!(text.contains("Player 0 (Bot): score 2"));
        assert!(text.contains("Unclaimed: 8"));
    }
}
