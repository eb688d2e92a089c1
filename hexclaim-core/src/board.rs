//! Board snapshot: cells, players and grid dimensions

use crate::error::SnapshotError;
use crate::grid::{Coord, Grid};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Dense player index, also the turn order
pub type PlayerId = usize;

// ============================================================================
// CELLS
// ============================================================================

/// One grid position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub position: usize,
    /// Player currently standing on the cell
    pub owner: Option<PlayerId>,
    pub resources: u32,
    /// Remaining durability; 0 means permanently inert
    pub state: u32,
    /// Dirty flag for persistence, not part of the cell's identity
    #[serde(default, skip_serializing)]
    pub modified: bool,
}

impl Cell {
    pub fn new(position: usize, resources: u32, state: u32) -> Self {
        Self {
            position,
            owner: None,
            resources,
            state,
            modified: false,
        }
    }

    /// Cell can still be walked over or flood-filled
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state > 0
    }

    /// Cell can be entered by a move
    #[inline]
    pub fn is_open(&self) -> bool {
        self.state > 0 && self.owner.is_none()
    }
}

// ============================================================================
// PLAYERS
// ============================================================================

/// Who decides a player's moves
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerKind {
    #[default]
    Human,
    Bot,
}

/// One participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Cell entered most recently
    pub position: usize,
    pub can_move: bool,
    pub score: i64,
    #[serde(default)]
    pub kind: PlayerKind,
    #[serde(default, skip_serializing)]
    pub modified: bool,
}

impl Player {
    pub fn new(id: PlayerId, position: usize, kind: PlayerKind) -> Self {
        Self {
            id,
            position,
            can_move: true,
            score: 0,
            kind,
            modified: false,
        }
    }

    pub fn is_bot(&self) -> bool {
        self.kind == PlayerKind::Bot
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Whole game board (clone to branch)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Cell>,
    pub players: Vec<Player>,
}

impl Board {
    /// Build a board from already-ordered cells and players.
    ///
    /// Fails when the snapshot breaks an ownership or ordering invariant.
    pub fn new(
        width: usize,
        height: usize,
        cells: Vec<Cell>,
        players: Vec<Player>,
    ) -> Result<Self, SnapshotError> {
        let board = Self {
            width,
            height,
            cells,
            players,
        };
        board.validate()?;
        Ok(board)
    }

    /// A fresh board where every cell has the same resources and state and
    /// no player is placed yet
    pub fn uniform(width: usize, height: usize, resources: u32, state: u32) -> Self {
        Self {
            width,
            height,
            cells: (0..width * height)
                .map(|pos| Cell::new(pos, resources, state))
                .collect(),
            players: Vec::new(),
        }
    }

    /// Place a new player on `position` and return its id.
    ///
    /// The cell's resources are credited as the player's starting score.
    pub fn add_player(&mut self, position: usize, kind: PlayerKind) -> PlayerId {
        let id = self.players.len();
        let mut player = Player::new(id, position, kind);
        if let Some(cell) = self.cells.get_mut(position) {
            player.score = i64::from(cell.resources);
            cell.resources = 0;
            cell.owner = Some(id);
        }
        self.players.push(player);
        id
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }

    pub fn coord(&self, pos: usize) -> Coord {
        self.grid().coord(pos)
    }

    pub fn cell(&self, pos: usize) -> Option<&Cell> {
        self.cells.get(pos)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Resources still claimable: unowned cells that are not inert
    pub fn remaining_resources(&self) -> i64 {
        self.cells
            .iter()
            .filter(|c| c.is_open())
            .map(|c| i64::from(c.resources))
            .sum()
    }

    /// Resources held by any non-inert cell, owned or not
    pub fn live_resources(&self) -> i64 {
        self.cells
            .iter()
            .filter(|c| c.is_alive())
            .map(|c| i64::from(c.resources))
            .sum()
    }

    pub fn total_score(&self) -> i64 {
        self.players.iter().map(|p| p.score).sum()
    }

    /// Players that still have a legal move
    pub fn mobile_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(|p| p.can_move)
    }

    pub fn modified_cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter().filter(|c| c.modified)
    }

    pub fn modified_players(&self) -> impl Iterator<Item = &Player> + '_ {
        self.players.iter().filter(|p| p.modified)
    }

    /// Forget dirty flags once the changes have been persisted
    pub fn clear_modified(&mut self) {
        self.cells.iter_mut().for_each(|c| c.modified = false);
        self.players.iter_mut().for_each(|p| p.modified = false);
    }

    // ========================================================================
    // VALIDATION
    // ========================================================================

    /// Check the snapshot invariants the engine relies on
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let expected = self.width * self.height;
        if self.cells.len() != expected {
            return Err(SnapshotError::CellCount {
                expected,
                found: self.cells.len(),
            });
        }

        for (index, cell) in self.cells.iter().enumerate() {
            if cell.position != index {
                return Err(SnapshotError::CellOrder {
                    index,
                    position: cell.position,
                });
            }
            if let Some(owner) = cell.owner {
                if cell.state == 0 {
                    return Err(SnapshotError::InertOwnedCell { position: index });
                }
                if owner >= self.players.len() {
                    return Err(SnapshotError::UnknownOwner {
                        position: index,
                        player: owner,
                    });
                }
            }
        }

        for (index, player) in self.players.iter().enumerate() {
            if player.id != index {
                return Err(SnapshotError::PlayerOrder {
                    index,
                    player: player.id,
                });
            }
            let cell = self
                .cells
                .get(player.position)
                .ok_or(SnapshotError::PositionOutOfRange {
                    player: player.id,
                    position: player.position,
                })?;
            if cell.owner != Some(player.id) {
                return Err(SnapshotError::OwnerMismatch {
                    player: player.id,
                    position: player.position,
                });
            }
        }

        // A player owns its current cell and nothing else
        for cell in &self.cells {
            if let Some(owner) = cell.owner {
                if self.players[owner].position != cell.position {
                    return Err(SnapshotError::StrayOwnership {
                        position: cell.position,
                        player: owner,
                    });
                }
            }
        }

        Ok(())
    }

    // ========================================================================
    // FILE I/O
    // ========================================================================

    /// Load from a JSON file and validate
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let board: Board = serde_json::from_str(&content)?;
        board.validate()?;
        Ok(board)
    }

    /// Save to a JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_player_board() -> Board {
        let mut board = Board::uniform(3, 3, 2, 1);
        board.add_player(0, PlayerKind::Human);
        board.add_player(8, PlayerKind::Bot);
        board
    }

    #[test]
    fn test_add_player_credits_start_cell() {
        let board = two_player_board();
        assert_eq!(board.players[0].score, 2);
        assert_eq!(board.cells[0].resources, 0);
        assert_eq!(board.cells[0].owner, Some(0));
        assert_eq!(board.cells[8].owner, Some(1));
        assert!(board.players[1].is_bot());
        assert!(board.validate().is_ok());
    }

    #[test]
    fn test_remaining_resources() {
        let board = two_player_board();
        // 7 open cells with 2 resources each
        assert_eq!(board.remaining_resources(), 14);
        assert_eq!(board.total_score(), 4);
    }

    #[test]
    fn test_validate_cell_count() {
        let mut board = two_player_board();
        board.cells.pop();
        assert!(matches!(
            board.validate(),
            Err(SnapshotError::CellCount { expected: 9, found: 8 })
        ));
    }

    #[test]
    fn test_validate_inert_owned_cell() {
        let mut board = two_player_board();
        board.cells[0].state = 0;
        assert!(matches!(
            board.validate(),
            Err(SnapshotError::InertOwnedCell { position: 0 })
        ));
    }

    #[test]
    fn test_validate_owner_mismatch() {
        let mut board = two_player_board();
        board.players[0].position = 4;
        assert!(matches!(
            board.validate(),
            Err(SnapshotError::OwnerMismatch { player: 0, position: 4 })
        ));
    }

    #[test]
    fn test_validate_unknown_owner() {
        let mut board = two_player_board();
        board.cells[4].owner = Some(7);
        assert!(matches!(
            board.validate(),
            Err(SnapshotError::UnknownOwner { position: 4, player: 7 })
        ));
    }

    #[test]
    fn test_validate_stray_ownership() {
        let mut board = Board::uniform(5, 1, 1, 1);
        board.add_player(0, PlayerKind::Human);
        board.add_player(4, PlayerKind::Bot);
        board.cells[2].owner = Some(0);
        assert!(matches!(
            board.validate(),
            Err(SnapshotError::StrayOwnership { position: 2, player: 0 })
        ));
        assert!(Board::new(5, 1, board.cells.clone(), board.players.clone()).is_err());
    }

    #[test]
    fn test_serde_skips_dirty_flags() {
        let mut board = two_player_board();
        board.cells[3].modified = true;
        let json = serde_json::to_string(&board).unwrap();
        let back: Board = serde_json::from_str(&json).unwrap();
        assert!(!back.cells[3].modified);
        assert_eq!(back.players, board.players);
    }
}
