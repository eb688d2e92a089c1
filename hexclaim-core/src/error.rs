//! Error types

use crate::board::PlayerId;

/// Rejected move requests
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("Player {player} cannot move to cell {target}")]
    IllegalMove { player: PlayerId, target: usize },

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),
}

/// Malformed board snapshots
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("Expected {expected} cells, found {found}")]
    CellCount { expected: usize, found: usize },

    #[error("Cell at index {index} reports position {position}")]
    CellOrder { index: usize, position: usize },

    #[error("Player at index {index} reports id {player}")]
    PlayerOrder { index: usize, player: PlayerId },

    #[error("Player {player} stands outside the grid at {position}")]
    PositionOutOfRange { player: PlayerId, position: usize },

    #[error("Inert cell {position} has an owner")]
    InertOwnedCell { position: usize },

    #[error("Player {player} is not the owner of its cell {position}")]
    OwnerMismatch { player: PlayerId, position: usize },

    #[error("Cell {position} is owned by unknown player {player}")]
    UnknownOwner { position: usize, player: PlayerId },

    #[error("Cell {position} is owned by player {player}, who stands elsewhere")]
    StrayOwnership { position: usize, player: PlayerId },

    #[error("Invalid grid dimensions {width}x{height}")]
    Dimensions { width: u32, height: u32 },
}

/// Board generation failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SetupError {
    #[error("Grid {width}x{height} is too small (minimum {min}x{min})")]
    GridTooSmall { width: usize, height: usize, min: usize },

    #[error("Cannot place {players} players on {available} starting cells")]
    TooManyPlayers { players: usize, available: usize },

    #[error("A game needs at least one player")]
    NoPlayers,
}

/// Snapshot store failures
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Game not found: {0}")]
    NotFound(u64),

    #[error("Game {0} is already finished")]
    Finished(u64),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
