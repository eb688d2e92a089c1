//! HEXCLAIM Core - Game engine and bot search
//!
//! This crate provides the core game logic for HEXCLAIM:
//! - Offset hex grid geometry and neighbour ordering
//! - Directional ray and flood-fill traversal
//! - Move legality and application (capture, wear, territory resolution)
//! - Bounded-depth bot search with score-margin evaluation
//! - Row-level snapshot adapters and a store seam
//! - Random board setup

pub mod grid;
pub mod board;
pub mod connectivity;
pub mod engine;
pub mod search;
pub mod snapshot;
pub mod setup;
pub mod error;

// Re-exports for convenient access
pub use grid::{to_column, to_index, to_row, Coord, Direction, Grid, DIRECTIONS};
pub use board::{Board, Cell, Player, PlayerId, PlayerKind};
pub use connectivity::{components, Component, RayVisitor};
pub use engine::{MoveOutcome, Turn};
pub use search::{choose_move, evaluate, BotPlayer, SearchConfig, DEFAULT_DEPTH};
pub use snapshot::{ChangeSet, MemoryStore, Snapshot, SnapshotStore};
pub use setup::{generate, generate_seeded, SetupConfig};
pub use error::{EngineError, SetupError, SnapshotError, StoreError};
