//! Row-level adapters between persisted games and [`Board`]
//!
//! The store keeps one game row plus one row per cell and per player. A
//! [`Snapshot`] is built from those rows, moves are applied to its board and
//! only the dirty rows travel back as a [`ChangeSet`].

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Cell, Player, PlayerId, PlayerKind};
use crate::engine::{MoveOutcome, Turn};
use crate::error::{EngineError, SnapshotError, StoreError};

// ============================================================================
// ROWS
// ============================================================================

/// Game header row
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRow {
    pub id: u64,
    pub width: u32,
    pub height: u32,
    /// Player expected to move; meaningless once finished
    pub turn_player_id: Option<u32>,
    pub finished: bool,
    /// Incremented on every stored move
    pub sequence_num: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRow {
    pub position: u32,
    pub player_id: Option<u32>,
    pub resources: u32,
    pub state: u32,
}

/// A player is a bot when it is backed by a virtual user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRow {
    pub player_id: u32,
    pub position: u32,
    pub can_move: bool,
    pub score: i64,
    pub user_id: Option<u64>,
    pub virtual_user_id: Option<u64>,
}

impl PlayerRow {
    pub fn is_bot(&self) -> bool {
        self.virtual_user_id.is_some()
    }
}

/// Account columns carried through untouched
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: Option<u64>,
    pub virtual_user_id: Option<u64>,
}

// ============================================================================
// CHANGE SETS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameUpdate {
    pub turn_player_id: Option<u32>,
    pub finished: bool,
    pub sequence_num: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    pub position: u32,
    pub player_id: Option<u32>,
    pub state: u32,
    pub resources: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerUpdate {
    pub player_id: u32,
    pub position: u32,
    pub score: i64,
    pub can_move: bool,
}

/// Rows to write back after a move
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub game_id: u64,
    pub game: GameUpdate,
    pub cells: Vec<CellUpdate>,
    pub players: Vec<PlayerUpdate>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty() && self.players.is_empty()
    }
}

// ============================================================================
// SNAPSHOT
// ============================================================================

/// One loaded game
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub game: GameRow,
    pub board: Board,
    /// Indexed by player id
    pub accounts: Vec<Account>,
}

impl Snapshot {
    /// Wrap a freshly set up board as game `id`.
    ///
    /// Bots get a virtual user, humans a regular one, both numbered after
    /// the player id.
    pub fn new(id: u64, board: Board) -> Self {
        let accounts = board
            .players
            .iter()
            .map(|p| match p.kind {
                PlayerKind::Bot => Account {
                    user_id: None,
                    virtual_user_id: Some(p.id as u64),
                },
                PlayerKind::Human => Account {
                    user_id: Some(p.id as u64),
                    virtual_user_id: None,
                },
            })
            .collect();
        let first = board.mobile_players().next().map(|p| p.id as u32);
        let game = GameRow {
            id,
            width: board.width as u32,
            height: board.height as u32,
            turn_player_id: first,
            finished: first.is_none(),
            sequence_num: 0,
        };
        Self {
            game,
            board,
            accounts,
        }
    }

    /// Build a snapshot from stored rows in any order
    pub fn from_rows(
        game: GameRow,
        mut cells: Vec<CellRow>,
        mut players: Vec<PlayerRow>,
    ) -> Result<Self, SnapshotError> {
        if game.width == 0 || game.height == 0 {
            return Err(SnapshotError::Dimensions {
                width: game.width,
                height: game.height,
            });
        }
        cells.sort_by_key(|c| c.position);
        players.sort_by_key(|p| p.player_id);

        let cells = cells
            .into_iter()
            .map(|row| Cell {
                position: row.position as usize,
                owner: row.player_id.map(|id| id as PlayerId),
                resources: row.resources,
                state: row.state,
                modified: false,
            })
            .collect();

        let mut accounts = Vec::with_capacity(players.len());
        let players = players
            .into_iter()
            .map(|row| {
                accounts.push(Account {
                    user_id: row.user_id,
                    virtual_user_id: row.virtual_user_id,
                });
                Player {
                    id: row.player_id as PlayerId,
                    position: row.position as usize,
                    can_move: row.can_move,
                    score: row.score,
                    kind: if row.is_bot() {
                        PlayerKind::Bot
                    } else {
                        PlayerKind::Human
                    },
                    modified: false,
                }
            })
            .collect();

        let board = Board::new(game.width as usize, game.height as usize, cells, players)?;
        Ok(Self {
            game,
            board,
            accounts,
        })
    }

    /// Full row image, the inverse of [`Snapshot::from_rows`]
    pub fn to_rows(&self) -> (GameRow, Vec<CellRow>, Vec<PlayerRow>) {
        let cells = self
            .board
            .cells
            .iter()
            .map(|c| CellRow {
                position: c.position as u32,
                player_id: c.owner.map(|id| id as u32),
                resources: c.resources,
                state: c.state,
            })
            .collect();
        let players = self
            .board
            .players
            .iter()
            .map(|p| {
                let account = self.accounts.get(p.id).copied().unwrap_or_default();
                PlayerRow {
                    player_id: p.id as u32,
                    position: p.position as u32,
                    can_move: p.can_move,
                    score: p.score,
                    user_id: account.user_id,
                    virtual_user_id: account.virtual_user_id,
                }
            })
            .collect();
        (self.game.clone(), cells, players)
    }

    pub fn turn(&self) -> Turn {
        match self.game.turn_player_id {
            Some(id) if !self.game.finished => Turn::AwaitingMove(id as PlayerId),
            _ => Turn::Finished,
        }
    }

    /// Apply a move to the board and advance the game row
    pub fn apply_move(&mut self, player: PlayerId, target: usize) -> Result<MoveOutcome, EngineError> {
        let outcome = self.board.apply_move(player, target)?;
        self.record(&outcome);
        Ok(outcome)
    }

    fn record(&mut self, outcome: &MoveOutcome) {
        self.game.turn_player_id = outcome.turn.player().map(|id| id as u32);
        self.game.finished = outcome.end_of_game();
        self.game.sequence_num += 1;
    }

    /// Dirty rows plus the game row update
    pub fn changes(&self) -> ChangeSet {
        ChangeSet {
            game_id: self.game.id,
            game: GameUpdate {
                turn_player_id: self.game.turn_player_id,
                finished: self.game.finished,
                sequence_num: self.game.sequence_num,
            },
            cells: self
                .board
                .modified_cells()
                .map(|c| CellUpdate {
                    position: c.position as u32,
                    player_id: c.owner.map(|id| id as u32),
                    state: c.state,
                    resources: c.resources,
                })
                .collect(),
            players: self
                .board
                .modified_players()
                .map(|p| PlayerUpdate {
                    player_id: p.id as u32,
                    position: p.position as u32,
                    score: p.score,
                    can_move: p.can_move,
                })
                .collect(),
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Persistence seam for games
pub trait SnapshotStore {
    fn load(&self, game_id: u64) -> Result<Snapshot, StoreError>;

    fn save(&mut self, changes: &ChangeSet) -> Result<(), StoreError>;

    /// Unfinished games whose turn player is a bot, by ascending id
    fn pending_bot_games(&self) -> Result<Vec<u64>, StoreError>;
}

#[derive(Clone, Debug)]
struct StoredGame {
    game: GameRow,
    cells: Vec<CellRow>,
    players: Vec<PlayerRow>,
}

/// In-process store keyed by game id
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    games: FxHashMap<u64, StoredGame>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a whole game
    pub fn insert(&mut self, snapshot: &Snapshot) {
        let (game, cells, players) = snapshot.to_rows();
        self.games.insert(
            game.id,
            StoredGame {
                game,
                cells,
                players,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn game(&self, game_id: u64) -> Option<&GameRow> {
        self.games.get(&game_id).map(|g| &g.game)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, game_id: u64) -> Result<Snapshot, StoreError> {
        let stored = self.games.get(&game_id).ok_or(StoreError::NotFound(game_id))?;
        Ok(Snapshot::from_rows(
            stored.game.clone(),
            stored.cells.clone(),
            stored.players.clone(),
        )?)
    }

    fn save(&mut self, changes: &ChangeSet) -> Result<(), StoreError> {
        let stored = self
            .games
            .get_mut(&changes.game_id)
            .ok_or(StoreError::NotFound(changes.game_id))?;
        if stored.game.finished {
            return Err(StoreError::Finished(changes.game_id));
        }

        for update in &changes.cells {
            if let Some(row) = stored.cells.iter_mut().find(|c| c.position == update.position) {
                row.player_id = update.player_id;
                row.state = update.state;
                row.resources = update.resources;
            }
        }
        for update in &changes.players {
            if let Some(row) = stored.players.iter_mut().find(|p| p.player_id == update.player_id) {
                row.position = update.position;
                row.score = update.score;
                row.can_move = update.can_move;
            }
        }

        stored.game.turn_player_id = changes.game.turn_player_id;
        stored.game.finished = changes.game.finished;
        stored.game.sequence_num = changes.game.sequence_num;

        tracing::debug!(
            game = changes.game_id,
            cells = changes.cells.len(),
            players = changes.players.len(),
            sequence = changes.game.sequence_num,
            "changes stored"
        );
        Ok(())
    }

    fn pending_bot_games(&self) -> Result<Vec<u64>, StoreError> {
        let mut ids: Vec<u64> = self
            .games
            .values()
            .filter(|g| !g.game.finished)
            .filter(|g| {
                g.game.turn_player_id.is_some_and(|turn| {
                    g.players
                        .iter()
                        .any(|p| p.player_id == turn && p.is_bot())
                })
            })
            .map(|g| g.game.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }
}
