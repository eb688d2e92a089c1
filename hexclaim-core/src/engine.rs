//! Move legality and move application
//!
//! A game is always either waiting for a player's move or finished. One call
//! to [`Board::apply_move`] captures the target cell, wears down the vacated
//! one, resolves territory that fractured off, updates mobility and hands
//! the turn to the next mobile player.

use serde::{Deserialize, Serialize};

use crate::board::{Board, PlayerId};
use crate::connectivity::{components, has_reachable_target, is_reachable, reachable_targets};
use crate::error::EngineError;

// ============================================================================
// CORE TYPES
// ============================================================================

/// Whose move it is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    AwaitingMove(PlayerId),
    Finished,
}

impl Turn {
    pub fn player(self) -> Option<PlayerId> {
        match self {
            Turn::AwaitingMove(id) => Some(id),
            Turn::Finished => None,
        }
    }

    pub fn is_finished(self) -> bool {
        self == Turn::Finished
    }
}

/// What a move changed besides the dirty flags on the board
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub turn: Turn,
    /// Cells of playerless components drained by the mover
    pub isolated_cells: Vec<usize>,
    /// Players left alone in their own component
    pub boxed_in: Vec<PlayerId>,
    /// Players that lost their last reachable cell this move
    pub blocked: Vec<PlayerId>,
}

impl MoveOutcome {
    pub fn end_of_game(&self) -> bool {
        self.turn.is_finished()
    }
}

// ============================================================================
// LEGALITY
// ============================================================================

impl Board {
    /// Check if `player` can slide from its cell to `target`
    pub fn can_move(&self, player: PlayerId, target: usize) -> bool {
        let from = match self.players.get(player) {
            Some(p) => p.position,
            None => return false,
        };
        if target >= self.cells.len() {
            return false;
        }
        is_reachable(&self.cells, self.grid(), self.coord(from), target)
    }

    /// Every legal target for `player`, in traversal order
    pub fn legal_moves(&self, player: PlayerId) -> Vec<usize> {
        match self.players.get(player) {
            Some(p) => reachable_targets(&self.cells, self.grid(), self.coord(p.position)),
            None => vec![],
        }
    }

    // ========================================================================
    // APPLY MOVE
    // ========================================================================

    /// Validate and apply a move. Nothing changes when the move is illegal.
    pub fn apply_move(&mut self, player: PlayerId, target: usize) -> Result<MoveOutcome, EngineError> {
        if player >= self.players.len() {
            return Err(EngineError::UnknownPlayer(player));
        }
        if !self.can_move(player, target) {
            return Err(EngineError::IllegalMove { player, target });
        }
        Ok(self.move_unchecked(player, target))
    }

    /// Apply a move already known to be legal
    pub(crate) fn move_unchecked(&mut self, mover: PlayerId, target: usize) -> MoveOutcome {
        debug_assert!(self.can_move(mover, target), "illegal move {} -> {}", mover, target);

        let source = self.players[mover].position;
        tracing::trace!(player = mover, from = source, to = target, "move");

        self.capture(mover, target);
        self.vacate(source);

        let (isolated_cells, boxed_in) = self.resolve_components(mover);
        let blocked = self.update_blocked_players();

        let turn = match self.next_mobile_player(mover) {
            Some(next) => Turn::AwaitingMove(next),
            None => {
                self.finish(mover);
                Turn::Finished
            }
        };

        MoveOutcome {
            turn,
            isolated_cells,
            boxed_in,
            blocked,
        }
    }

    /// Occupy `target`, collecting its resources when taken at its base tier
    fn capture(&mut self, mover: PlayerId, target: usize) {
        let cell = &mut self.cells[target];
        let gained = if cell.state == 1 {
            std::mem::take(&mut cell.resources)
        } else {
            0
        };
        cell.owner = Some(mover);
        cell.modified = true;

        let player = &mut self.players[mover];
        player.score += i64::from(gained);
        player.position = target;
        player.modified = true;
    }

    /// Leave a cell behind, wearing it down by one
    fn vacate(&mut self, source: usize) {
        let cell = &mut self.cells[source];
        cell.state = cell.state.saturating_sub(1);
        cell.owner = None;
        cell.modified = true;
    }

    /// Collect resources from cells and take them out of play
    fn drain(&mut self, positions: &[usize]) -> i64 {
        let mut total = 0;
        for &pos in positions {
            let cell = &mut self.cells[pos];
            total += i64::from(std::mem::take(&mut cell.resources));
            cell.state = 0;
            cell.modified = true;
        }
        total
    }

    /// Resolve fractured territory.
    ///
    /// Playerless components go to the mover. A player alone in a component
    /// with other cells collects those cells and stops moving.
    fn resolve_components(&mut self, mover: PlayerId) -> (Vec<usize>, Vec<PlayerId>) {
        let components = components(&self.cells, self.grid());

        let mut isolated_cells = Vec::new();
        for component in components.iter().filter(|c| c.is_isolated()) {
            let drained = self.drain(&component.cells);
            tracing::debug!(
                component = component.id,
                cells = component.cells.len(),
                resources = drained,
                player = mover,
                "isolated component collected"
            );
            let player = &mut self.players[mover];
            player.score += drained;
            player.modified = true;
            isolated_cells.extend_from_slice(&component.cells);
        }

        let mut boxed_in = Vec::new();
        for component in &components {
            let Some(player) = component.boxed_in_player() else {
                continue;
            };
            let unowned: Vec<usize> = component
                .cells
                .iter()
                .copied()
                .filter(|&pos| self.cells[pos].owner.is_none())
                .collect();
            let drained = self.drain(&unowned);
            tracing::debug!(
                component = component.id,
                player,
                resources = drained,
                "player boxed in"
            );
            let boxed = &mut self.players[player];
            boxed.score += drained;
            boxed.can_move = false;
            boxed.modified = true;
            boxed_in.push(player);
        }

        (isolated_cells, boxed_in)
    }

    /// Mark players with no reachable cell as immobile
    fn update_blocked_players(&mut self) -> Vec<PlayerId> {
        let grid = self.grid();
        let mut blocked = Vec::new();

        for id in 0..self.players.len() {
            let player = self.players[id];
            let cell = self.cells[player.position];
            if !player.can_move || cell.state == 0 || cell.owner != Some(id) {
                continue;
            }
            if !has_reachable_target(&self.cells, grid, grid.coord(player.position)) {
                let p = &mut self.players[id];
                p.can_move = false;
                p.modified = true;
                blocked.push(id);
            }
        }

        if !blocked.is_empty() {
            tracing::debug!(?blocked, "players blocked");
        }
        blocked
    }

    /// First mobile player after `mover`, wrapping; never `mover` itself
    pub fn next_mobile_player(&self, mover: PlayerId) -> Option<PlayerId> {
        let count = self.players.len();
        (1..count)
            .map(|offset| (mover + offset) % count)
            .find(|&id| self.players[id].can_move)
    }

    /// Hand every unclaimed resource to the last mover and close the board
    fn finish(&mut self, mover: PlayerId) {
        let open: Vec<usize> = self
            .cells
            .iter()
            .filter(|c| c.is_open())
            .map(|c| c.position)
            .collect();
        let swept = self.drain(&open);

        let player = &mut self.players[mover];
        player.score += swept;
        player.modified = true;

        tracing::info!(player = mover, swept, "game finished");
    }
}

// ============================================================================
// TESTS
// ============================================================================
