//! Reachability over the cell grid
//!
//! Two traversals share the same neighbour generator:
//! - directional rays: slide from a cell along each of the six directions
//!   until something blocks (move legality)
//! - flood fill: every live cell connected through live neighbours,
//!   ownership ignored (territory fragmentation)

use std::ops::ControlFlow;

use rustc_hash::FxHashSet;

use crate::board::{Cell, PlayerId};
use crate::grid::{Coord, Grid, DIRECTIONS};

// ============================================================================
// VISITORS
// ============================================================================

/// Callback for ray traversal. `Break` stops the whole traversal.
pub trait RayVisitor {
    fn visit(&mut self, coord: Coord, position: usize) -> ControlFlow<()>;
}

impl<F> RayVisitor for F
where
    F: FnMut(Coord, usize) -> ControlFlow<()>,
{
    fn visit(&mut self, coord: Coord, position: usize) -> ControlFlow<()> {
        self(coord, position)
    }
}

// ============================================================================
// DIRECTIONAL RAYS
// ============================================================================

/// Walk outward from `origin` along each direction in `DIRECTIONS` order.
///
/// A direction continues while the next cell is on the grid, alive and
/// unowned. Returns `Break` if the visitor stopped the traversal early.
pub fn cast_rays<V: RayVisitor>(
    cells: &[Cell],
    grid: Grid,
    origin: Coord,
    visitor: &mut V,
) -> ControlFlow<()> {
    for dir in DIRECTIONS {
        let mut current = origin;
        loop {
            current = current.step(dir);
            let pos = match grid.index(current) {
                Some(pos) => pos,
                None => break,
            };
            match cells.get(pos) {
                Some(cell) if cell.is_open() => visitor.visit(current, pos)?,
                _ => break, // Blocked
            }
        }
    }
    ControlFlow::Continue(())
}

/// All cells a player at `origin` could move to, in traversal order
pub fn reachable_targets(cells: &[Cell], grid: Grid, origin: Coord) -> Vec<usize> {
    let mut targets = Vec::new();
    let _ = cast_rays(cells, grid, origin, &mut |_: Coord, pos: usize| {
        targets.push(pos);
        ControlFlow::Continue(())
    });
    targets
}

/// Whether at least one ray from `origin` has a first step
pub fn has_reachable_target(cells: &[Cell], grid: Grid, origin: Coord) -> bool {
    cast_rays(cells, grid, origin, &mut |_: Coord, _: usize| ControlFlow::Break(())).is_break()
}

/// Whether `target` lies on one of the rays from `origin`
pub fn is_reachable(cells: &[Cell], grid: Grid, origin: Coord, target: usize) -> bool {
    cast_rays(cells, grid, origin, &mut |_: Coord, pos: usize| {
        if pos == target {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })
    .is_break()
}

// ============================================================================
// FLOOD FILL
// ============================================================================

/// Visit every live cell connected to `origin` through live neighbours.
///
/// `visited` is shared across calls so a cell is reported at most once over
/// a whole decomposition. Nothing is visited when `origin` is inert or
/// already seen.
pub fn flood_fill<F>(
    cells: &[Cell],
    grid: Grid,
    origin: usize,
    visited: &mut FxHashSet<usize>,
    mut visit: F,
) where
    F: FnMut(usize),
{
    let alive = |pos: usize| cells.get(pos).is_some_and(|c| c.is_alive());

    if !alive(origin) || !visited.insert(origin) {
        return;
    }

    let mut stack = vec![origin];
    while let Some(pos) = stack.pop() {
        visit(pos);

        // Reverse so the first direction is explored first
        let coord = grid.coord(pos);
        let next: Vec<usize> = grid
            .neighbors(coord)
            .filter_map(|n| grid.index(n))
            .collect();
        for n in next.into_iter().rev() {
            if alive(n) && visited.insert(n) {
                stack.push(n);
            }
        }
    }
}

// ============================================================================
// COMPONENTS
// ============================================================================

/// Maximal set of mutually flood-fill-reachable live cells
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    /// 1-based, in scan order
    pub id: usize,
    /// Distinct players standing inside
    pub player_ids: Vec<PlayerId>,
    pub cells: Vec<usize>,
}

impl Component {
    fn new(id: usize) -> Self {
        Self {
            id,
            player_ids: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// Nobody stands in it
    pub fn is_isolated(&self) -> bool {
        self.player_ids.is_empty()
    }

    /// A single player shares it with at least one other cell
    pub fn boxed_in_player(&self) -> Option<PlayerId> {
        match self.player_ids.as_slice() {
            [player] if self.cells.len() > 1 => Some(*player),
            _ => None,
        }
    }
}

/// Partition all live cells into connected components.
///
/// Positions are scanned in increasing order; each unvisited live cell seeds
/// a new component.
pub fn components(cells: &[Cell], grid: Grid) -> Vec<Component> {
    let mut visited = FxHashSet::default();
    let mut result = Vec::new();

    for pos in 0..grid.len().min(cells.len()) {
        if visited.contains(&pos) || !cells[pos].is_alive() {
            continue;
        }

        let mut component = Component::new(result.len() + 1);
        flood_fill(cells, grid, pos, &mut visited, |p| {
            if let Some(owner) = cells[p].owner {
                if !component.player_ids.contains(&owner) {
                    component.player_ids.push(owner);
                }
            }
            component.cells.push(p);
        });
        result.push(component);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::grid::to_index;

    fn open_board(width: usize, height: usize) -> Board {
        Board::uniform(width, height, 1, 1)
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn test_rays_on_open_3x3() {
        let board = open_board(3, 3);
        let grid = board.grid();
        // Center (1,1) is on an odd row
        let targets = reachable_targets(&board.cells, grid, Coord::new(1, 1));
        // W, E, SW, NE, SE, NW
        assert_eq!(
            targets,
            vec![
                to_index(0, 1, 3),
                to_index(2, 1, 3),
                to_index(1, 0, 3),
                to_index(2, 2, 3),
                to_index(2, 0, 3),
                to_index(1, 2, 3),
            ]
        );
    }

    #[test]
    fn test_rays_on_3x3_with_obstacles() {
        let mut board = open_board(3, 3);
        // West neighbour inert, NE neighbour occupied
        board.cells[to_index(0, 1, 3)].state = 0;
        board.add_player(to_index(2, 2, 3), crate::board::PlayerKind::Human);

        let origin = Coord::new(1, 1);
        let targets = reachable_targets(&board.cells, board.grid(), origin);
        // E, SW, SE, NW
        assert_eq!(
            targets,
            vec![
                to_index(2, 1, 3),
                to_index(1, 0, 3),
                to_index(2, 0, 3),
                to_index(1, 2, 3),
            ]
        );
        assert!(!is_reachable(&board.cells, board.grid(), origin, to_index(0, 1, 3)));
        assert!(!is_reachable(&board.cells, board.grid(), origin, to_index(2, 2, 3)));
    }

    #[test]
    fn test_rays_slide_until_blocked_5x5() {
        let mut board = open_board(5, 5);
        // Inert cell two steps east of (0,2), an owned cell on the west ray of (4,2)
        board.cells[to_index(2, 2, 5)].state = 0;
        board.add_player(to_index(4, 0, 5), crate::board::PlayerKind::Human);
        let grid = board.grid();

        let targets = reachable_targets(&board.cells, grid, Coord::new(0, 2));
        // East stops before the inert cell
        assert!(targets.contains(&to_index(1, 2, 5)));
        assert!(!targets.contains(&to_index(2, 2, 5)));
        assert!(!targets.contains(&to_index(3, 2, 5)));

        // (0,2) even row: SE ray goes (0,1), (1,0)
        assert!(targets.contains(&to_index(0, 1, 5)));
        assert!(targets.contains(&to_index(1, 0, 5)));
        // NE ray goes (0,3), (1,4)
        assert!(targets.contains(&to_index(0, 3, 5)));
        assert!(targets.contains(&to_index(1, 4, 5)));

        assert_eq!(
            sorted(targets),
            sorted(vec![
                to_index(1, 2, 5),
                to_index(0, 1, 5),
                to_index(1, 0, 5),
                to_index(0, 3, 5),
                to_index(1, 4, 5),
            ])
        );
    }

    #[test]
    fn test_owned_cell_blocks_ray() {
        let mut board = open_board(5, 1);
        board.add_player(0, crate::board::PlayerKind::Human);
        board.add_player(3, crate::board::PlayerKind::Human);
        let targets = reachable_targets(&board.cells, board.grid(), Coord::new(0, 0));
        assert_eq!(targets, vec![1, 2]);
        assert!(is_reachable(&board.cells, board.grid(), Coord::new(0, 0), 2));
        assert!(!is_reachable(&board.cells, board.grid(), Coord::new(0, 0), 4));
    }

    #[test]
    fn test_visitor_break_stops_everything() {
        let board = open_board(3, 3);
        let mut seen = 0;
        let flow = cast_rays(&board.cells, board.grid(), Coord::new(1, 1), &mut |_: Coord, _: usize| {
            seen += 1;
            ControlFlow::Break(())
        });
        assert!(flow.is_break());
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_no_target_when_surrounded() {
        let mut board = open_board(3, 3);
        for pos in 0..9 {
            if pos != 4 {
                board.cells[pos].state = 0;
            }
        }
        assert!(!has_reachable_target(&board.cells, board.grid(), Coord::new(1, 1)));
    }

    #[test]
    fn test_flood_fill_ignores_ownership() {
        let mut board = open_board(4, 1);
        board.add_player(1, crate::board::PlayerKind::Human);
        let mut visited = FxHashSet::default();
        let mut seen = Vec::new();
        flood_fill(&board.cells, board.grid(), 0, &mut visited, |p| seen.push(p));
        assert_eq!(seen, vec![0, 1, 2, 3]);

        // Second call from a visited cell reports nothing
        let mut again = Vec::new();
        flood_fill(&board.cells, board.grid(), 2, &mut visited, |p| again.push(p));
        assert!(again.is_empty());
    }

    #[test]
    fn test_components_split_by_inert_column() {
        let mut board = open_board(5, 3);
        for row in 0..3 {
            board.cells[to_index(2, row, 5)].state = 0;
        }
        board.add_player(to_index(0, 0, 5), crate::board::PlayerKind::Human);

        let comps = components(&board.cells, board.grid());
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].id, 1);
        assert_eq!(comps[1].id, 2);
        assert_eq!(comps[0].player_ids, vec![0]);
        assert!(comps[1].is_isolated());
        assert_eq!(comps[0].boxed_in_player(), Some(0));
    }

    #[test]
    fn test_components_partition_live_cells() {
        let mut board = open_board(6, 6);
        for pos in [3, 8, 9, 14, 20, 21, 22, 27, 33] {
            board.cells[pos].state = 0;
        }
        let comps = components(&board.cells, board.grid());

        let mut all: Vec<usize> = comps.iter().flat_map(|c| c.cells.iter().copied()).collect();
        let total = all.len();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), total, "components overlap");

        let live: Vec<usize> = (0..36).filter(|&p| board.cells[p].is_alive()).collect();
        assert_eq!(all, live);
    }
}
