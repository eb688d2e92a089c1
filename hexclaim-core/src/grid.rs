//! Grid geometry with offset hex coordinates
//!
//! Cells are stored row-major in a linear array. Odd rows are shifted half a
//! cell to the right, so the diagonal neighbours of a cell depend on the
//! parity of its row.

use serde::{Deserialize, Serialize};

/// Column of a linear position
#[inline]
pub fn to_column(pos: usize, width: usize) -> usize {
    pos % width
}

/// Row of a linear position
#[inline]
pub fn to_row(pos: usize, width: usize) -> usize {
    pos / width
}

/// Linear position of a (column, row) pair
#[inline]
pub fn to_index(col: usize, row: usize, width: usize) -> usize {
    row * width + col
}

/// Offset coordinates. Signed so that stepping off the board is representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub col: i32,
    pub row: i32,
}

impl Coord {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Check if this coordinate lies inside a `width` x `height` grid
    pub fn is_within(&self, width: usize, height: usize) -> bool {
        self.col >= 0 && self.row >= 0 && (self.col as usize) < width && (self.row as usize) < height
    }

    /// Neighbour one step away in `direction`
    pub fn step(&self, direction: Direction) -> Coord {
        // 1 on odd rows, 0 on even rows (rem_euclid keeps off-board rows sane)
        let odd = self.row.rem_euclid(2);
        let (col, row) = match direction {
            Direction::West => (self.col - 1, self.row),
            Direction::East => (self.col + 1, self.row),
            Direction::SouthWest => (self.col - (1 - odd), self.row - 1),
            Direction::NorthEast => (self.col + odd, self.row + 1),
            Direction::SouthEast => (self.col + odd, self.row - 1),
            Direction::NorthWest => (self.col - (1 - odd), self.row + 1),
        };
        Coord::new(col, row)
    }
}

/// The six hex directions.
///
/// `DIRECTIONS` fixes the iteration order used by every traversal, which in
/// turn fixes the order in which legal targets are enumerated.
/// "North" is the direction of increasing row index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    West,
    East,
    SouthWest,
    NorthEast,
    SouthEast,
    NorthWest,
}

/// Traversal order: 0=W, 1=E, 2=SW, 3=NE, 4=SE, 5=NW
pub const DIRECTIONS: [Direction; 6] = [
    Direction::West,
    Direction::East,
    Direction::SouthWest,
    Direction::NorthEast,
    Direction::SouthEast,
    Direction::NorthWest,
];

/// Grid dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.is_within(self.width, self.height)
    }

    /// Coordinate of a linear position
    pub fn coord(&self, pos: usize) -> Coord {
        Coord::new(to_column(pos, self.width) as i32, to_row(pos, self.width) as i32)
    }

    /// Linear position of a coordinate, `None` when off the grid
    pub fn index(&self, coord: Coord) -> Option<usize> {
        if self.contains(coord) {
            Some(to_index(coord.col as usize, coord.row as usize, self.width))
        } else {
            None
        }
    }

    /// In-bounds neighbours of `coord`, in `DIRECTIONS` order
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        neighbors(coord, self.width, self.height)
    }
}

/// Up to six in-bounds neighbours of `coord`, in `DIRECTIONS` order
pub fn neighbors(coord: Coord, width: usize, height: usize) -> impl Iterator<Item = Coord> {
    DIRECTIONS
        .into_iter()
        .map(move |dir| coord.step(dir))
        .filter(move |c| c.is_within(width, height))
}
