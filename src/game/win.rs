//! Line detection anchored at the most recently placed piece.
//!
//! One algorithm serves both variants; only the direction table differs.
//! Each entry stands for a vector and its negation.

use super::board::{Board, Cell, Position};

/// Pieces in a row needed to win.
pub const WIN_LENGTH: usize = 4;

pub type Direction = (isize, isize, isize);

/// All 13 line families of a cube: 3 axes, 6 face diagonals, 4 space diagonals.
pub const CUBE_DIRECTIONS: [Direction; 13] = [
    (1, 0, 0),
    (0, 1, 0),
    (0, 0, 1),
    (1, 1, 0),
    (1, -1, 0),
    (1, 0, 1),
    (1, 0, -1),
    (0, 1, 1),
    (0, 1, -1),
    (1, 1, 1),
    (1, 1, -1),
    (1, -1, 1),
    (1, -1, -1),
];

/// Horizontal, vertical and both diagonals of a single `z = 0` slice.
pub const PLANE_DIRECTIONS: [Direction; 4] = [(1, 0, 0), (0, 1, 0), (1, 1, 0), (1, -1, 0)];

/// Direction table matching the board's dimensionality
pub fn directions_for(board: &Board) -> &'static [Direction] {
    if board.size().is_planar() {
        &PLANE_DIRECTIONS
    } else {
        &CUBE_DIRECTIONS
    }
}

/// Find a line of at least [`WIN_LENGTH`] pieces through `last`.
///
/// Returns the first qualifying line in direction order, ordered from its
/// negative end to its positive end. `None` if `last` is empty, out of
/// bounds, or no line exists.
pub fn detect(board: &Board, last: Position) -> Option<Vec<Position>> {
    let cell = board.get(last)?;
    if cell == Cell::Empty {
        return None;
    }

    directions_for(board).iter().find_map(|&dir| {
        let line = line_through(board, last, dir, cell);
        (line.len() >= WIN_LENGTH).then_some(line)
    })
}

/// Contiguous run of `cell` through `origin` along `dir`, up to the first
/// different cell or the board edge on each side.
fn line_through(board: &Board, origin: Position, dir: Direction, cell: Cell) -> Vec<Position> {
    let walk = |sign: isize| {
        (1..)
            .map_while(|step| {
                origin
                    .offset(dir, sign * step)
                    .filter(|&pos| board.get(pos) == Some(cell))
            })
            .collect::<Vec<_>>()
    };

    let mut line = walk(-1);
    line.reverse();
    line.push(origin);
    line.extend(walk(1));
    line
}
