//! Move sequences shared by tests. Yellow moves first in each.

/// Fills the classic board without a line.
#[rustfmt::skip]
pub const CLASSIC_DRAW: &[usize] = &[
    4, 3, 6, 0, 1, 4, 5, 5, 1, 1, 5, 0, 1, 6, 0, 1, 5, 5, 1, 0, 4, 6, 3, 2, 6, 6, 0, 4, 6, 5, 2,
    0, 4, 2, 4, 2, 2, 2, 3, 3, 3, 3,
];

/// Fills the cube without a line, as `(x, z)` columns.
#[rustfmt::skip]
pub const CUBE_DRAW: &[(usize, usize)] = &[
    (2, 1), (1, 2), (3, 2), (1, 3), (3, 3), (0, 2), (1, 0), (1, 2),
    (0, 2), (3, 1), (1, 0), (0, 1), (0, 2), (3, 2), (2, 1), (1, 1),
    (1, 1), (1, 1), (0, 3), (0, 3), (2, 0), (0, 3), (2, 1), (0, 1),
    (1, 3), (0, 1), (1, 2), (2, 3), (2, 2), (2, 2), (0, 1), (2, 1),
    (1, 2), (2, 2), (3, 1), (3, 3), (1, 1), (0, 2), (3, 1), (0, 0),
    (2, 3), (3, 1), (1, 3), (2, 3), (0, 0), (3, 2), (2, 3), (1, 3),
    (0, 0), (1, 0), (3, 2), (0, 3), (1, 0), (2, 2), (3, 3), (3, 3),
    (0, 0), (2, 0), (2, 0), (3, 0), (3, 0), (2, 0), (3, 0), (3, 0),
];

/// Yellow wins on the `(1, 1, 0)` diagonal from `(0, 0, 0)` to `(3, 3, 0)`
/// with the 11th move; Red fills the supports.
#[rustfmt::skip]
pub const CUBE_DIAGONAL_WIN: &[(usize, usize)] = &[
    (0, 0), (1, 0), (1, 0), (2, 0), (3, 0), (2, 0),
    (2, 0), (3, 0), (0, 1), (3, 0), (3, 0),
];
