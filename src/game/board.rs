use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::Player;

/// Edge length of the cube variant.
pub const CUBE_SIZE: usize = 4;
/// Columns in the classic variant.
pub const CLASSIC_COLS: usize = 7;
/// Rows in the classic variant.
pub const CLASSIC_ROWS: usize = 6;

/// Mark used for an empty cell in snapshots and board dumps.
pub const EMPTY_MARK: char = '\u{b7}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Yellow,
    Red,
}

impl Cell {
    /// The player occupying this cell, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Yellow => Some(Player::Yellow),
            Cell::Red => Some(Player::Red),
        }
    }

    pub fn mark(self) -> char {
        match self.player() {
            Some(player) => player.mark(),
            None => EMPTY_MARK,
        }
    }

    pub fn from_mark(mark: char) -> Option<Cell> {
        match mark {
            'Y' => Some(Cell::Yellow),
            'R' => Some(Cell::Red),
            EMPTY_MARK => Some(Cell::Empty),
            _ => None,
        }
    }
}

/// A cell coordinate. `y` is the gravity axis; the classic variant keeps `z = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Position { x, y, z }
    }

    /// The gravity column this position belongs to
    pub fn column(self) -> Column {
        Column { x: self.x, z: self.z }
    }

    /// Step `steps` times along `(dx, dy, dz)`. Returns `None` when any axis
    /// would go negative; the upper bound is the board's concern.
    pub fn offset(self, (dx, dy, dz): (isize, isize, isize), steps: isize) -> Option<Position> {
        let x = self.x.checked_add_signed(dx * steps)?;
        let y = self.y.checked_add_signed(dy * steps)?;
        let z = self.z.checked_add_signed(dz * steps)?;
        Some(Position { x, y, z })
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// A gravity column, addressed by its two non-gravity coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub x: usize,
    pub z: usize,
}

impl Column {
    pub const fn new(x: usize, z: usize) -> Self {
        Column { x, z }
    }

    /// Column of the classic 2D board
    pub const fn classic(col: usize) -> Self {
        Column { x: col, z: 0 }
    }

    pub fn at_depth(self, y: usize) -> Position {
        Position::new(self.x, y, self.z)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Board extent along each axis. Serialized as `{ "x", "y", "z" }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSize {
    pub x: usize,
    pub y: usize,
    pub z: usize,
}

impl BoardSize {
    /// Largest extent accepted along any axis.
    pub const MAX_AXIS: usize = 16;

    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        BoardSize { x, y, z }
    }

    /// Every axis is non-empty and no larger than [`BoardSize::MAX_AXIS`]
    pub fn is_valid(self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|&len| len > 0 && len <= Self::MAX_AXIS)
    }

    /// True for boards with a single depth slice (the classic variant)
    pub fn is_planar(self) -> bool {
        self.z == 1
    }

    pub fn cell_count(self) -> usize {
        self.x * self.y * self.z
    }

    pub fn contains(self, pos: Position) -> bool {
        pos.x < self.x && pos.y < self.y && pos.z < self.z
    }

    pub fn contains_column(self, column: Column) -> bool {
        column.x < self.x && column.z < self.z
    }

    /// Arena offset of an in-bounds position
    pub(crate) fn index(self, pos: Position) -> usize {
        (pos.y * self.z + pos.z) * self.x + pos.x
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.x, self.y, self.z)
    }
}

/// The two supported board shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// 4x4x4 cube, 13 line directions
    #[default]
    Cube,
    /// 7 columns by 6 rows, 4 line directions
    Classic,
}

impl Variant {
    pub fn size(self) -> BoardSize {
        match self {
            Variant::Cube => BoardSize::new(CUBE_SIZE, CUBE_SIZE, CUBE_SIZE),
            Variant::Classic => BoardSize::new(CLASSIC_COLS, CLASSIC_ROWS, 1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PlaceError {
    #[error("column {0} is outside the board")]
    InvalidCoordinates(Column),

    #[error("column {0} is full")]
    ColumnFull(Column),
}

/// Fixed-size grid stored as one flat arena indexed by `(x, y, z)`.
///
/// Writes only happen through [`Board::place`], so every column is filled
/// contiguously from `y = 0` upward.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board for the given variant
    pub fn new(variant: Variant) -> Self {
        Self::with_size(variant.size())
    }

    /// Create an empty board of arbitrary (valid) size
    pub fn with_size(size: BoardSize) -> Self {
        debug_assert!(size.is_valid(), "invalid board size {size}");
        Board {
            size,
            cells: vec![Cell::Empty; size.cell_count()],
        }
    }

    /// Build a board from raw cells laid out in arena order, rejecting
    /// floating pieces.
    pub(crate) fn from_cells(size: BoardSize, cells: Vec<Cell>) -> Option<Self> {
        if !size.is_valid() || cells.len() != size.cell_count() {
            return None;
        }
        let board = Board { size, cells };
        board.is_gravity_consistent().then_some(board)
    }

    pub fn size(&self) -> BoardSize {
        self.size
    }

    fn index(&self, pos: Position) -> usize {
        self.size.index(pos)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.size.contains(pos)
    }

    /// Get the cell at a position, `None` if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.contains(pos).then(|| self.cells[self.index(pos)])
    }

    /// Depth a piece dropped in `column` would come to rest at.
    /// `None` if the column is full or outside the board.
    pub fn drop_height(&self, column: Column) -> Option<usize> {
        if !self.size.contains_column(column) {
            return None;
        }
        (0..self.size.y).find(|&y| self.cells[self.index(column.at_depth(y))] == Cell::Empty)
    }

    /// Check if a column is full. Columns outside the board count as full.
    pub fn is_column_full(&self, column: Column) -> bool {
        self.drop_height(column).is_none()
    }

    /// Drop a piece in a column, returns the depth where it landed
    pub fn place(&mut self, column: Column, player: Player) -> Result<usize, PlaceError> {
        if !self.size.contains_column(column) {
            return Err(PlaceError::InvalidCoordinates(column));
        }
        let y = self
            .drop_height(column)
            .ok_or(PlaceError::ColumnFull(column))?;
        let idx = self.index(column.at_depth(y));
        self.cells[idx] = player.to_cell();
        Ok(y)
    }

    /// All gravity columns, x-major
    pub fn columns(&self) -> impl Iterator<Item = Column> + '_ {
        (0..self.size.x).flat_map(move |x| (0..self.size.z).map(move |z| Column::new(x, z)))
    }

    /// Columns that still accept a piece
    pub fn legal_columns(&self) -> Vec<Column> {
        self.columns()
            .filter(|&column| !self.is_column_full(column))
            .collect()
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.columns().all(|column| self.is_column_full(column))
    }

    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Every column is a contiguous run of pieces starting at `y = 0`
    pub fn is_gravity_consistent(&self) -> bool {
        self.columns().all(|column| {
            let mut seen_empty = false;
            (0..self.size.y).all(|y| {
                let cell = self.cells[self.index(column.at_depth(y))];
                if cell == Cell::Empty {
                    seen_empty = true;
                    true
                } else {
                    !seen_empty
                }
            })
        })
    }
}

impl fmt::Display for Board {
    /// Layer by layer, top of the gravity axis first.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..self.size.y).rev() {
            if !self.size.is_planar() {
                writeln!(f, "Layer {}:", y)?;
            }
            for z in 0..self.size.z {
                let row: Vec<String> = (0..self.size.x)
                    .map(|x| self.cells[self.index(Position::new(x, y, z))].mark().to_string())
                    .collect();
                writeln!(f, "  {}", row.join(" "))?;
            }
        }
        Ok(())
    }
}
