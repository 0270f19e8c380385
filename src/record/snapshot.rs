//! Compact text encoding of a whole board.
//!
//! One line per gravity layer, highest `y` first. Within a line there is one
//! group per `z` (ascending) separated by single spaces, and each group holds
//! one mark per `x` (ascending): `Y`, `R`, or `·` for empty.
//!
//! ```text
//! ···· ···· ···· ····
//! ···· ···· ···· ····
//! ···· ···· ···· ····
//! Y··· ···· R··· ····
//! ```

use crate::error::SnapshotError;
use crate::game::{Board, BoardSize, Cell, Position};

/// Encode every cell of `board`. Depends only on cell contents, never on
/// the order the pieces arrived in.
pub fn encode(board: &Board) -> String {
    let size = board.size();
    let mark = |x, y, z| {
        board
            .get(Position::new(x, y, z))
            .unwrap_or(Cell::Empty)
            .mark()
    };
    (0..size.y)
        .rev()
        .map(|y| {
            (0..size.z)
                .map(|z| (0..size.x).map(|x| mark(x, y, z)).collect::<String>())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rebuild a board of `size` from its snapshot.
pub fn decode(text: &str, size: BoardSize) -> Result<Board, SnapshotError> {
    if !size.is_valid() {
        return Err(SnapshotError::UnsupportedSize(size));
    }

    let layers: Vec<&str> = text.split('\n').collect();
    if layers.len() != size.y {
        return Err(SnapshotError::LayerCount {
            expected: size.y,
            found: layers.len(),
        });
    }

    let mut cells = vec![Cell::Empty; size.cell_count()];
    for (layer, line) in layers.iter().enumerate() {
        let y = size.y - 1 - layer;
        let rows: Vec<&str> = line.split(' ').collect();
        if rows.len() != size.z {
            return Err(SnapshotError::RowCount {
                layer,
                expected: size.z,
                found: rows.len(),
            });
        }

        for (z, row) in rows.iter().enumerate() {
            let marks: Vec<char> = row.chars().collect();
            if marks.len() != size.x {
                return Err(SnapshotError::RowWidth {
                    layer,
                    row: z,
                    expected: size.x,
                    found: marks.len(),
                });
            }
            for (x, &mark) in marks.iter().enumerate() {
                let cell = Cell::from_mark(mark).ok_or(SnapshotError::UnknownMark(mark))?;
                cells[size.index(Position::new(x, y, z))] = cell;
            }
        }
    }

    Board::from_cells(size, cells).ok_or(SnapshotError::FloatingPiece)
}
