//! Core game logic: gravity board shared by the cube and classic variants,
//! line detection, and the turn/outcome state machine.

mod board;
mod player;
mod state;
pub mod win;

#[cfg(test)]
pub(crate) mod fixtures;

pub use board::{
    Board, BoardSize, Cell, Column, PlaceError, Position, Variant, CLASSIC_COLS, CLASSIC_ROWS,
    CUBE_SIZE, EMPTY_MARK,
};
pub use player::Player;
pub use state::{AppliedMove, GameState, MoveError, Outcome};
