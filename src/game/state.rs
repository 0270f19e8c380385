use serde::{Deserialize, Serialize};

use super::board::{Board, Column, PlaceError, Position, Variant};
use super::player::Player;
use super::win;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    InProgress,
    Won(Player),
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {0} is outside the board")]
    InvalidCoordinates(Column),

    #[error("column {0} is full")]
    ColumnFull(Column),

    #[error("the game is already over")]
    GameOver,
}

impl From<PlaceError> for MoveError {
    fn from(err: PlaceError) -> Self {
        match err {
            PlaceError::InvalidCoordinates(column) => MoveError::InvalidCoordinates(column),
            PlaceError::ColumnFull(column) => MoveError::ColumnFull(column),
        }
    }
}

/// What a successful move did to the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    pub player: Player,
    /// Resting position after gravity
    pub position: Position,
    /// Outcome after the move
    pub outcome: Outcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    starting_player: Player,
    current_player: Player,
    outcome: Outcome,
    winning_line: Vec<Position>,
}

impl GameState {
    /// Fresh game on an empty board
    pub fn new(variant: Variant, starting_player: Player) -> Self {
        Self::from_parts(
            Board::new(variant),
            starting_player,
            starting_player,
            Outcome::InProgress,
            Vec::new(),
        )
    }

    /// Fresh cube game with Yellow to move
    pub fn initial() -> Self {
        Self::new(Variant::Cube, Player::FIRST)
    }

    /// Assemble a state from already-derived parts; used by replay.
    pub(crate) fn from_parts(
        board: Board,
        starting_player: Player,
        current_player: Player,
        outcome: Outcome,
        winning_line: Vec<Position>,
    ) -> Self {
        GameState {
            board,
            starting_player,
            current_player,
            outcome,
            winning_line,
        }
    }

    /// Get current player
    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn starting_player(&self) -> Player {
        self.starting_player
    }

    /// Get reference to board
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn winner(&self) -> Option<Player> {
        match self.outcome {
            Outcome::Won(player) => Some(player),
            _ => None,
        }
    }

    pub fn is_draw(&self) -> bool {
        self.outcome == Outcome::Draw
    }

    /// Winning run through the last move, empty unless the game was won
    pub fn winning_line(&self) -> &[Position] {
        &self.winning_line
    }

    /// Check if game is over
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::InProgress
    }

    /// Get list of legal columns (not full)
    pub fn legal_columns(&self) -> Vec<Column> {
        if self.is_terminal() {
            return Vec::new();
        }
        self.board.legal_columns()
    }

    /// Whether `column` would be accepted right now
    pub fn is_valid_move(&self, column: Column) -> bool {
        !self.is_terminal() && !self.board.is_column_full(column)
    }

    /// Apply a move in place.
    ///
    /// Placement happens before detection and detection before the turn
    /// passes, so both the win and draw checks see the mover's piece. A
    /// rejected move leaves the state untouched.
    pub fn make_move(&mut self, column: Column) -> Result<AppliedMove, MoveError> {
        if self.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let player = self.current_player;
        let y = self.board.place(column, player)?;
        let position = column.at_depth(y);

        if let Some(line) = win::detect(&self.board, position) {
            self.outcome = Outcome::Won(player);
            self.winning_line = line;
        } else if self.board.is_full() {
            self.outcome = Outcome::Draw;
        } else {
            self.current_player = player.other();
        }

        Ok(AppliedMove {
            player,
            position,
            outcome: self.outcome,
        })
    }

    /// Discard the board and outcome, keeping variant and starting player
    pub fn reset(&mut self) {
        self.board = Board::with_size(self.board.size());
        self.current_player = self.starting_player;
        self.outcome = Outcome::InProgress;
        self.winning_line.clear();
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}
