use std::path::PathBuf;

use crate::game::{BoardSize, MoveError, Outcome, Player, Position};

/// Contract violations of the move recorder, plus failures handing a sealed
/// record to its store.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("game {0} is already sealed")]
    AlreadySealed(String),

    #[error("game {0} cannot be sealed before any move is recorded")]
    NoMoves(String),

    #[error("no game is being recorded")]
    NoActiveGame,

    #[error("move {move_number} expected {expected} to play, got {actual}")]
    OutOfTurn {
        move_number: usize,
        expected: Player,
        actual: Player,
    },

    #[error("failed to persist sealed game: {0}")]
    Store(#[from] StoreError),
}

/// Failures of a live session: either the move was refused, or it was
/// applied but could not be recorded.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("move rejected: {0}")]
    Move(#[from] MoveError),

    #[error("recording failed: {0}")]
    Record(#[from] RecordError),
}

/// Errors from persisting or loading game records.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("refusing to store unsealed game {0}")]
    Unsealed(String),

    #[error("game {0} is already stored")]
    Duplicate(String),

    #[error("game id {0:?} cannot be used as a file name")]
    InvalidId(String),

    #[error("failed to read game record {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse game record {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from decoding a board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("expected {expected} layers, found {found}")]
    LayerCount { expected: usize, found: usize },

    #[error("layer {layer}: expected {expected} rows, found {found}")]
    RowCount {
        layer: usize,
        expected: usize,
        found: usize,
    },

    #[error("layer {layer}, row {row}: expected {expected} cells, found {found}")]
    RowWidth {
        layer: usize,
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown cell mark {0:?}")]
    UnknownMark(char),

    #[error("snapshot has a piece with an empty cell beneath it")]
    FloatingPiece,

    #[error("unsupported board size {0}")]
    UnsupportedSize(BoardSize),
}

/// Errors from reconstructing a recorded game.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    #[error("move index {index} outside -1..={last}")]
    IndexOutOfRange { index: isize, last: isize },

    #[error("unsupported board size {0}")]
    UnsupportedSize(BoardSize),

    #[error("move {move_number}: recorded at {recorded} but replays to {replayed:?}")]
    InconsistentMove {
        move_number: usize,
        recorded: Position,
        replayed: Option<Position>,
    },

    #[error("move {move_number}: stored snapshot does not match the replayed board")]
    SnapshotMismatch { move_number: usize },

    #[error("move at position {position} in the log is numbered {found}")]
    MoveNumber { position: usize, found: usize },

    #[error("move {move_number} expected {expected} to play, got {actual}")]
    OutOfTurn {
        move_number: usize,
        expected: Player,
        actual: Player,
    },

    #[error("move {move_number} was played after the game had ended")]
    MoveAfterGameOver { move_number: usize },

    #[error("recorded as {recorded:?} but the final move replays to {replayed:?}")]
    OutcomeMismatch { recorded: Outcome, replayed: Outcome },

    #[error("recorded winner has no line through the final move {0}")]
    MissingWinningLine(Position),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
