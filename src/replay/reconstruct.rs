use crate::error::ReplayError;
use crate::game::{win, Board, GameState, Outcome, Position};
use crate::record::{snapshot, GameRecord, MoveRecord};

/// Rebuild the game as it stood after move `index` (0-based, `-1` for the
/// empty starting board).
///
/// Moves are replayed onto a fresh board owned by this call, so the result
/// depends only on `(record, index)`. Every replayed move is checked against
/// the log: numbering, turn order, resting position, and that no earlier
/// move already ended the game. The winning line is recomputed only for the
/// last move of a record sealed with a winner; every other index reports
/// `InProgress` with no line, and the last move of a sealed draw reports
/// `Draw` once the board is confirmed full.
pub fn state_at_move(record: &GameRecord, index: isize) -> Result<GameState, ReplayError> {
    let moves = record.moves();
    let last = moves.len() as isize - 1;
    if index < -1 || index > last {
        return Err(ReplayError::IndexOutOfRange { index, last });
    }

    let mut board = new_board(record)?;
    let applied = &moves[..(index + 1) as usize];
    for (i, mv) in applied.iter().enumerate() {
        replay_move(&mut board, record, i, mv)?;
    }

    let starting_player = record.starting_player();
    let Some(latest) = applied.last() else {
        return Ok(GameState::from_parts(
            board,
            starting_player,
            starting_player,
            Outcome::InProgress,
            Vec::new(),
        ));
    };

    let is_final = index == last && record.is_sealed();
    let (outcome, winning_line) = match (is_final, record.winner()) {
        (true, Some(winner)) => {
            let line = win::detect(&board, latest.position)
                .filter(|_| latest.player == winner)
                .ok_or(ReplayError::MissingWinningLine(latest.position))?;
            (Outcome::Won(winner), line)
        }
        (true, None) => {
            let replayed = if win::detect(&board, latest.position).is_some() {
                Outcome::Won(latest.player)
            } else if board.is_full() {
                Outcome::Draw
            } else {
                Outcome::InProgress
            };
            if replayed != Outcome::Draw {
                return Err(ReplayError::OutcomeMismatch {
                    recorded: Outcome::Draw,
                    replayed,
                });
            }
            (Outcome::Draw, Vec::new())
        }
        (false, _) => (Outcome::InProgress, Vec::new()),
    };

    let current_player = if is_final {
        latest.player
    } else {
        latest.player.other()
    };

    Ok(GameState::from_parts(
        board,
        starting_player,
        current_player,
        outcome,
        winning_line,
    ))
}

/// Replay every move and check it against the snapshot stored with it.
pub fn verify_snapshots(record: &GameRecord) -> Result<(), ReplayError> {
    let mut board = new_board(record)?;
    for (i, mv) in record.moves().iter().enumerate() {
        replay_move(&mut board, record, i, mv)?;
        if snapshot::encode(&board) != mv.board_after {
            return Err(ReplayError::SnapshotMismatch {
                move_number: mv.move_number,
            });
        }
    }
    Ok(())
}

fn new_board(record: &GameRecord) -> Result<Board, ReplayError> {
    let size = record.board_size();
    if !size.is_valid() {
        return Err(ReplayError::UnsupportedSize(size));
    }
    Ok(Board::with_size(size))
}

/// Drop the `i`-th recorded piece and insist the log agrees with the rules:
/// the move is numbered `i + 1`, comes from the player whose turn it is,
/// lands where the record says, and is not followed by further moves if it
/// ended the game.
fn replay_move(
    board: &mut Board,
    record: &GameRecord,
    i: usize,
    mv: &MoveRecord,
) -> Result<(), ReplayError> {
    let move_number = i + 1;
    if mv.move_number != move_number {
        return Err(ReplayError::MoveNumber {
            position: move_number,
            found: mv.move_number,
        });
    }
    let expected = if i % 2 == 0 {
        record.starting_player()
    } else {
        record.starting_player().other()
    };
    if mv.player != expected {
        return Err(ReplayError::OutOfTurn {
            move_number,
            expected,
            actual: mv.player,
        });
    }

    let column = mv.position.column();
    let inconsistent = |replayed: Option<Position>| ReplayError::InconsistentMove {
        move_number,
        recorded: mv.position,
        replayed,
    };
    let y = board
        .place(column, mv.player)
        .map_err(|_| inconsistent(None))?;
    if y != mv.position.y {
        return Err(inconsistent(Some(column.at_depth(y))));
    }

    let game_over = board.is_full() || win::detect(board, mv.position).is_some();
    if game_over && move_number < record.total_moves() {
        return Err(ReplayError::MoveAfterGameOver {
            move_number: move_number + 1,
        });
    }
    Ok(())
}
