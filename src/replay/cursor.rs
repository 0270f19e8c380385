use crate::error::ReplayError;
use crate::game::GameState;
use crate::record::GameRecord;

use super::state_at_move;

/// Scrubs back and forth through a recorded game.
///
/// Positions run from `-1` (empty board) to the index of the last move.
/// Every step rebuilds the state from the record, so the cursor never holds
/// anything [`state_at_move`] would not return.
#[derive(Debug, Clone)]
pub struct ReplayCursor<'a> {
    record: &'a GameRecord,
    index: isize,
    state: GameState,
}

impl<'a> ReplayCursor<'a> {
    /// Cursor parked on the empty board
    pub fn new(record: &'a GameRecord) -> Result<Self, ReplayError> {
        let state = state_at_move(record, -1)?;
        Ok(ReplayCursor {
            record,
            index: -1,
            state,
        })
    }

    pub fn record(&self) -> &'a GameRecord {
        self.record
    }

    pub fn index(&self) -> isize {
        self.index
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn last_index(&self) -> isize {
        self.record.total_moves() as isize - 1
    }

    pub fn at_start(&self) -> bool {
        self.index == -1
    }

    pub fn at_end(&self) -> bool {
        self.index == self.last_index()
    }

    /// Jump to `index`. On error the cursor stays where it was.
    pub fn seek(&mut self, index: isize) -> Result<&GameState, ReplayError> {
        self.state = state_at_move(self.record, index)?;
        self.index = index;
        Ok(&self.state)
    }

    pub fn reset(&mut self) -> Result<&GameState, ReplayError> {
        self.seek(-1)
    }

    /// Advance one move; `Ok(false)` when already on the last move.
    pub fn step_forward(&mut self) -> Result<bool, ReplayError> {
        if self.at_end() {
            return Ok(false);
        }
        self.seek(self.index + 1)?;
        Ok(true)
    }

    /// Go back one move; `Ok(false)` when already on the empty board.
    pub fn step_back(&mut self) -> Result<bool, ReplayError> {
        if self.at_start() {
            return Ok(false);
        }
        self.seek(self.index - 1)?;
        Ok(true)
    }
}
