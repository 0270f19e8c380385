//! A live game wired to its recorder.
//!
//! Each move goes through the state machine first; only an accepted move
//! reaches the recorder, and the record is sealed and stored as soon as the
//! game reaches a terminal outcome.

use tracing::{debug, info, instrument, warn};

use crate::error::SessionError;
use crate::game::{AppliedMove, Column, GameState, Player, Variant};
use crate::record::{GameRecord, GameStore, MoveRecorder};
use crate::suggest::MoveSuggester;

/// One game in progress plus the record being written for it.
#[derive(Debug)]
pub struct Session<S: GameStore> {
    state: GameState,
    recorder: MoveRecorder<S>,
}

impl<S: GameStore> Session<S> {
    /// Start a session with an empty board and a fresh record.
    pub fn new(variant: Variant, starting_player: Player, store: S) -> Self {
        let mut recorder = MoveRecorder::new(store, variant.size());
        recorder.open_record(starting_player);
        Session {
            state: GameState::new(variant, starting_player),
            recorder,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Record of the current game
    pub fn record(&self) -> Option<&GameRecord> {
        self.recorder.active()
    }

    pub fn recorder(&self) -> &MoveRecorder<S> {
        &self.recorder
    }

    pub fn store(&self) -> &S {
        self.recorder.store()
    }

    /// Play `column` for the current player.
    ///
    /// A rejected move changes nothing. An accepted move is always applied
    /// to the game even if recording it then fails.
    #[instrument(level = "debug", skip(self), fields(player = %self.state.current_player()))]
    pub fn make_move(&mut self, column: Column) -> Result<AppliedMove, SessionError> {
        let applied = self.state.make_move(column).inspect_err(|err| {
            warn!(%column, %err, "move rejected");
        })?;

        self.recorder
            .on_move_applied(applied.player, applied.position, self.state.board())?;
        debug!(position = %applied.position, outcome = ?applied.outcome, "move applied");

        if self.state.is_terminal() {
            let record = self.recorder.on_game_ended(self.state.winner())?;
            info!(
                id = record.id(),
                outcome = ?applied.outcome,
                moves = record.total_moves(),
                "game over"
            );
        }
        Ok(applied)
    }

    /// Ask `suggester` for a column and play it like any other move.
    /// `Ok(None)` when the suggester has nothing to offer.
    pub fn play_suggested<M: MoveSuggester + ?Sized>(
        &mut self,
        suggester: &mut M,
    ) -> Result<Option<AppliedMove>, SessionError> {
        let player = self.state.current_player();
        let Some(column) = suggester.suggest(self.state.board(), player) else {
            debug!(suggester = suggester.name(), "no suggestion");
            return Ok(None);
        };
        debug!(suggester = suggester.name(), %column, "suggested move");
        self.make_move(column).map(Some)
    }

    /// Retry saving a finished game whose save failed. `Ok(false)` when
    /// nothing is waiting.
    pub fn persist_pending(&mut self) -> Result<bool, SessionError> {
        Ok(self.recorder.persist_pending()?)
    }

    /// Clear the board and begin a new record. An unfinished game is
    /// abandoned without being stored. A finished game that still needs
    /// saving is saved first; if that fails nothing is reset.
    #[instrument(skip(self))]
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let starting_player = self.state.starting_player();
        let id = self.recorder.start_new_game(starting_player)?.id().to_string();
        self.state.reset();
        info!(%id, %starting_player, "session reset");
        Ok(())
    }
}
