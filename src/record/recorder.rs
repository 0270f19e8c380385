use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::error::RecordError;
use crate::game::{Board, BoardSize, Player, Position};
use crate::record::model::{GameRecord, MoveRecord};
use crate::record::snapshot;
use crate::record::store::GameStore;

/// Appends moves to the active [`GameRecord`] and hands it to the store
/// once the game ends. One recorder per session; nothing is shared.
#[derive(Debug)]
pub struct MoveRecorder<S: GameStore> {
    store: S,
    board_size: BoardSize,
    active: Option<GameRecord>,
    /// The active record is sealed but its save failed
    unsaved: bool,
}

impl<S: GameStore> MoveRecorder<S> {
    /// A recorder with no game started yet
    pub fn new(store: S, board_size: BoardSize) -> Self {
        MoveRecorder {
            store,
            board_size,
            active: None,
            unsaved: false,
        }
    }

    /// Begin a fresh record opened by `starting_player`.
    ///
    /// A sealed record whose save failed is saved first; if that fails again
    /// the error is returned and the sealed record stays active. An open,
    /// unsealed record is dropped without being persisted.
    pub fn start_new_game(&mut self, starting_player: Player) -> Result<&GameRecord, RecordError> {
        self.persist_pending()?;
        Ok(self.open_record(starting_player))
    }

    pub(crate) fn open_record(&mut self, starting_player: Player) -> &GameRecord {
        if let Some(old) = self.active.as_ref().filter(|r| !r.is_sealed()) {
            debug!(id = old.id(), moves = old.total_moves(), "abandoning unsealed game");
        }
        let record = GameRecord::new(self.board_size, starting_player, Utc::now());
        info!(id = record.id(), size = %self.board_size, %starting_player, "recording new game");
        self.unsaved = false;
        self.active.insert(record)
    }

    /// The record currently being written (or just sealed)
    pub fn active(&self) -> Option<&GameRecord> {
        self.active.as_ref()
    }

    pub fn is_sealed(&self) -> bool {
        self.active.as_ref().is_some_and(GameRecord::is_sealed)
    }

    /// True while a sealed record is waiting for a successful save
    pub fn has_unsaved(&self) -> bool {
        self.unsaved
    }

    /// Retry saving a sealed record whose store write failed.
    /// `Ok(false)` when nothing is waiting.
    pub fn persist_pending(&mut self) -> Result<bool, RecordError> {
        if !self.unsaved {
            return Ok(false);
        }
        let record = self.active.as_ref().ok_or(RecordError::NoActiveGame)?;
        self.store.save(record).inspect_err(|err| {
            error!(id = record.id(), %err, "retrying the save of a sealed game failed");
        })?;
        self.unsaved = false;
        info!(id = record.id(), "sealed game saved on retry");
        Ok(true)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append the move that just put `player`'s piece at `position`, with a
    /// snapshot of `board` as it stands after the move.
    pub fn on_move_applied(
        &mut self,
        player: Player,
        position: Position,
        board: &Board,
    ) -> Result<&MoveRecord, RecordError> {
        let record = self.active.as_mut().ok_or(RecordError::NoActiveGame)?;
        if record.is_sealed() {
            error!(id = record.id(), "move recorded after the game was sealed");
            return Err(RecordError::AlreadySealed(record.id().to_string()));
        }
        let expected = record
            .last_move()
            .map_or(record.starting_player(), |last| last.player.other());
        if player != expected {
            warn!(id = record.id(), %player, %expected, "move recorded out of turn");
            return Err(RecordError::OutOfTurn {
                move_number: record.total_moves() + 1,
                expected,
                actual: player,
            });
        }

        let id = record.id().to_string();
        let appended = record.push_move(player, position, snapshot::encode(board));
        debug!(
            %id,
            move_number = appended.move_number,
            %player,
            %position,
            "move recorded"
        );
        Ok(appended)
    }

    /// Seal the active record with `winner` (`None` for a draw) and persist
    /// it. Sealing twice, or sealing an empty record, is refused and leaves
    /// the record as it was.
    ///
    /// If the store refuses the sealed record, the error is returned and the
    /// record is kept as unsaved; [`MoveRecorder::persist_pending`] retries.
    pub fn on_game_ended(&mut self, winner: Option<Player>) -> Result<&GameRecord, RecordError> {
        let record = self.active.as_mut().ok_or(RecordError::NoActiveGame)?;
        if record.is_sealed() {
            error!(id = record.id(), "game sealed twice");
            return Err(RecordError::AlreadySealed(record.id().to_string()));
        }
        if record.total_moves() == 0 {
            error!(id = record.id(), "game sealed with no moves");
            return Err(RecordError::NoMoves(record.id().to_string()));
        }

        record.seal(winner, Utc::now());
        info!(
            id = record.id(),
            winner = winner.map(Player::name).unwrap_or("draw"),
            moves = record.total_moves(),
            "game sealed"
        );
        if let Err(err) = self.store.save(record) {
            error!(id = record.id(), %err, "sealed game could not be saved");
            self.unsaved = true;
            return Err(err.into());
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::game::{Column, Variant};
    use crate::record::store::MemoryStore;

    /// Refuses the first `failures` saves, then behaves like a [`MemoryStore`].
    #[derive(Debug, Default)]
    struct FlakyStore {
        failures: usize,
        inner: MemoryStore,
    }

    impl GameStore for FlakyStore {
        fn save(&mut self, record: &GameRecord) -> Result<(), StoreError> {
            if self.failures > 0 {
                self.failures -= 1;
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.save(record)
        }

        fn list(&self) -> Result<Vec<GameRecord>, StoreError> {
            self.inner.list()
        }

        fn get(&self, id: &str) -> Result<Option<GameRecord>, StoreError> {
            self.inner.get(id)
        }

        fn clear(&mut self) -> Result<(), StoreError> {
            self.inner.clear()
        }
    }

    fn recorder() -> MoveRecorder<MemoryStore> {
        recorder_with(MemoryStore::new())
    }

    fn recorder_with<S: GameStore>(store: S) -> MoveRecorder<S> {
        let mut recorder = MoveRecorder::new(store, Variant::Cube.size());
        recorder.start_new_game(Player::Yellow).unwrap();
        recorder
    }

    fn drop_and_record<S: GameStore>(
        recorder: &mut MoveRecorder<S>,
        board: &mut Board,
        x: usize,
        z: usize,
        player: Player,
    ) {
        let column = Column::new(x, z);
        let y = board.place(column, player).unwrap();
        recorder
            .on_move_applied(player, column.at_depth(y), board)
            .unwrap();
    }

    #[test]
    fn test_moves_are_numbered_and_snapshotted() {
        let mut recorder = recorder();
        let mut board = Board::new(Variant::Cube);
        drop_and_record(&mut recorder, &mut board, 0, 0, Player::Yellow);
        drop_and_record(&mut recorder, &mut board, 0, 0, Player::Red);

        let record = recorder.active().unwrap();
        assert_eq!(record.total_moves(), 2);
        let second = &record.moves()[1];
        assert_eq!(second.move_number, 2);
        assert_eq!(second.position, Position::new(0, 1, 0));
        assert_eq!(second.board_after, snapshot::encode(&board));
    }

    #[test]
    fn test_seal_persists_once() {
        let mut recorder = recorder();
        let mut board = Board::new(Variant::Cube);
        drop_and_record(&mut recorder, &mut board, 1, 1, Player::Yellow);

        let sealed = recorder.on_game_ended(Some(Player::Yellow)).unwrap().clone();
        assert!(sealed.is_sealed());
        assert_eq!(recorder.store().len(), 1);
        assert_eq!(recorder.store().get(sealed.id()).unwrap(), Some(sealed.clone()));

        let err = recorder.on_game_ended(None).unwrap_err();
        assert!(matches!(err, RecordError::AlreadySealed(_)));
        assert_eq!(recorder.store().len(), 1);
        assert_eq!(recorder.active(), Some(&sealed));
    }

    #[test]
    fn test_seal_without_moves_is_refused() {
        let mut recorder = recorder();
        let err = recorder.on_game_ended(None).unwrap_err();
        assert!(matches!(err, RecordError::NoMoves(_)));
        assert!(!recorder.is_sealed());
        assert!(recorder.store().is_empty());
    }

    #[test]
    fn test_no_active_game() {
        let mut recorder = MoveRecorder::new(MemoryStore::new(), Variant::Cube.size());
        let board = Board::new(Variant::Cube);
        assert!(matches!(
            recorder.on_move_applied(Player::Yellow, Position::new(0, 0, 0), &board),
            Err(RecordError::NoActiveGame)
        ));
        assert!(matches!(
            recorder.on_game_ended(None),
            Err(RecordError::NoActiveGame)
        ));
    }

    #[test]
    fn test_move_after_seal_is_refused() {
        let mut recorder = recorder();
        let mut board = Board::new(Variant::Cube);
        drop_and_record(&mut recorder, &mut board, 2, 2, Player::Yellow);
        recorder.on_game_ended(Some(Player::Yellow)).unwrap();

        let y = board.place(Column::new(3, 3), Player::Red).unwrap();
        let err = recorder
            .on_move_applied(Player::Red, Position::new(3, y, 3), &board)
            .unwrap_err();
        assert!(matches!(err, RecordError::AlreadySealed(_)));
        assert_eq!(recorder.active().unwrap().total_moves(), 1);
    }

    #[test]
    fn test_out_of_turn_is_refused() {
        let mut recorder = recorder();
        let mut board = Board::new(Variant::Cube);
        drop_and_record(&mut recorder, &mut board, 0, 0, Player::Yellow);

        let y = board.place(Column::new(1, 0), Player::Yellow).unwrap();
        let err = recorder
            .on_move_applied(Player::Yellow, Position::new(1, y, 0), &board)
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::OutOfTurn {
                move_number: 2,
                expected: Player::Red,
                actual: Player::Yellow
            }
        ));
    }

    #[test]
    fn test_start_new_game_drops_unsealed_record() {
        let mut recorder = recorder();
        let mut board = Board::new(Variant::Cube);
        drop_and_record(&mut recorder, &mut board, 0, 0, Player::Yellow);
        let first_id = recorder.active().unwrap().id().to_string();

        let second_id = recorder.start_new_game(Player::Red).unwrap().id().to_string();
        assert_ne!(first_id, second_id);
        assert_eq!(recorder.active().unwrap().total_moves(), 0);
        assert_eq!(recorder.active().unwrap().starting_player(), Player::Red);
        assert!(recorder.store().is_empty());
    }

    #[test]
    fn test_first_move_must_come_from_starting_player() {
        let mut recorder = MoveRecorder::new(MemoryStore::new(), Variant::Cube.size());
        recorder.start_new_game(Player::Red).unwrap();
        let mut board = Board::new(Variant::Cube);
        let y = board.place(Column::new(0, 0), Player::Yellow).unwrap();

        let err = recorder
            .on_move_applied(Player::Yellow, Position::new(0, y, 0), &board)
            .unwrap_err();
        assert!(matches!(
            err,
            RecordError::OutOfTurn {
                move_number: 1,
                expected: Player::Red,
                actual: Player::Yellow
            }
        ));
        assert_eq!(recorder.active().unwrap().total_moves(), 0);
    }

    #[test]
    fn test_failed_save_is_kept_for_retry() {
        let mut recorder = recorder_with(FlakyStore {
            failures: 1,
            ..FlakyStore::default()
        });
        let mut board = Board::new(Variant::Cube);
        drop_and_record(&mut recorder, &mut board, 0, 0, Player::Yellow);

        let err = recorder.on_game_ended(Some(Player::Yellow)).unwrap_err();
        assert!(matches!(err, RecordError::Store(StoreError::Io(_))));
        assert!(recorder.is_sealed());
        assert!(recorder.has_unsaved());
        assert!(recorder.store().inner.is_empty());

        assert!(recorder.persist_pending().unwrap());
        assert!(!recorder.has_unsaved());
        let id = recorder.active().unwrap().id().to_string();
        assert!(recorder.store().get(&id).unwrap().is_some());
        assert!(!recorder.persist_pending().unwrap());
    }

    #[test]
    fn test_new_game_saves_pending_record_first() {
        let mut recorder = recorder_with(FlakyStore {
            failures: 2,
            ..FlakyStore::default()
        });
        let mut board = Board::new(Variant::Cube);
        drop_and_record(&mut recorder, &mut board, 3, 3, Player::Yellow);
        recorder.on_game_ended(None).unwrap_err();
        let sealed_id = recorder.active().unwrap().id().to_string();

        // Second failure: the sealed record must not be replaced.
        assert!(recorder.start_new_game(Player::Yellow).is_err());
        assert_eq!(recorder.active().unwrap().id(), sealed_id);
        assert!(recorder.has_unsaved());

        let fresh_id = recorder.start_new_game(Player::Yellow).unwrap().id().to_string();
        assert_ne!(fresh_id, sealed_id);
        assert!(recorder.store().get(&sealed_id).unwrap().is_some());
    }
}
