use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::game::{BoardSize, Outcome, Player, Position};

/// One applied move. Never changed after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// 1-based, gapless
    pub move_number: usize,
    pub player: Player,
    /// Resting position after gravity
    pub position: Position,
    pub timestamp: DateTime<Utc>,
    /// Snapshot of the whole board right after the move
    pub board_after: String,
}

/// A complete (or in-progress) game as an ordered move log.
///
/// Created empty at game start, appended to by the recorder, and sealed
/// exactly once with an end time and winner (`None` meaning draw).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    id: String,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    winner: Option<Player>,
    /// Who opened; records written before this field existed default to Yellow
    #[serde(default)]
    starting_player: Player,
    moves: Vec<MoveRecord>,
    board_size: BoardSize,
}

impl GameRecord {
    pub(crate) fn new(
        board_size: BoardSize,
        starting_player: Player,
        started_at: DateTime<Utc>,
    ) -> Self {
        GameRecord {
            id: Uuid::new_v4().to_string(),
            started_at,
            ended_at: None,
            winner: None,
            starting_player,
            moves: Vec::new(),
            board_size,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Winner of a sealed game; `None` for draws and unsealed games
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn starting_player(&self) -> Player {
        self.starting_player
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.moves.last()
    }

    pub fn total_moves(&self) -> usize {
        self.moves.len()
    }

    pub fn board_size(&self) -> BoardSize {
        self.board_size
    }

    pub fn is_sealed(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Final outcome, `None` while the record is still open
    pub fn outcome(&self) -> Option<Outcome> {
        if !self.is_sealed() {
            return None;
        }
        Some(match self.winner {
            Some(player) => Outcome::Won(player),
            None => Outcome::Draw,
        })
    }

    pub(crate) fn push_move(
        &mut self,
        player: Player,
        position: Position,
        board_after: String,
    ) -> &MoveRecord {
        let move_number = self.moves.len() + 1;
        self.moves.push(MoveRecord {
            move_number,
            player,
            position,
            timestamp: Utc::now(),
            board_after,
        });
        &self.moves[move_number - 1]
    }

    pub(crate) fn seal(&mut self, winner: Option<Player>, ended_at: DateTime<Utc>) {
        debug_assert!(!self.is_sealed(), "record {} sealed twice", self.id);
        self.ended_at = Some(ended_at);
        self.winner = winner;
    }
}
