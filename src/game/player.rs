use serde::{Deserialize, Serialize};

use super::board::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Yellow,
    Red,
}

impl Player {
    /// The player who moves first unless configured otherwise
    pub const FIRST: Player = Player::Yellow;

    /// Get the other player
    pub fn other(self) -> Player {
        match self {
            Player::Yellow => Player::Red,
            Player::Red => Player::Yellow,
        }
    }

    /// Convert player to cell type
    pub fn to_cell(self) -> Cell {
        match self {
            Player::Yellow => Cell::Yellow,
            Player::Red => Cell::Red,
        }
    }

    /// Get player name for display
    pub fn name(self) -> &'static str {
        match self {
            Player::Yellow => "Yellow",
            Player::Red => "Red",
        }
    }

    /// Single-character mark used in board snapshots
    pub fn mark(self) -> char {
        match self {
            Player::Yellow => 'Y',
            Player::Red => 'R',
        }
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::FIRST
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
