use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;

use super::suggester::MoveSuggester;
use crate::game::{Board, Column, Player};

/// Suggests uniformly at random among the columns that still have room.
#[derive(Debug, Clone)]
pub struct RandomSuggester {
    rng: StdRng,
}

impl RandomSuggester {
    pub fn new() -> Self {
        RandomSuggester {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible suggestions
    pub fn with_seed(seed: u64) -> Self {
        RandomSuggester {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomSuggester {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSuggester for RandomSuggester {
    fn suggest(&mut self, board: &Board, _player: Player) -> Option<Column> {
        let columns = board.legal_columns();
        if columns.is_empty() {
            return None;
        }
        let idx = self.rng.random_range(0..columns.len());
        Some(columns[idx])
    }

    fn name(&self) -> &str {
        "Random"
    }
}
