//! Deterministic reconstruction of recorded games.
//!
//! Nothing here touches a live game: every reconstruction replays the move
//! log onto its own board.

mod cursor;
mod reconstruct;

pub use cursor::ReplayCursor;
pub use reconstruct::{state_at_move, verify_snapshots};
