//! Move recording, snapshots, persistence and export of finished games.

pub mod export;
mod model;
mod recorder;
pub mod snapshot;
mod store;

pub use model::{GameRecord, MoveRecord};
pub use recorder::MoveRecorder;
pub use store::{GameStore, JsonDirStore, MemoryStore};
