//! # Connect Four 3D
//!
//! Rules engine for gravity-based four-in-a-row on a 4×4×4 cube, with the
//! classic 7×6 board as a planar variant. Every game is recorded move by
//! move and can be reconstructed at any point from its log.
//!
//! ## Modules
//!
//! - [`game`]: Board, players, win detection, turn/outcome state machine
//! - [`record`]: Move recorder, board snapshots, record stores, export
//! - [`replay`]: Deterministic reconstruction and scrubbing of recorded games
//! - [`session`]: A live game wired to its recorder
//! - [`suggest`]: Move suggestion seam and a random suggester
//! - [`config`]: TOML configuration loading and validation
//! - [`error`]: Structured error types

pub mod config;
pub mod error;
pub mod game;
pub mod record;
pub mod replay;
pub mod session;
pub mod suggest;
