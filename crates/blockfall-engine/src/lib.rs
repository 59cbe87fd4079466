//! Simulation core of a falling-block puzzle.
//!
//! - [`core`] - pieces, the board, and placement validation
//! - [`engine`] - the falling piece controller, timing, scoring and the
//!   session state machine
//!
//! The engine never reads a clock, polls input, or draws anything. Callers
//! feed it [`Command`]s and the current time, and read back a [`Snapshot`].
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use blockfall_engine::{Command, GameSession, SessionConfig};
//!
//! let mut session = GameSession::new(SessionConfig::default(), Duration::ZERO).unwrap();
//!
//! session.handle_command(Command::MoveLeft, Duration::from_millis(10));
//! session.handle_command(Command::HardDrop, Duration::from_millis(20));
//! session.update(Duration::from_millis(400));
//!
//! let snapshot = session.snapshot();
//! assert!(snapshot.state.is_playing());
//! assert!(!snapshot.board.is_empty());
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Why a transform of the falling piece was rejected.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum MoveError {
    #[display("piece colliding at the requested position")]
    Collision,
    #[display("no piece is falling")]
    NoFallingPiece,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    derive_more::Display,
    derive_more::Error,
    derive_more::IsVariant,
)]
pub enum LockError {
    #[display("no piece is falling")]
    NoFallingPiece,
    #[display("new piece colliding at its spawn position")]
    SpawnCollision,
}
