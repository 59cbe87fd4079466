//! Game engine logic and state management.
//!
//! This module drives the [`core`](crate::core) data structures through a
//! timed game:
//!
//! - [`GameField`] - board, falling piece and next piece
//! - [`GameClock`] - gravity and key-repeat timers, pause accounting
//! - [`GameStats`] - score, level and fall speed
//! - [`GameSession`] - the playing/paused/game-over state machine
//! - [`PieceGenerator`] - random piece source, optionally seeded
//! - [`Snapshot`] - read-only view of a session for rendering
//!
//! # Game Flow
//!
//! 1. Create a [`GameSession`] at some time origin
//! 2. Forward player input as [`Command`]s
//! 3. Call [`GameSession::update`] every frame with the current time
//! 4. When gravity cannot move the piece any further, it locks, full rows
//!    clear, and the next piece spawns
//! 5. The game ends when a new piece cannot spawn
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{GameField, MoveError, PieceGenerator};
//!
//! let mut field = GameField::new(10, 20, PieceGenerator::new()).unwrap();
//!
//! // The falling piece cannot leave the board.
//! while field.try_move(-1, 0).is_ok() {}
//! assert_eq!(field.try_move(-1, 0), Err(MoveError::Collision));
//!
//! field.hard_drop().unwrap();
//! let (lines_cleared, result) = field.lock();
//! assert_eq!(lines_cleared, 0);
//! assert!(result.is_ok());
//! ```

pub use self::{
    game_clock::*, game_field::*, game_session::*, game_stats::*, piece_generator::*, snapshot::*,
};

mod game_clock;
mod game_field;
mod game_session;
mod game_stats;
mod piece_generator;
mod snapshot;
