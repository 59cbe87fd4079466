use std::time::Duration;

use serde::Serialize;

use crate::core::{
    board::{Board, BoardSizeError},
    piece::RotationDirection,
};

use super::{
    game_clock::GameClock,
    game_field::GameField,
    game_stats::GameStats,
    piece_generator::{PieceGenerator, PieceSeed},
    snapshot::Snapshot,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

/// Player input, as discrete press and release commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Steps left once and keeps stepping while held.
    MoveLeft,
    /// Steps right once and keeps stepping while held.
    MoveRight,
    StopMoveLeft,
    StopMoveRight,
    RotateClockwise,
    RotateCounterClockwise,
    /// Steps down once and keeps stepping while held.
    SoftDropStart,
    SoftDropStop,
    /// Drops the piece as far as it goes; it locks on the next gravity step.
    HardDrop,
    TogglePause,
    /// Starts a new game. Only accepted once the game is over.
    Restart,
}

/// Session state changes reported back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionEvent {
    Paused,
    Resumed,
    GameOver { final_score: usize },
    Restarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub width: u16,
    pub height: u16,
    /// Seed of the piece generator, random if `None`.
    pub seed: Option<PieceSeed>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: Board::STANDARD_WIDTH,
            height: Board::STANDARD_HEIGHT,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ShiftDirection {
    Left,
    Right,
}

impl ShiftDirection {
    const fn dx(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }
}

/// Movement inputs currently held down.
#[derive(Debug, Clone, Copy, Default)]
struct HeldInput {
    shift: Option<ShiftDirection>,
    soft_drop: bool,
}

/// A single game from the first spawn to game over, and any restarts.
///
/// The session owns the field, the statistics and the clock. It is driven by
/// two calls, both taking the current time:
///
/// - [`Self::handle_command`] for every input as it arrives
/// - [`Self::update`] once per frame, after that frame's commands
///
/// `update` first repeats held sideways and soft-drop movement when their
/// repeat intervals have passed, then applies at most one gravity step. A
/// gravity step that cannot move the piece locks it, clears full rows, scores
/// them, and spawns the next piece; if that piece does not fit, the game is
/// over.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::{Command, GameSession, SessionConfig, SessionEvent};
///
/// let ms = Duration::from_millis;
/// let mut session = GameSession::new(SessionConfig::default(), ms(0)).unwrap();
///
/// assert_eq!(
///     session.handle_command(Command::TogglePause, ms(100)),
///     Some(SessionEvent::Paused)
/// );
/// assert_eq!(session.handle_command(Command::MoveLeft, ms(200)), None);
/// assert_eq!(
///     session.handle_command(Command::TogglePause, ms(5000)),
///     Some(SessionEvent::Resumed)
/// );
/// assert_eq!(session.play_time(ms(5100)), ms(200));
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    field: GameField,
    stats: GameStats,
    clock: GameClock,
    held: HeldInput,
    state: SessionState,
}

impl GameSession {
    pub fn new(config: SessionConfig, now: Duration) -> Result<Self, BoardSizeError> {
        let generator = config
            .seed
            .map_or_else(PieceGenerator::new, PieceGenerator::with_seed);
        let field = GameField::new(config.width, config.height, generator)?;
        Ok(Self::with_field(field, now))
    }

    pub(crate) fn with_field(field: GameField, now: Duration) -> Self {
        Self {
            field,
            stats: GameStats::new(),
            clock: GameClock::new(now),
            held: HeldInput::default(),
            state: SessionState::Playing,
        }
    }

    #[must_use]
    pub fn field(&self) -> &GameField {
        &self.field
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Returns the time spent playing, excluding pauses and time after game over.
    #[must_use]
    pub fn play_time(&self, now: Duration) -> Duration {
        self.clock.play_time(now)
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            board: self.field.board(),
            falling_piece: self.field.falling_piece().copied(),
            ghost_piece: self.field.ghost_piece(),
            next_piece: *self.field.next_piece(),
            score: self.stats.score(),
            level: self.stats.level(),
            cleared_lines: self.stats.cleared_lines(),
            state: self.state,
        }
    }

    /// Applies a player command received at `now`.
    ///
    /// While paused only [`Command::TogglePause`] is accepted, and after game
    /// over only [`Command::Restart`]. Other commands are ignored.
    pub fn handle_command(&mut self, command: Command, now: Duration) -> Option<SessionEvent> {
        match self.state {
            SessionState::Playing => self.handle_playing_command(command, now),
            SessionState::Paused => (command == Command::TogglePause).then(|| {
                self.clock.resume(now);
                self.state = SessionState::Playing;
                SessionEvent::Resumed
            }),
            SessionState::GameOver => (command == Command::Restart).then(|| {
                self.restart(now);
                SessionEvent::Restarted
            }),
        }
    }

    fn handle_playing_command(&mut self, command: Command, now: Duration) -> Option<SessionEvent> {
        match command {
            Command::MoveLeft => self.start_shift(ShiftDirection::Left, now),
            Command::MoveRight => self.start_shift(ShiftDirection::Right, now),
            Command::StopMoveLeft => self.stop_shift(ShiftDirection::Left),
            Command::StopMoveRight => self.stop_shift(ShiftDirection::Right),
            Command::RotateClockwise => {
                _ = self.field.try_rotate(RotationDirection::Clockwise);
            }
            Command::RotateCounterClockwise => {
                _ = self.field.try_rotate(RotationDirection::CounterClockwise);
            }
            Command::SoftDropStart => {
                self.held.soft_drop = true;
                _ = self.field.try_move(0, 1);
                // The repeat starts at the press even when the step is blocked.
                self.clock.reset_soft_drop(now);
            }
            Command::SoftDropStop => self.held.soft_drop = false,
            Command::HardDrop => {
                self.held = HeldInput::default();
                _ = self.field.hard_drop();
            }
            Command::TogglePause => {
                self.clock.pause(now);
                self.state = SessionState::Paused;
                return Some(SessionEvent::Paused);
            }
            Command::Restart => {}
        }
        None
    }

    fn start_shift(&mut self, direction: ShiftDirection, now: Duration) {
        if self.field.try_move(direction.dx(), 0).is_ok() {
            self.held.shift = Some(direction);
            self.clock.reset_shift(now);
        }
    }

    fn stop_shift(&mut self, direction: ShiftDirection) {
        if self.held.shift == Some(direction) {
            self.held.shift = None;
        }
    }

    /// Advances the game to `now`.
    ///
    /// Does nothing unless the game is being played.
    pub fn update(&mut self, now: Duration) -> Option<SessionEvent> {
        if !self.state.is_playing() {
            return None;
        }

        if let Some(direction) = self.held.shift
            && self.clock.is_shift_due(now)
        {
            _ = self.field.try_move(direction.dx(), 0);
            self.clock.reset_shift(now);
        }

        if self.held.soft_drop
            && self.clock.is_soft_drop_due(now)
            && self.field.try_move(0, 1).is_ok()
        {
            self.clock.reset_soft_drop(now);
        }

        if self.clock.is_fall_due(now, self.stats.fall_interval()) {
            return self.apply_gravity(now);
        }
        None
    }

    fn apply_gravity(&mut self, now: Duration) -> Option<SessionEvent> {
        self.clock.reset_fall(now);
        if self.field.try_move(0, 1).is_ok() {
            return None;
        }

        let (cleared_lines, result) = self.field.lock();
        self.stats.complete_piece_drop(cleared_lines);
        if result.is_err() {
            self.state = SessionState::GameOver;
            self.held = HeldInput::default();
            // Freezes play time.
            self.clock.pause(now);
            return Some(SessionEvent::GameOver {
                final_score: self.stats.score(),
            });
        }
        None
    }

    fn restart(&mut self, now: Duration) {
        self.field.reset();
        self.stats = GameStats::new();
        self.clock = GameClock::new(now);
        self.held = HeldInput::default();
        self.state = SessionState::Playing;
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        LockError,
        core::piece::{Piece, PieceColor, PiecePosition, Shape},
    };

    use super::*;

    const fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn seed() -> PieceSeed {
        PieceSeed::from([0x5A; 16])
    }

    fn session() -> GameSession {
        let config = SessionConfig {
            seed: Some(seed()),
            ..SessionConfig::default()
        };
        GameSession::new(config, ms(0)).unwrap()
    }

    fn session_on(board: Board, falling_piece: Piece) -> GameSession {
        let next_piece =
            Piece::spawn(Shape::O, 0, PieceColor::new(1).unwrap(), board.width()).unwrap();
        let field = GameField::with_pieces(
            board,
            falling_piece,
            next_piece,
            PieceGenerator::with_seed(seed()),
        );
        GameSession::with_field(field, ms(0))
    }

    fn piece(shape: Shape, rotation: usize, x: i32, y: i32) -> Piece {
        Piece::new(
            shape,
            rotation,
            PiecePosition::new(x, y),
            PieceColor::new(0).unwrap(),
        )
        .unwrap()
    }

    fn position(session: &GameSession) -> PiecePosition {
        session.field().falling_piece().unwrap().position()
    }

    #[test]
    fn test_new_session() {
        let session = session();
        assert!(session.state().is_playing());
        assert_eq!(session.stats().score(), 0);
        assert_eq!(session.stats().level(), 1);
        assert_eq!(position(&session), PiecePosition::spawn(10));
        assert!(session.field().board().is_empty());

        let config = SessionConfig {
            width: 2,
            ..SessionConfig::default()
        };
        assert!(GameSession::new(config, ms(0)).is_err());
    }

    #[test]
    fn test_same_seed_same_pieces() {
        let a = session();
        let b = session();
        assert_eq!(a.field().falling_piece(), b.field().falling_piece());
        assert_eq!(a.field().next_piece(), b.field().next_piece());
    }

    #[test]
    fn test_gravity_is_due_strictly_after_interval() {
        let mut session = session();
        let start = position(&session);

        assert_eq!(session.update(ms(250)), None);
        assert_eq!(position(&session), start);

        assert_eq!(session.update(ms(251)), None);
        assert_eq!(position(&session), start.offset(0, 1));

        // One gravity step per update, re-baselined at the step.
        session.update(ms(400));
        assert_eq!(position(&session), start.offset(0, 1));
        session.update(ms(502));
        assert_eq!(position(&session), start.offset(0, 2));
    }

    #[test]
    fn test_sideways_press_moves_and_repeats_while_held() {
        let mut session = session_on(Board::standard(), piece(Shape::O, 0, 4, 5));

        session.handle_command(Command::MoveLeft, ms(10));
        assert_eq!(position(&session).x(), 3);

        session.update(ms(160));
        assert_eq!(position(&session).x(), 3);
        session.update(ms(161));
        assert_eq!(position(&session).x(), 2);
        session.update(ms(312));
        assert_eq!(position(&session).x(), 1);

        session.handle_command(Command::StopMoveLeft, ms(320));
        session.update(ms(1000));
        assert_eq!(position(&session).x(), 1);
    }

    #[test]
    fn test_opposite_press_cancels_held_direction() {
        let mut session = session_on(Board::standard(), piece(Shape::O, 0, 4, 5));

        session.handle_command(Command::MoveLeft, ms(0));
        session.handle_command(Command::MoveRight, ms(10));
        assert_eq!(position(&session).x(), 4);

        // Releasing the cancelled direction keeps the other one held.
        session.handle_command(Command::StopMoveLeft, ms(20));
        session.update(ms(161));
        assert_eq!(position(&session).x(), 5);
    }

    #[test]
    fn test_sideways_movement_stops_at_wall() {
        // O against the left wall.
        let mut session = session_on(Board::standard(), piece(Shape::O, 0, -1, 5));
        session.handle_command(Command::MoveLeft, ms(0));
        assert_eq!(position(&session).x(), -1);

        session.handle_command(Command::MoveRight, ms(0));
        assert_eq!(position(&session).x(), 0);
        for millis in [151, 302, 453, 604, 755, 906, 1057, 1208] {
            session.update(ms(millis));
        }
        assert_eq!(position(&session).x(), 7);
    }

    #[test]
    fn test_soft_drop_steps_and_repeats() {
        let mut session = session_on(Board::standard(), piece(Shape::O, 0, 4, 0));

        session.handle_command(Command::SoftDropStart, ms(0));
        assert_eq!(position(&session).y(), 1);

        session.update(ms(100));
        assert_eq!(position(&session).y(), 1);
        session.update(ms(101));
        assert_eq!(position(&session).y(), 2);

        session.handle_command(Command::SoftDropStop, ms(150));
        session.update(ms(240));
        assert_eq!(position(&session).y(), 2);
    }

    #[test]
    fn test_blocked_soft_drop_press_starts_repeat() {
        let mut rows = vec![".........."; 20];
        rows[10] = ".3........";
        // O on template columns 1..3 and rows 2..4, resting on the ledge.
        let mut session = session_on(Board::from_ascii(&rows), piece(Shape::O, 0, 0, 6));

        session.handle_command(Command::SoftDropStart, ms(200));
        assert_eq!(position(&session).y(), 6);

        // Off the ledge, but the repeat is not due yet.
        session.handle_command(Command::MoveRight, ms(210));
        session.update(ms(220));
        assert_eq!(position(&session), PiecePosition::new(1, 6));
        session.update(ms(250));
        assert_eq!(position(&session).y(), 6);

        // Soft drop and gravity are both due.
        session.update(ms(301));
        assert_eq!(position(&session).y(), 8);
    }

    #[test]
    fn test_rotation_commands() {
        let mut session = session_on(Board::standard(), piece(Shape::T, 0, 4, 5));
        session.handle_command(Command::RotateClockwise, ms(0));
        assert_eq!(session.field().falling_piece().unwrap().rotation(), 1);
        session.handle_command(Command::RotateCounterClockwise, ms(0));
        session.handle_command(Command::RotateCounterClockwise, ms(0));
        assert_eq!(session.field().falling_piece().unwrap().rotation(), 3);
    }

    #[test]
    fn test_hard_drop_locks_on_next_gravity_step() {
        let mut session = session_on(Board::standard(), piece(Shape::O, 0, 4, 0));

        session.handle_command(Command::SoftDropStart, ms(0));
        session.handle_command(Command::HardDrop, ms(10));
        assert_eq!(position(&session).y(), 16);
        assert!(session.field().board().is_empty());

        // Soft drop was released by the hard drop.
        session.update(ms(200));
        assert_eq!(position(&session).y(), 16);

        session.update(ms(251));
        assert!(!session.field().board().is_empty());
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(position(&session), PiecePosition::spawn(10));
    }

    #[test]
    fn test_line_clear_scores() {
        let board = Board::from_ascii(&[
            ".....", //
            ".....", //
            ".....", //
            ".....", //
            "3....", //
            "22.22", //
        ]);
        let mut session = session_on(board, piece(Shape::I, 0, 0, -2));

        session.handle_command(Command::HardDrop, ms(10));
        assert_eq!(session.update(ms(300)), None);

        assert_eq!(session.stats().score(), 1);
        assert_eq!(session.stats().line_cleared_counter(), &[0, 1, 0, 0, 0]);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.cleared_lines, 1);
        assert_eq!(snapshot.level, 1);
        assert!(snapshot.state.is_playing());
    }

    #[test]
    fn test_pause_suspends_and_resume_rebaselines() {
        let mut session = session();
        let start = position(&session);

        assert_eq!(
            session.handle_command(Command::TogglePause, ms(100)),
            Some(SessionEvent::Paused)
        );
        assert!(session.state().is_paused());

        for command in [Command::MoveLeft, Command::HardDrop, Command::Restart] {
            assert_eq!(session.handle_command(command, ms(200)), None);
        }
        assert_eq!(session.update(ms(10_000)), None);
        assert_eq!(position(&session), start);

        assert_eq!(
            session.handle_command(Command::TogglePause, ms(20_000)),
            Some(SessionEvent::Resumed)
        );
        session.update(ms(20_250));
        assert_eq!(position(&session), start);
        session.update(ms(20_251));
        assert_eq!(position(&session), start.offset(0, 1));

        assert_eq!(session.play_time(ms(20_251)), ms(351));
    }

    #[test]
    fn test_spawn_collision_ends_game_and_restart() {
        let board = Board::from_ascii(&[
            ".1111111", //
            ".1111111", //
            "........", //
            "........", //
            "........", //
        ]);
        let mut session = session_on(board, piece(Shape::O, 0, -1, 1));

        assert_eq!(
            session.update(ms(251)),
            Some(SessionEvent::GameOver { final_score: 0 })
        );
        assert!(session.state().is_game_over());
        assert_eq!(session.field().falling_piece(), None);
        assert_eq!(session.field().clone().lock().1, Err(LockError::NoFallingPiece));

        let snapshot = session.snapshot();
        assert!(snapshot.state.is_game_over());
        assert_eq!(snapshot.falling_piece, None);
        assert_eq!(snapshot.ghost_piece, None);

        for command in [Command::TogglePause, Command::MoveLeft, Command::HardDrop] {
            assert_eq!(session.handle_command(command, ms(300)), None);
        }
        assert_eq!(session.update(ms(5000)), None);
        assert_eq!(session.play_time(ms(5000)), ms(251));

        assert_eq!(
            session.handle_command(Command::Restart, ms(6000)),
            Some(SessionEvent::Restarted)
        );
        assert!(session.state().is_playing());
        assert!(session.field().board().is_empty());
        assert_eq!(session.stats().completed_pieces(), 0);
        assert_eq!(position(&session), PiecePosition::spawn(8));
        assert_eq!(session.play_time(ms(6100)), ms(100));
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut session = session();
        assert_eq!(session.handle_command(Command::Restart, ms(10)), None);
        assert!(session.state().is_playing());
    }
}
