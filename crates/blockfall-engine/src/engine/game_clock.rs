use std::time::Duration;

/// Time between repeated soft-drop steps while the soft-drop input is held.
pub const SOFT_DROP_INTERVAL: Duration = Duration::from_millis(100);

/// Time between repeated sideways steps while a move input is held.
pub const SHIFT_INTERVAL: Duration = Duration::from_millis(150);

/// Timers of a running game.
///
/// Times are durations since an arbitrary origin chosen by the caller, so the
/// clock never reads the system time and behaves the same in tests and in a
/// real frame loop. A timer is due once strictly more than its interval has
/// passed since it was last reset.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameClock;
///
/// let ms = Duration::from_millis;
/// let mut clock = GameClock::new(ms(0));
/// assert!(!clock.is_fall_due(ms(250), ms(250)));
/// assert!(clock.is_fall_due(ms(251), ms(250)));
///
/// clock.pause(ms(300));
/// clock.resume(ms(1300));
/// assert!(!clock.is_fall_due(ms(1400), ms(250)));
/// assert_eq!(clock.play_time(ms(1400)), ms(400));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    started_at: Duration,
    last_fall: Duration,
    last_soft_drop: Duration,
    last_shift: Duration,
    paused_at: Option<Duration>,
    paused_total: Duration,
}

impl GameClock {
    /// Starts a clock with every timer reset at `now`.
    #[must_use]
    pub fn new(now: Duration) -> Self {
        Self {
            started_at: now,
            last_fall: now,
            last_soft_drop: now,
            last_shift: now,
            paused_at: None,
            paused_total: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn is_fall_due(&self, now: Duration, fall_interval: Duration) -> bool {
        now.saturating_sub(self.last_fall) > fall_interval
    }

    pub fn reset_fall(&mut self, now: Duration) {
        self.last_fall = now;
    }

    #[must_use]
    pub fn is_soft_drop_due(&self, now: Duration) -> bool {
        now.saturating_sub(self.last_soft_drop) > SOFT_DROP_INTERVAL
    }

    pub fn reset_soft_drop(&mut self, now: Duration) {
        self.last_soft_drop = now;
    }

    #[must_use]
    pub fn is_shift_due(&self, now: Duration) -> bool {
        now.saturating_sub(self.last_shift) > SHIFT_INTERVAL
    }

    pub fn reset_shift(&mut self, now: Duration) {
        self.last_shift = now;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    /// Stops counting play time. Pausing a paused clock keeps the first
    /// pause time.
    pub fn pause(&mut self, now: Duration) {
        self.paused_at.get_or_insert(now);
    }

    /// Starts counting play time again and resets every timer at `now`, so
    /// that no step fires just because time passed while paused.
    pub fn resume(&mut self, now: Duration) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total += now.saturating_sub(paused_at);
        }
        self.last_fall = now;
        self.last_soft_drop = now;
        self.last_shift = now;
    }

    /// Returns the time spent playing, excluding pauses.
    #[must_use]
    pub fn play_time(&self, now: Duration) -> Duration {
        let end = self.paused_at.unwrap_or(now);
        end.saturating_sub(self.started_at)
            .saturating_sub(self.paused_total)
    }
}
