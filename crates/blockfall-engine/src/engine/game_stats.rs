use std::time::Duration;

/// Rows cleared per level.
const LINES_PER_LEVEL: usize = 10;

const BASE_FALL_INTERVAL: Duration = Duration::from_millis(270);
const FALL_INTERVAL_STEP: Duration = Duration::from_millis(20);

/// Shortest time between two gravity steps, whatever the level.
pub const MIN_FALL_INTERVAL: Duration = Duration::from_millis(10);

/// Score, level and fall speed of a game.
///
/// Every cleared row is worth one point, so the score is also the total
/// number of cleared rows. The level starts at 1 and goes up every 10
/// points; each level makes gravity 20 ms faster, down to
/// [`MIN_FALL_INTERVAL`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// assert_eq!(stats.level(), 1);
/// assert_eq!(stats.fall_interval(), Duration::from_millis(250));
///
/// stats.complete_piece_drop(4);
/// stats.complete_piece_drop(3);
/// stats.complete_piece_drop(3);
///
/// assert_eq!(stats.score(), 10);
/// assert_eq!(stats.level(), 2);
/// assert_eq!(stats.fall_interval(), Duration::from_millis(230));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    line_cleared_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            line_cleared_counter: [0; 5],
        }
    }

    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    /// Returns the total number of cleared rows, which equals the score.
    #[must_use]
    pub const fn cleared_lines(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn level(&self) -> usize {
        self.score / LINES_PER_LEVEL + 1
    }

    /// Returns the time between gravity steps at the current level.
    #[must_use]
    pub fn fall_interval(&self) -> Duration {
        fall_interval(self.level())
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    /// Returns how many locks cleared 0, 1, 2, 3 and 4 rows.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; 5] {
        &self.line_cleared_counter
    }

    /// Records a locked piece that cleared `cleared_lines` rows.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.score += cleared_lines;
        if cleared_lines < self.line_cleared_counter.len() {
            self.line_cleared_counter[cleared_lines] += 1;
        }
    }
}

/// Returns the time between gravity steps at `level`.
#[must_use]
pub fn fall_interval(level: usize) -> Duration {
    let steps = u32::try_from(level).unwrap_or(u32::MAX);
    BASE_FALL_INTERVAL
        .saturating_sub(FALL_INTERVAL_STEP.saturating_mul(steps))
        .max(MIN_FALL_INTERVAL)
}
