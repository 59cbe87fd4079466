use std::{fmt, time::Duration};

use blockfall_engine::GameSession;

use crate::view::widgets::format_play_time;

/// Results of the games played in one run, printed after the terminal is restored.
#[derive(Debug, Default)]
pub(super) struct PlayReport {
    games: Vec<GameReport>,
}

impl PlayReport {
    pub(super) fn games(&self) -> &[GameReport] {
        &self.games
    }

    /// Records the current state of `session` as one finished or abandoned game.
    pub(super) fn record(&mut self, session: &GameSession, now: Duration) {
        let stats = session.stats();
        self.games.push(GameReport {
            score: stats.score(),
            level: stats.level(),
            cleared_lines: stats.cleared_lines(),
            completed_pieces: stats.completed_pieces(),
            play_time: session.play_time(now),
            game_over: session.state().is_game_over(),
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct GameReport {
    score: usize,
    level: usize,
    cleared_lines: usize,
    completed_pieces: usize,
    play_time: Duration,
    game_over: bool,
}

impl fmt::Display for GameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score {}, level {}, lines {}, pieces {}, time {}",
            self.score,
            self.level,
            self.cleared_lines,
            self.completed_pieces,
            format_play_time(self.play_time),
        )?;
        if !self.game_over {
            f.write_str(" (quit)")?;
        }
        Ok(())
    }
}
