use std::time::Duration;

use blockfall_engine::{GameSession, SessionEvent};
use crossterm::event::Event;
use ratatui::Frame;

use crate::{
    command::play::{
        GameSetup,
        input::{self, KEY_BINDINGS, KeyInput},
    },
    tui::{Runtime, Screen, ScreenTransition},
    view::widgets::SessionDisplay,
};

/// Plays one session, restarting it on request until the player quits.
#[derive(Debug)]
pub struct GameScreen {
    session: GameSession,
    setup: GameSetup,
    /// Runtime time of the latest event or tick, for drawing the play time.
    now: Duration,
}

impl GameScreen {
    pub(in crate::command::play) fn new(setup: GameSetup, now: Duration) -> Self {
        let session = GameSession::new(setup.config, now)
            .expect("board size is checked before the terminal starts");
        Self {
            session,
            setup,
            now,
        }
    }

    fn handle_session_event(&self, event: Option<SessionEvent>, now: Duration) {
        if let Some(SessionEvent::GameOver { .. }) = event {
            self.setup.report.borrow_mut().record(&self.session, now);
        }
    }
}

impl Screen for GameScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(Some(f64::from(self.setup.fps)));
    }

    fn on_close(&mut self, runtime: &mut Runtime) {
        // Finished games were recorded when they ended.
        if !self.session.state().is_game_over() {
            self.setup
                .report
                .borrow_mut()
                .record(&self.session, runtime.now());
        }
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_event() else {
            return ScreenTransition::Stay;
        };
        let now = runtime.now();
        self.now = now;
        match input::translate(&key, runtime.reports_key_release()) {
            None => ScreenTransition::Stay,
            Some(KeyInput::Quit) => ScreenTransition::Exit,
            Some(KeyInput::Commands(commands)) => {
                for command in commands {
                    let event = self.session.handle_command(command, now);
                    self.handle_session_event(event, now);
                }
                ScreenTransition::Stay
            }
        }
    }

    fn update(&mut self, runtime: &mut Runtime) {
        let now = runtime.now();
        self.now = now;
        let event = self.session.update(now);
        self.handle_session_event(event, now);
    }

    fn draw(&self, frame: &mut Frame) {
        let display = SessionDisplay::new(
            self.session.snapshot(),
            self.session.stats(),
            self.session.play_time(self.now),
        )
        .key_bindings(KEY_BINDINGS);
        frame.render_widget(display, frame.area());
    }
}
