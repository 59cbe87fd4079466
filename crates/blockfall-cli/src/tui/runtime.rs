use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::{
    event::{KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags},
    execute, terminal,
};
use ratatui::DefaultTerminal;

use super::{App, event::TuiEvent, event_loop::EventLoop};

/// Runs an [`App`] in the terminal.
#[derive(Debug)]
pub struct Runtime {
    events: EventLoop,
    started_at: Instant,
    reports_key_release: bool,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: EventLoop::new(),
            started_at: Instant::now(),
            reports_key_release: false,
        }
    }

    /// Sets the tick rate (ticks per second). `None` stops ticks.
    pub fn set_tick_rate(&mut self, rate: Option<f64>) {
        self.events
            .set_tick_interval(rate.map(|rate| Duration::from_secs_f64(1.0 / rate)));
    }

    /// Returns the monotonic time since the runtime was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Returns whether the terminal sends key release events.
    ///
    /// Most terminals only report presses (and their auto-repeat); held keys
    /// can only be tracked when releases are reported too.
    #[must_use]
    pub fn reports_key_release(&self) -> bool {
        self.reports_key_release
    }

    /// Runs the application until [`App::should_exit`] returns true.
    ///
    /// Ticks call [`App::update`], renders call [`App::draw`], and terminal
    /// events go to [`App::handle_event`].
    pub fn run<A>(mut self, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        ratatui::run(|term| {
            self.reports_key_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
            if self.reports_key_release {
                execute!(
                    io::stdout(),
                    PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
                )?;
            }

            app.init(&mut self);
            let result = self.run_loop(term, app);

            if self.reports_key_release {
                execute!(io::stdout(), PopKeyboardEnhancementFlags)?;
            }
            result
        })
    }

    fn run_loop<A>(&mut self, terminal: &mut DefaultTerminal, app: &mut A) -> io::Result<()>
    where
        A: App,
    {
        while !app.should_exit() {
            match self.events.next()? {
                TuiEvent::Tick => app.update(self),
                TuiEvent::Render => {
                    terminal.draw(|f| app.draw(f))?;
                }
                TuiEvent::Crossterm(event) => app.handle_event(self, event),
            }
        }
        Ok(())
    }
}
