use std::fmt;

use crossterm::event::Event;
use ratatui::Frame;

use super::{App, Runtime};

/// One screen of the application, such as the title or the game.
///
/// # Lifecycle
///
/// 1. [`on_active`] when the screen is shown, at startup or after replacing
///    the previous screen
/// 2. events, ticks and draws while it is shown
/// 3. [`on_close`] when it is replaced or the application exits
///
/// Screens configure the [`Runtime`] (tick rate) in [`on_active`].
///
/// [`on_active`]: Self::on_active
/// [`on_close`]: Self::on_close
pub trait Screen: fmt::Debug {
    fn on_active(&mut self, runtime: &mut Runtime);

    fn on_close(&mut self, runtime: &mut Runtime);

    /// Handles a terminal event and returns what to show next.
    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition;

    /// Called on every tick.
    fn update(&mut self, runtime: &mut Runtime);

    fn draw(&self, frame: &mut Frame);
}

#[derive(Debug)]
pub enum ScreenTransition {
    Stay,
    /// Closes the current screen and shows the given one.
    Replace(Box<dyn Screen>),
    /// Closes the current screen and exits the application.
    Exit,
}

/// Shows one screen at a time and switches between them.
#[derive(Debug)]
pub struct ScreenSwitcher {
    current: Option<Box<dyn Screen>>,
}

impl ScreenSwitcher {
    #[must_use]
    pub fn new(initial: Box<dyn Screen>) -> Self {
        Self {
            current: Some(initial),
        }
    }

    fn apply_transition(&mut self, runtime: &mut Runtime, transition: ScreenTransition) {
        match transition {
            ScreenTransition::Stay => {}
            ScreenTransition::Replace(mut new_screen) => {
                if let Some(mut old_screen) = self.current.take() {
                    old_screen.on_close(runtime);
                }
                new_screen.on_active(runtime);
                self.current = Some(new_screen);
            }
            ScreenTransition::Exit => {
                if let Some(mut screen) = self.current.take() {
                    screen.on_close(runtime);
                }
            }
        }
    }
}

impl App for ScreenSwitcher {
    fn init(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = &mut self.current {
            screen.on_active(runtime);
        }
    }

    fn should_exit(&self) -> bool {
        self.current.is_none()
    }

    fn handle_event(&mut self, runtime: &mut Runtime, event: Event) {
        if let Some(screen) = &mut self.current {
            let transition = screen.handle_event(runtime, &event);
            self.apply_transition(runtime, transition);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        if let Some(screen) = &self.current {
            screen.draw(frame);
        }
    }

    fn update(&mut self, runtime: &mut Runtime) {
        if let Some(screen) = &mut self.current {
            screen.update(runtime);
        }
    }
}
