use crossterm::event::Event;
use ratatui::{
    Frame,
    layout::Constraint,
    style::Modifier,
    text::{Line, Text},
};

use super::GameScreen;
use crate::{
    command::play::{
        GameSetup,
        input::{self, KeyInput},
    },
    tui::{Runtime, Screen, ScreenTransition},
    view::widgets::style,
};

/// Waits for a key before starting the game.
#[derive(Debug)]
pub struct TitleScreen {
    setup: GameSetup,
}

impl TitleScreen {
    pub(in crate::command::play) fn new(setup: GameSetup) -> Self {
        Self { setup }
    }
}

impl Screen for TitleScreen {
    fn on_active(&mut self, runtime: &mut Runtime) {
        runtime.set_tick_rate(None);
    }

    fn on_close(&mut self, _runtime: &mut Runtime) {}

    fn handle_event(&mut self, runtime: &mut Runtime, event: &Event) -> ScreenTransition {
        let Some(key) = event.as_key_press_event() else {
            return ScreenTransition::Stay;
        };
        if input::translate(&key, false) == Some(KeyInput::Quit) {
            return ScreenTransition::Exit;
        }
        let game = GameScreen::new(self.setup.clone(), runtime.now());
        ScreenTransition::Replace(Box::new(game))
    }

    fn update(&mut self, _runtime: &mut Runtime) {}

    fn draw(&self, frame: &mut Frame) {
        let text = Text::from(vec![
            Line::styled("BLOCKFALL", style::TITLE.add_modifier(Modifier::BOLD)),
            Line::default(),
            Line::styled("Press a key to play.", style::DEFAULT),
            Line::styled("Esc to quit.", style::EMPTY_DOT),
        ])
        .centered();
        let area = frame.area().centered_vertically(Constraint::Length(4));
        frame.render_widget(text, area);
    }
}
