use blockfall_engine::Command;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::view::widgets::KeyBinding;

/// Key bindings as shown on the game screen.
pub const KEY_BINDINGS: &[KeyBinding<'static>] = &[
    (&["←", "A"], "Left"),
    (&["→", "D"], "Right"),
    (&["↑", "W"], "Rotate"),
    (&["Q"], "Rotate back"),
    (&["↓", "S"], "Soft drop"),
    (&["Space"], "Hard drop"),
    (&["P"], "Pause"),
    (&["R"], "Restart"),
    (&["Esc"], "Quit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    MoveLeft,
    MoveRight,
    RotateClockwise,
    RotateCounterClockwise,
    SoftDrop,
    HardDrop,
    Pause,
    Restart,
}

impl Action {
    fn from_key(key: &KeyEvent) -> Option<Self> {
        let action = match key.code {
            KeyCode::Left => Self::MoveLeft,
            KeyCode::Right => Self::MoveRight,
            KeyCode::Up => Self::RotateClockwise,
            KeyCode::Down => Self::SoftDrop,
            KeyCode::Char(' ') => Self::HardDrop,
            KeyCode::Char(c) => match c.to_ascii_lowercase() {
                'a' => Self::MoveLeft,
                'd' => Self::MoveRight,
                'w' => Self::RotateClockwise,
                'q' => Self::RotateCounterClockwise,
                's' => Self::SoftDrop,
                'p' => Self::Pause,
                'r' => Self::Restart,
                _ => return None,
            },
            _ => return None,
        };
        Some(action)
    }
}

/// What a key event asks the game screen to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Quit,
    Commands(Vec<Command>),
}

/// Translates a key event into game commands.
///
/// When the terminal reports key releases, holding a movement key starts the
/// session's own repeat and releasing it stops the repeat; the terminal's
/// auto-repeat events are ignored. Otherwise every press is a single step
/// (start immediately followed by stop) and the terminal's auto-repeat
/// provides the repetition.
pub fn translate(key: &KeyEvent, reports_key_release: bool) -> Option<KeyInput> {
    if is_quit_key(key) {
        return (key.kind == KeyEventKind::Press).then_some(KeyInput::Quit);
    }
    let action = Action::from_key(key)?;
    let commands = match key.kind {
        KeyEventKind::Press => press_commands(action, reports_key_release),
        KeyEventKind::Repeat if reports_key_release => return None,
        KeyEventKind::Repeat => press_commands(action, false),
        KeyEventKind::Release => release_commands(action)?,
    };
    Some(KeyInput::Commands(commands))
}

fn is_quit_key(key: &KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn press_commands(action: Action, reports_key_release: bool) -> Vec<Command> {
    let held = |start, stop| {
        if reports_key_release {
            vec![start]
        } else {
            vec![start, stop]
        }
    };
    match action {
        Action::MoveLeft => held(Command::MoveLeft, Command::StopMoveLeft),
        Action::MoveRight => held(Command::MoveRight, Command::StopMoveRight),
        Action::SoftDrop => held(Command::SoftDropStart, Command::SoftDropStop),
        Action::RotateClockwise => vec![Command::RotateClockwise],
        Action::RotateCounterClockwise => vec![Command::RotateCounterClockwise],
        Action::HardDrop => vec![Command::HardDrop],
        Action::Pause => vec![Command::TogglePause],
        Action::Restart => vec![Command::Restart],
    }
}

fn release_commands(action: Action) -> Option<Vec<Command>> {
    let command = match action {
        Action::MoveLeft => Command::StopMoveLeft,
        Action::MoveRight => Command::StopMoveRight,
        Action::SoftDrop => Command::SoftDropStop,
        _ => return None,
    };
    Some(vec![command])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    fn press(code: KeyCode) -> KeyEvent {
        key(code, KeyEventKind::Press)
    }

    fn commands(list: &[Command]) -> Option<KeyInput> {
        Some(KeyInput::Commands(list.to_vec()))
    }

    #[test]
    fn test_press_without_release_reporting_is_single_step() {
        assert_eq!(
            translate(&press(KeyCode::Left), false),
            commands(&[Command::MoveLeft, Command::StopMoveLeft])
        );
        assert_eq!(
            translate(&press(KeyCode::Char('d')), false),
            commands(&[Command::MoveRight, Command::StopMoveRight])
        );
        assert_eq!(
            translate(&press(KeyCode::Char('S')), false),
            commands(&[Command::SoftDropStart, Command::SoftDropStop])
        );
    }

    #[test]
    fn test_press_and_release_with_release_reporting() {
        assert_eq!(
            translate(&press(KeyCode::Char('a')), true),
            commands(&[Command::MoveLeft])
        );
        assert_eq!(
            translate(&key(KeyCode::Char('a'), KeyEventKind::Repeat), true),
            None
        );
        assert_eq!(
            translate(&key(KeyCode::Char('a'), KeyEventKind::Release), true),
            commands(&[Command::StopMoveLeft])
        );
        assert_eq!(
            translate(&key(KeyCode::Down, KeyEventKind::Release), true),
            commands(&[Command::SoftDropStop])
        );
        assert_eq!(
            translate(&key(KeyCode::Up, KeyEventKind::Release), true),
            None
        );
    }

    #[test]
    fn test_single_commands() {
        for (code, command) in [
            (KeyCode::Up, Command::RotateClockwise),
            (KeyCode::Char('w'), Command::RotateClockwise),
            (KeyCode::Char('q'), Command::RotateCounterClockwise),
            (KeyCode::Char(' '), Command::HardDrop),
            (KeyCode::Char('p'), Command::TogglePause),
            (KeyCode::Char('r'), Command::Restart),
        ] {
            assert_eq!(translate(&press(code), false), commands(&[command]));
            assert_eq!(translate(&press(code), true), commands(&[command]));
        }
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(translate(&press(KeyCode::Esc), false), Some(KeyInput::Quit));
        assert_eq!(
            translate(&key(KeyCode::Esc, KeyEventKind::Release), true),
            None
        );
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate(&ctrl_c, true), Some(KeyInput::Quit));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(translate(&press(KeyCode::Char('x')), false), None);
        assert_eq!(translate(&press(KeyCode::Enter), true), None);
        assert_eq!(translate(&press(KeyCode::Char('c')), true), None);
    }
}
