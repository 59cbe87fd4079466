use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{
    block_display::*, board_display::*, key_binding_display::*, piece_display::*,
    session_display::*, session_stats_display::*,
};

mod block_display;
mod board_display;
mod key_binding_display;
mod piece_display;
mod session_display;
mod session_stats_display;

mod color {
    use ratatui::style::Color;

    pub const BLUE: Color = Color::Rgb(0, 0, 255);
    pub const LIGHT_BLUE: Color = Color::Rgb(20, 20, 175);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const LIGHT_GREEN: Color = Color::Rgb(20, 175, 20);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const LIGHT_RED: Color = Color::Rgb(175, 20, 20);
    pub const YELLOW: Color = Color::Rgb(155, 155, 0);
    pub const LIGHT_YELLOW: Color = Color::Rgb(175, 175, 20);

    pub const GRAY: Color = Color::Rgb(185, 185, 185);
    pub const DARK_GRAY: Color = Color::Rgb(60, 60, 60);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use blockfall_engine::{PieceColor, SessionState};
    use ratatui::style::{Color, Style};

    use super::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const EMPTY: Style = fg_bg(color::BLACK, color::BLACK);
    pub const EMPTY_DOT: Style = fg_bg(color::DARK_GRAY, color::BLACK);
    pub const GHOST: Style = fg_bg(color::GRAY, color::BLACK);
    pub const TITLE: Style = fg_bg(color::GRAY, color::BLACK);
    pub const PAUSED: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const GAME_OVER: Style = fg_bg(color::WHITE, color::RED);

    /// Piece colors: the inner square in the second shade, the frame in the first.
    const PIECES: [Style; PieceColor::COUNT as usize] = [
        fg_bg(color::LIGHT_BLUE, color::BLUE),
        fg_bg(color::LIGHT_GREEN, color::GREEN),
        fg_bg(color::LIGHT_RED, color::RED),
        fg_bg(color::LIGHT_YELLOW, color::YELLOW),
    ];

    pub const fn piece(piece_color: PieceColor) -> Style {
        PIECES[piece_color.index() as usize]
    }

    pub const fn border(state: SessionState) -> Color {
        match state {
            SessionState::Playing => color::WHITE,
            SessionState::Paused => color::YELLOW,
            SessionState::GameOver => color::RED,
        }
    }
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
