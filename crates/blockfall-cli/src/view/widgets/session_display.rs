use std::time::Duration;

use blockfall_engine::{GameStats, SessionState, Snapshot};
use ratatui::{
    layout::{Constraint, Flex, Layout},
    prelude::{Buffer, Rect},
    text::{Line, Text},
    widgets::{Block, Clear, Padding, Widget},
};

use super::{
    BoardDisplay, KeyBinding, KeyBindingDisplay, PieceDisplay, SessionStatsDisplay, style,
};

/// The whole game screen: stats, board, next piece and key help.
///
/// Drawn from one frame's [`Snapshot`]; the [`GameStats`] only supply the
/// piece count and clear histogram of the stats panel.
#[derive(Debug)]
pub struct SessionDisplay<'a> {
    snapshot: Snapshot<'a>,
    stats: &'a GameStats,
    play_time: Duration,
    key_bindings: &'a [KeyBinding<'a>],
    horizontal_padding: u16,
    vertical_padding: u16,
}

impl<'a> SessionDisplay<'a> {
    pub fn new(snapshot: Snapshot<'a>, stats: &'a GameStats, play_time: Duration) -> Self {
        Self {
            snapshot,
            stats,
            play_time,
            key_bindings: &[],
            horizontal_padding: 1,
            vertical_padding: 0,
        }
    }

    pub fn key_bindings(self, key_bindings: &'a [KeyBinding<'a>]) -> Self {
        Self {
            key_bindings,
            ..self
        }
    }
}

impl Widget for SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &SessionDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let snapshot = &self.snapshot;
        let state = snapshot.state;
        let block_padding = Padding::symmetric(self.horizontal_padding, self.vertical_padding);
        let border_style = style::border(state);
        let panel = |title| {
            Block::bordered()
                .title(Line::from(title).centered())
                .padding(block_padding)
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let game_board = BoardDisplay::new(snapshot.board)
            .falling_piece(snapshot.falling_piece)
            .ghost(snapshot.ghost_piece)
            .block(
                Block::bordered()
                    .border_style(border_style)
                    .style(style::DEFAULT),
            );
        let next_panel = PieceDisplay::new()
            .piece(snapshot.next_piece)
            .block(panel("NEXT"));
        let session_stats =
            SessionStatsDisplay::new(snapshot, self.stats, self.play_time).block(panel("STATS"));
        let key_panel = KeyBindingDisplay::new(self.key_bindings).block(panel("KEYS"));

        let [left_column, center_column, right_column] = Layout::horizontal([
            Constraint::Length(session_stats.width()),
            Constraint::Length(game_board.width()),
            Constraint::Length(u16::max(next_panel.width(), key_panel.width())),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(area);

        let [stats_area] =
            Layout::vertical([Constraint::Length(session_stats.height())]).areas(left_column);
        let [board_area] =
            Layout::vertical([Constraint::Length(game_board.height())]).areas(center_column);
        let [next_area, key_area] = Layout::vertical([
            Constraint::Length(next_panel.height()),
            Constraint::Length(key_panel.height()),
        ])
        .spacing(1)
        .areas(right_column);
        let next_area = next_area.layout::<1>(
            &Layout::horizontal([Constraint::Length(next_panel.width())]).flex(Flex::Start),
        )[0];

        let game_board_width = game_board.width();
        session_stats.render(stats_area, buf);
        game_board.render(board_area, buf);
        next_panel.render(next_area, buf);
        key_panel.render(key_area, buf);

        let popup = match state {
            SessionState::Playing => None,
            SessionState::Paused => Some((["PAUSED", "P to resume"], style::PAUSED)),
            SessionState::GameOver => Some((["GAME OVER", "R to restart"], style::GAME_OVER)),
        };

        if let Some((lines, style)) = popup {
            let block = Block::new().style(style);
            let text = Text::from_iter(lines).style(style).centered();
            let area =
                board_area.centered(Constraint::Length(game_board_width), Constraint::Length(4));
            let inner = block.inner(area);
            Clear.render(area, buf);
            block.render(area, buf);
            text.render(inner.centered_vertically(Constraint::Length(2)), buf);
        }
    }
}
