use std::{iter, time::Duration};

use blockfall_engine::{GameStats, Snapshot};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::style;

/// Stats panel. Score, level and lines come from the frame's snapshot; the
/// piece count and clear histogram from the session's [`GameStats`].
pub struct SessionStatsDisplay<'a> {
    snapshot: &'a Snapshot<'a>,
    stats: &'a GameStats,
    play_time: Duration,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SessionStatsDisplay<'a> {
    pub fn new(snapshot: &'a Snapshot<'a>, stats: &'a GameStats, play_time: Duration) -> Self {
        Self {
            snapshot,
            stats,
            play_time,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        ROW_COUNT + super::block_vertical_margin(self.block.as_ref())
    }

    fn cleared_count(&self, lines: usize) -> String {
        self.stats.line_cleared_counter()[lines].to_string()
    }
}

type Value = &'static dyn Fn(&SessionStatsDisplay<'_>) -> String;

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(Value),
    LabelValue(&'static str, Value),
}

const ROWS: &[Row] = &[
    Row::FullLabel("SCORE:"),
    Row::FullValue(&|display| display.snapshot.score.to_string()),
    Row::FullLabel("TIME:"),
    Row::FullValue(&|display| format_play_time(display.play_time)),
    Row::Empty,
    Row::LabelValue("LEVEL:", &|display| display.snapshot.level.to_string()),
    Row::LabelValue("LINES:", &|display| {
        display.snapshot.cleared_lines.to_string()
    }),
    Row::Empty,
    Row::LabelValue("PIECES:", &|display| {
        display.stats.completed_pieces().to_string()
    }),
    Row::LabelValue("SINGLES:", &|display| display.cleared_count(1)),
    Row::LabelValue("DOUBLES:", &|display| display.cleared_count(2)),
    Row::LabelValue("TRIPLES:", &|display| display.cleared_count(3)),
    Row::LabelValue("TETRIS:", &|display| display.cleared_count(4)),
];

#[expect(clippy::cast_possible_truncation)]
const ROW_COUNT: u16 = ROWS.len() as u16;

/// Formats as `m:ss.cc`.
pub fn format_play_time(play_time: Duration) -> String {
    format!(
        "{:0}:{:0>2}.{:0>2}",
        play_time.as_secs() / 60,
        play_time.as_secs() % 60,
        play_time.subsec_millis() / 10
    )
}

impl Widget for SessionStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let style = style::DEFAULT;

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style).left_aligned().render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self), style)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
