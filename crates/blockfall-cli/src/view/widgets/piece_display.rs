use blockfall_engine::{Piece, PieceMask};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::view::widgets::BlockDisplay;

/// Preview area size in blocks.
const PREVIEW_SIZE: u16 = 4;

/// A single piece, cropped to its occupied cells and centered in a 4×4 area.
#[derive(Debug, Default)]
pub struct PieceDisplay<'a> {
    piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> PieceDisplay<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn piece(self, piece: Piece) -> Self {
        Self {
            piece: Some(piece),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        PREVIEW_SIZE * BlockDisplay::WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        PREVIEW_SIZE * BlockDisplay::HEIGHT + super::block_vertical_margin(self.block.as_ref())
    }
}

/// Bounding box of the occupied cells as `(min_x, min_y, width, height)`.
fn bounding_box(mask: PieceMask) -> (u8, u8, u8, u8) {
    let cells = mask.occupied_cells();
    let Some(&(first_x, first_y)) = cells.first() else {
        return (0, 0, 0, 0);
    };
    let (mut min_x, mut max_x, mut min_y, mut max_y) = (first_x, first_x, first_y, first_y);
    for &(x, y) in &cells {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }
    (min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}

impl Widget for PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &PieceDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let empty_block = BlockDisplay::empty(false);
        let Some(piece) = self.piece else {
            Widget::render(&empty_block, area, buf);
            return;
        };

        let mask = piece.mask();
        let (min_x, min_y, w, h) = bounding_box(mask);
        let piece_area = area.centered(
            Constraint::Length(u16::from(w) * BlockDisplay::WIDTH),
            Constraint::Length(u16::from(h) * BlockDisplay::HEIGHT),
        );

        let col_constraints = (0..w).map(|_| Constraint::Length(BlockDisplay::WIDTH));
        let row_constraints = (0..h).map(|_| Constraint::Length(BlockDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);
        let grid_rows = piece_area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));

        let occupied_block = BlockDisplay::filled(piece.color());
        for (y, grid_row) in (min_y..).zip(grid_rows) {
            for (x, grid_cell) in (min_x..).zip(grid_row) {
                if mask.is_occupied(x, y) {
                    Widget::render(&occupied_block, grid_cell, buf);
                } else {
                    Widget::render(&empty_block, grid_cell, buf);
                }
            }
        }
    }
}
