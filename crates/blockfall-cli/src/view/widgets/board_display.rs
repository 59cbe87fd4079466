use std::iter;

use blockfall_engine::{Board, Piece, PieceColor};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use super::BlockDisplay;

/// What to draw in one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layer {
    Board,
    Ghost,
    Falling(PieceColor),
}

/// The board with the falling piece and its landing preview on top.
#[derive(Debug)]
pub struct BoardDisplay<'a> {
    board: &'a Board,
    ghost: Option<Piece>,
    falling_piece: Option<Piece>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> BoardDisplay<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            ghost: None,
            falling_piece: None,
            block: None,
        }
    }

    pub fn ghost(self, piece: Option<Piece>) -> Self {
        Self {
            ghost: piece,
            ..self
        }
    }

    pub fn falling_piece(self, piece: Option<Piece>) -> Self {
        Self {
            falling_piece: piece,
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
        self.board.width() * BlockDisplay::WIDTH
            + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.board.height() * BlockDisplay::HEIGHT
            + super::block_vertical_margin(self.block.as_ref())
    }

    /// Returns the top layer at each board cell, row by row.
    fn layers(&self) -> Vec<Layer> {
        let width = usize::from(self.board.width());
        let mut layers = vec![Layer::Board; width * usize::from(self.board.height())];
        let mut paint = |piece: &Piece, layer: Layer| {
            for (x, y) in piece.occupied_positions() {
                // Cells above the board are not drawn.
                if self.board.cell(x, y).is_some() {
                    let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
                        continue;
                    };
                    layers[y * width + x] = layer;
                }
            }
        };
        if let Some(ghost) = &self.ghost {
            paint(ghost, Layer::Ghost);
        }
        if let Some(piece) = &self.falling_piece {
            paint(piece, Layer::Falling(piece.color()));
        }
        layers
    }
}

impl Widget for BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &BoardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let col_constraints =
            (0..self.board.width()).map(|_| Constraint::Length(BlockDisplay::WIDTH));
        let row_constraints =
            (0..self.board.height()).map(|_| Constraint::Length(BlockDisplay::HEIGHT));
        let horizontal = Layout::horizontal(col_constraints).flex(Flex::Center);
        let vertical = Layout::vertical(row_constraints);

        let grid_rows = area
            .layout_vec(&vertical)
            .into_iter()
            .map(|row| row.layout_vec(&horizontal));
        let layers = self.layers();
        let layer_rows = layers.chunks_exact(usize::from(self.board.width()));

        let rows = iter::zip(grid_rows, self.board.rows()).zip(layer_rows);
        for ((grid_row, board_row), layer_row) in rows {
            for ((grid_cell, cell), layer) in iter::zip(grid_row, board_row).zip(layer_row) {
                let block_display = match layer {
                    Layer::Board => BlockDisplay::from_cell(*cell, true),
                    Layer::Ghost => BlockDisplay::ghost(),
                    Layer::Falling(color) => BlockDisplay::filled(*color),
                };
                block_display.render(grid_cell, buf);
            }
        }
    }
}
