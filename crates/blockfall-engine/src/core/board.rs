use std::fmt;

use serde::{Serialize, ser::SerializeStruct as _};

use super::piece::{Piece, PieceColor, TEMPLATE_SIZE};

/// A single cell of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    /// Nothing locked here.
    #[default]
    Empty,
    /// Part of a locked piece of the given color.
    Filled(PieceColor),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[must_use]
    pub fn color(self) -> Option<PieceColor> {
        match self {
            Cell::Empty => None,
            Cell::Filled(color) => Some(color),
        }
    }

    /// `.` for an empty cell, the color index digit otherwise.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Filled(color) => char::from(b'0' + color.index()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "board size {width}x{height} is out of range (width {}..={max}, height {}..={max})",
    Board::MIN_WIDTH,
    Board::MIN_HEIGHT,
    max = Board::MAX_SIZE
)]
pub struct BoardSizeError {
    width: u16,
    height: u16,
}

/// The well: a fixed-size grid of locked cells.
///
/// The board only gains filled cells by merging a locked piece and only loses
/// them by collapsing full rows. Every filled cell lies inside the grid; the
/// space above row 0 is never stored and is always passable.
///
/// # Coordinate System
///
/// - (0, 0) is the top-left cell
/// - x grows rightward, y grows downward
/// - coordinates are `i32` so that cells of pieces hanging above the board
///   (negative y) can be expressed directly
///
/// # Example
///
/// ```
/// use blockfall_engine::Board;
///
/// let board = Board::new(10, 20).unwrap();
/// assert!(board.is_blocked(-1, 5)); // left wall
/// assert!(board.is_blocked(0, 20)); // floor
/// assert!(!board.is_blocked(0, -1)); // above the board
/// assert!(board.full_rows().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Default for Board {
    fn default() -> Self {
        Self::standard()
    }
}

impl Board {
    pub const STANDARD_WIDTH: u16 = 10;
    pub const STANDARD_HEIGHT: u16 = 20;

    // Narrower boards cannot hold a spawned template.
    pub const MIN_WIDTH: u16 = TEMPLATE_SIZE as u16;
    pub const MIN_HEIGHT: u16 = 4;
    pub const MAX_SIZE: u16 = 256;

    /// Creates an empty board.
    pub fn new(width: u16, height: u16) -> Result<Self, BoardSizeError> {
        let valid_width = (Self::MIN_WIDTH..=Self::MAX_SIZE).contains(&width);
        let valid_height = (Self::MIN_HEIGHT..=Self::MAX_SIZE).contains(&height);
        if !valid_width || !valid_height {
            return Err(BoardSizeError { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Cell::Empty; usize::from(width) * usize::from(height)],
        })
    }

    /// Creates an empty 10×20 board.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            width: Self::STANDARD_WIDTH,
            height: Self::STANDARD_HEIGHT,
            cells: vec![
                Cell::Empty;
                usize::from(Self::STANDARD_WIDTH) * usize::from(Self::STANDARD_HEIGHT)
            ],
        }
    }

    /// Returns an empty board of the same size.
    #[must_use]
    pub fn emptied(&self) -> Self {
        Self {
            width: self.width,
            height: self.height,
            cells: vec![Cell::Empty; self.cells.len()],
        }
    }

    #[must_use]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u16 {
        self.height
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        let width = usize::from(self.width);
        (x < width && y < usize::from(self.height)).then(|| y * width + x)
    }

    /// Returns the cell at (x, y), or `None` outside the grid.
    #[must_use]
    pub fn cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Returns whether a piece cell may not occupy (x, y).
    ///
    /// Side walls and the floor are blocked, as is every filled cell. Space
    /// above the board (negative y) between the walls is always free, which is
    /// what lets pieces spawn partially outside the grid.
    #[must_use]
    pub fn is_blocked(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= i32::from(self.width) || y >= i32::from(self.height) {
            return true;
        }
        if y < 0 {
            return false;
        }
        self.cell(x, y).is_some_and(|cell| !cell.is_empty())
    }

    /// Writes the piece's color into every cell it occupies on the board.
    ///
    /// Cells above the board are dropped silently. The piece is expected to be
    /// in a valid position.
    pub fn merge(&mut self, piece: &Piece) {
        for (x, y) in piece.occupied_positions() {
            if let Some(i) = self.index(x, y) {
                self.cells[i] = Cell::Filled(piece.color());
            }
        }
    }

    /// Returns the rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(usize::from(self.width))
    }

    fn row(&self, y: usize) -> &[Cell] {
        let width = usize::from(self.width);
        &self.cells[y * width..][..width]
    }

    fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|cell| !cell.is_empty())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell.is_empty())
    }

    /// Returns the indices of the full rows, top to bottom.
    #[must_use]
    pub fn full_rows(&self) -> Vec<usize> {
        (0..usize::from(self.height))
            .filter(|&y| self.is_row_full(y))
            .collect()
    }

    /// Removes every full row and returns how many were removed.
    ///
    /// Rows are scanned bottom-up. When a row is full, everything above it
    /// moves down one row, the top row is emptied, and the same row index is
    /// tested again, since the row that just fell into it may be full too.
    /// The scan only moves up past rows that are not full.
    pub fn clear_lines(&mut self) -> usize {
        let mut cleared = 0;
        let mut y = usize::from(self.height);
        while y > 0 {
            if self.is_row_full(y - 1) {
                self.collapse_row(y - 1);
                cleared += 1;
            } else {
                y -= 1;
            }
        }
        cleared
    }

    fn collapse_row(&mut self, y: usize) {
        let width = usize::from(self.width);
        self.cells.copy_within(..y * width, width);
        self.cells[..width].fill(Cell::Empty);
    }

    /// Builds a board from rows drawn with `.` (empty) and color digits.
    #[cfg(test)]
    pub(crate) fn from_ascii(rows: &[&str]) -> Self {
        let width = u16::try_from(rows[0].len()).unwrap();
        let height = u16::try_from(rows.len()).unwrap();
        let mut board = Self::new(width, height).unwrap();
        for (y, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), usize::from(width));
            for (x, c) in row.bytes().enumerate() {
                board.cells[y * usize::from(width) + x] = match c {
                    b'.' => Cell::Empty,
                    digit => Cell::Filled(PieceColor::new(digit - b'0').unwrap()),
                };
            }
        }
        board
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                write!(f, "{}", cell.as_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Rows are drawn the same way as `Display`: "..0.3....."
        let rows: Vec<String> = self
            .rows()
            .map(|row| row.iter().map(|cell| cell.as_char()).collect())
            .collect();
        let mut state = serializer.serialize_struct("Board", 3)?;
        state.serialize_field("width", &self.width)?;
        state.serialize_field("height", &self.height)?;
        state.serialize_field("rows", &rows)?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use crate::core::piece::{PiecePosition, Shape};

    use super::*;

    fn piece(shape: Shape, rotation: usize, x: i32, y: i32, color: u8) -> Piece {
        Piece::new(
            shape,
            rotation,
            PiecePosition::new(x, y),
            PieceColor::new(color).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new(10, 20).unwrap();
        assert_eq!(board.width(), 10);
        assert_eq!(board.height(), 20);
        assert!(board.is_empty());
        assert_eq!(board.rows().count(), 20);
        assert_eq!(board, Board::standard());
    }

    #[test]
    fn test_new_rejects_bad_sizes() {
        assert!(Board::new(4, 20).is_err());
        assert!(Board::new(10, 3).is_err());
        assert!(Board::new(257, 20).is_err());
        assert!(Board::new(5, 4).is_ok());
        assert_eq!(
            Board::new(4, 20).unwrap_err().to_string(),
            "board size 4x20 is out of range (width 5..=256, height 4..=256)"
        );
    }

    #[test]
    fn test_is_blocked_walls_and_floor() {
        let board = Board::new(10, 20).unwrap();
        assert!(board.is_blocked(-1, 0));
        assert!(board.is_blocked(10, 0));
        assert!(board.is_blocked(0, 20));
        assert!(board.is_blocked(-1, -3));
        assert!(!board.is_blocked(0, 0));
        assert!(!board.is_blocked(9, 19));
    }

    #[test]
    fn test_is_blocked_above_board_is_free() {
        let board = Board::from_ascii(&["00000", "00000", "00000", "00000"]);
        assert!(board.is_blocked(2, 0));
        assert!(!board.is_blocked(2, -1));
        assert!(!board.is_blocked(0, -100));
    }

    #[test]
    fn test_merge_writes_color() {
        let mut board = Board::new(10, 20).unwrap();
        board.merge(&piece(Shape::O, 0, 0, 16, 3));

        let color = PieceColor::new(3).unwrap();
        assert_eq!(board.cell(1, 18), Some(Cell::Filled(color)));
        assert_eq!(board.cell(2, 18), Some(Cell::Filled(color)));
        assert_eq!(board.cell(1, 19), Some(Cell::Filled(color)));
        assert_eq!(board.cell(2, 19), Some(Cell::Filled(color)));
        assert_eq!(board.cell(0, 19), Some(Cell::Empty));
        assert_eq!(board.cells.iter().filter(|c| !c.is_empty()).count(), 4);
    }

    #[test]
    fn test_merge_skips_cells_above_board() {
        let mut board = Board::new(10, 20).unwrap();
        // Vertical I occupies template rows 0..4, so rows -3..=0 on the board.
        board.merge(&piece(Shape::I, 0, 3, -3, 1));

        assert_eq!(board.cells.iter().filter(|c| !c.is_empty()).count(), 1);
        assert_eq!(
            board.cell(5, 0),
            Some(Cell::Filled(PieceColor::new(1).unwrap()))
        );
    }

    #[test]
    fn test_full_rows_top_to_bottom() {
        let board = Board::from_ascii(&[
            ".....", //
            "01230", //
            "0.000", //
            "11111", //
        ]);
        assert_eq!(board.full_rows(), vec![1, 3]);
    }

    #[test]
    fn test_clear_lines_without_full_rows_is_noop() {
        let mut board = Board::from_ascii(&[
            ".....", //
            "1....", //
            "0.000", //
            "1111.", //
        ]);
        let before = board.clone();
        assert_eq!(board.clear_lines(), 0);
        assert_eq!(board, before);

        let mut empty = Board::new(10, 20).unwrap();
        assert_eq!(empty.clear_lines(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_clear_lines_bottom_row() {
        let mut board = Board::from_ascii(&[
            ".....", //
            ".....", //
            "2..3.", //
            "11111", //
        ]);
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(
            board,
            Board::from_ascii(&[
                ".....", //
                ".....", //
                ".....", //
                "2..3.", //
            ])
        );
    }

    #[test]
    fn test_clear_lines_cascades_adjacent_rows() {
        let mut board = Board::from_ascii(&[
            "3....", //
            "00000", //
            "11111", //
            "22222", //
        ]);
        assert_eq!(board.clear_lines(), 3);
        assert_eq!(
            board,
            Board::from_ascii(&[
                ".....", //
                ".....", //
                ".....", //
                "3....", //
            ])
        );
    }

    #[test]
    fn test_clear_lines_non_adjacent_rows() {
        let mut board = Board::from_ascii(&[
            "00000", //
            "1.1.1", //
            "22222", //
            ".3.3.", //
            "00000", //
        ]);
        assert_eq!(board.clear_lines(), 3);
        assert_eq!(
            board,
            Board::from_ascii(&[
                ".....", //
                ".....", //
                ".....", //
                "1.1.1", //
                ".3.3.", //
            ])
        );
    }

    #[test]
    fn test_clear_lines_all_full() {
        let mut board = Board::from_ascii(&["01230", "01230", "01230", "01230"]);
        assert_eq!(board.clear_lines(), 4);
        assert!(board.is_empty());
    }

    #[test]
    fn test_clear_lines_top_row() {
        let mut board = Board::from_ascii(&["33333", ".....", ".....", "1...."]);
        assert_eq!(board.clear_lines(), 1);
        assert_eq!(board, Board::from_ascii(&[".....", ".....", ".....", "1...."]));
    }

    #[test]
    fn test_display() {
        let board = Board::from_ascii(&["0....", ".1...", "..2..", "...3."]);
        assert_eq!(board.to_string(), "0....\n.1...\n..2..\n...3.\n");
    }

    #[test]
    fn test_serialize() {
        let board = Board::from_ascii(&["0....", ".....", ".....", "1111."]);
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "width": 5,
                "height": 4,
                "rows": ["0....", ".....", ".....", "1111."],
            })
        );
    }
}
