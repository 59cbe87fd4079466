use super::{board::Board, piece::Piece};

/// Returns whether `piece`, shifted by (`dx`, `dy`), may occupy `board`.
///
/// Every occupied template cell is checked at its shifted board position:
///
/// - cells above the board (negative row) are ignored, they cannot conflict
/// - cells beside the walls or below the floor fail the check
/// - cells on a filled board cell fail the check
///
/// Neither argument is modified, so this can be called speculatively to try
/// a move, a rotation or a drop distance before committing it.
///
/// # Example
///
/// ```
/// use blockfall_engine::{Board, Piece, PieceColor, Shape, is_valid_position};
///
/// let board = Board::standard();
/// let piece = Piece::spawn(Shape::O, 0, PieceColor::new(0).unwrap(), board.width()).unwrap();
///
/// assert!(is_valid_position(&board, &piece, 0, 0));
/// assert!(is_valid_position(&board, &piece, 0, 18));
/// assert!(!is_valid_position(&board, &piece, 0, 19)); // below the floor
/// ```
#[must_use]
pub fn is_valid_position(board: &Board, piece: &Piece, dx: i32, dy: i32) -> bool {
    piece.occupied_positions().all(|(x, y)| {
        // A shift past the coordinate range can never land on the board.
        let (Some(x), Some(y)) = (x.checked_add(dx), y.checked_add(dy)) else {
            return false;
        };
        y < 0 || !board.is_blocked(x, y)
    })
}

#[cfg(test)]
mod tests {
    use crate::core::piece::{PieceColor, PiecePosition, RotationDirection, Shape};

    use super::*;

    fn piece(shape: Shape, rotation: usize, x: i32, y: i32) -> Piece {
        Piece::new(
            shape,
            rotation,
            PiecePosition::new(x, y),
            PieceColor::new(0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_spawned_pieces_are_valid_on_empty_board() {
        let board = Board::standard();
        for shape in Shape::ALL {
            for rotation in 0..shape.rotation_count() {
                let piece =
                    Piece::spawn(shape, rotation, PieceColor::new(0).unwrap(), board.width())
                        .unwrap();
                assert!(
                    is_valid_position(&board, &piece, 0, 0),
                    "{shape}#{rotation}"
                );
            }
        }
    }

    #[test]
    fn test_cells_above_board_are_ignored() {
        let board = Board::from_ascii(&[
            ".....", //
            ".....", //
            ".....", //
            "00000", //
        ]);
        // Vertical I at column 2, template rows 0..4 → board rows -5..=-2.
        let piece = piece(Shape::I, 0, 0, -5);
        assert!(is_valid_position(&board, &piece, 0, 0));
        // Moving it down until its lowest cell reaches row 2 is still fine.
        assert!(is_valid_position(&board, &piece, 0, 4));
        // One more row lands on the filled bottom row.
        assert!(!is_valid_position(&board, &piece, 0, 5));
    }

    #[test]
    fn test_walls() {
        let board = Board::standard();
        // Horizontal I occupies template columns 0..4 of row 2.
        let piece = piece(Shape::I, 1, 0, 0);
        assert!(is_valid_position(&board, &piece, 0, 0));
        assert!(!is_valid_position(&board, &piece, -1, 0));
        assert!(is_valid_position(&board, &piece, 6, 0));
        assert!(!is_valid_position(&board, &piece, 7, 0));
    }

    #[test]
    fn test_out_of_range_shift_is_invalid() {
        let board = Board::standard();
        let near = piece(Shape::O, 0, 4, 5);
        assert!(!is_valid_position(&board, &near, i32::MAX, 0));
        assert!(!is_valid_position(&board, &near, i32::MIN, 0));
        assert!(!is_valid_position(&board, &near, 0, i32::MAX));

        let far = piece(Shape::O, 0, i32::MAX, i32::MAX);
        assert!(!is_valid_position(&board, &far, 0, 0));
        assert!(!is_valid_position(&board, &far, 1, 1));
    }

    #[test]
    fn test_cells_above_board_ignore_walls() {
        let board = Board::standard();
        let piece = piece(Shape::I, 1, -1, -5);
        assert!(is_valid_position(&board, &piece, 0, 0));
        assert!(is_valid_position(&board, &piece, -5, 0));
    }

    #[test]
    fn test_collision_with_filled_cell() {
        let board = Board::from_ascii(&[
            ".....", //
            ".....", //
            "..1..", //
            ".....", //
        ]);
        // O occupies template (1..3, 2..4).
        let piece = piece(Shape::O, 0, 0, -2);
        assert!(is_valid_position(&board, &piece, 0, 0));
        assert!(!is_valid_position(&board, &piece, 0, 1));
        assert!(!is_valid_position(&board, &piece, 1, 2));
        assert!(is_valid_position(&board, &piece, 2, 2));
    }

    #[test]
    fn test_rotation_can_be_checked_speculatively() {
        let board = Board::standard();
        // Vertical I hugging the left wall: its only column is template column 2.
        let vertical = piece(Shape::I, 0, -2, 5);
        assert!(is_valid_position(&board, &vertical, 0, 0));

        let horizontal = vertical.rotated(RotationDirection::Clockwise);
        assert!(!is_valid_position(&board, &horizontal, 0, 0));
        assert_eq!(vertical.rotation(), 0);
    }
}
