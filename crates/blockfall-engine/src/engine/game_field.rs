use crate::{
    LockError, MoveError,
    core::{
        board::{Board, BoardSizeError},
        piece::{Piece, RotationDirection},
        placement::is_valid_position,
    },
};

use super::piece_generator::PieceGenerator;

/// The board together with the falling piece and the next piece.
///
/// The falling piece is always at a valid position on the board. It is only
/// missing after [`Self::lock`] failed to spawn the next piece, which ends the
/// game.
#[derive(Debug, Clone)]
pub struct GameField {
    board: Board,
    falling_piece: Option<Piece>,
    next_piece: Piece,
    generator: PieceGenerator,
}

impl GameField {
    /// Creates an empty `width`×`height` field and spawns the first two pieces.
    pub fn new(
        width: u16,
        height: u16,
        mut generator: PieceGenerator,
    ) -> Result<Self, BoardSizeError> {
        let board = Board::new(width, height)?;
        let falling_piece = generator.generate(width);
        let next_piece = generator.generate(width);
        Ok(Self {
            board,
            falling_piece: Some(falling_piece),
            next_piece,
            generator,
        })
    }

    /// Creates a field on a prepared board with the given pieces.
    #[cfg(test)]
    pub(crate) fn with_pieces(
        board: Board,
        falling_piece: Piece,
        next_piece: Piece,
        generator: PieceGenerator,
    ) -> Self {
        assert!(is_valid_position(&board, &falling_piece, 0, 0));
        Self {
            board,
            falling_piece: Some(falling_piece),
            next_piece,
            generator,
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn falling_piece(&self) -> Option<&Piece> {
        self.falling_piece.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> &Piece {
        &self.next_piece
    }

    /// Replaces the falling piece if `piece` fits on the board.
    pub fn set_falling_piece(&mut self, piece: Piece) -> Result<(), MoveError> {
        if !is_valid_position(&self.board, &piece, 0, 0) {
            return Err(MoveError::Collision);
        }
        self.falling_piece = Some(piece);
        Ok(())
    }

    /// Moves the falling piece by (`dx`, `dy`) if the target position is valid.
    pub fn try_move(&mut self, dx: i32, dy: i32) -> Result<(), MoveError> {
        let piece = self
            .falling_piece
            .as_mut()
            .ok_or(MoveError::NoFallingPiece)?;
        if !is_valid_position(&self.board, piece, dx, dy) {
            return Err(MoveError::Collision);
        }
        *piece = piece.shifted(dx, dy);
        Ok(())
    }

    /// Turns the falling piece one rotation state in place.
    ///
    /// There are no wall kicks: if the turned piece does not fit at the same
    /// position, the rotation is rejected.
    pub fn try_rotate(&mut self, direction: RotationDirection) -> Result<(), MoveError> {
        let piece = self
            .falling_piece
            .as_mut()
            .ok_or(MoveError::NoFallingPiece)?;
        let rotated = piece.rotated(direction);
        if !is_valid_position(&self.board, &rotated, 0, 0) {
            return Err(MoveError::Collision);
        }
        *piece = rotated;
        Ok(())
    }

    /// Returns how many rows the falling piece can drop.
    #[must_use]
    pub fn drop_distance(&self) -> Option<usize> {
        self.falling_piece
            .as_ref()
            .map(|piece| drop_distance(&self.board, piece))
    }

    /// Returns the falling piece moved to where a hard drop would put it.
    #[must_use]
    pub fn ghost_piece(&self) -> Option<Piece> {
        let piece = self.falling_piece.as_ref()?;
        let distance = drop_distance(&self.board, piece);
        Some(piece.shifted(0, row_offset(distance)))
    }

    /// Moves the falling piece straight down as far as it goes and returns the
    /// number of rows it fell.
    ///
    /// The piece is not locked; that happens on the next gravity step.
    pub fn hard_drop(&mut self) -> Result<usize, MoveError> {
        let piece = self
            .falling_piece
            .as_mut()
            .ok_or(MoveError::NoFallingPiece)?;
        let distance = drop_distance(&self.board, piece);
        *piece = piece.shifted(0, row_offset(distance));
        Ok(distance)
    }

    /// Locks the falling piece into the board and spawns the next one.
    ///
    /// Returns the number of cleared rows together with the spawn result. If
    /// the next piece does not fit at its spawn position, nothing is spawned:
    /// the field is left without a falling piece and the next piece stays
    /// where it is.
    pub fn lock(&mut self) -> (usize, Result<(), LockError>) {
        let Some(piece) = self.falling_piece.take() else {
            return (0, Err(LockError::NoFallingPiece));
        };
        self.board.merge(&piece);
        let cleared_lines = self.board.clear_lines();

        if !is_valid_position(&self.board, &self.next_piece, 0, 0) {
            return (cleared_lines, Err(LockError::SpawnCollision));
        }
        let next_piece = self.generator.generate(self.board.width());
        self.falling_piece = Some(std::mem::replace(&mut self.next_piece, next_piece));
        (cleared_lines, Ok(()))
    }

    /// Empties the board and spawns fresh pieces from the same generator.
    pub fn reset(&mut self) {
        self.board = self.board.emptied();
        let width = self.board.width();
        self.falling_piece = Some(self.generator.generate(width));
        self.next_piece = self.generator.generate(width);
    }
}

fn drop_distance(board: &Board, piece: &Piece) -> usize {
    // Terminates: the floor blocks every piece eventually.
    let mut distance = 0;
    while is_valid_position(board, piece, 0, row_offset(distance + 1)) {
        distance += 1;
    }
    distance
}

fn row_offset(distance: usize) -> i32 {
    i32::try_from(distance).expect("drop distance is bounded by the board height")
}
