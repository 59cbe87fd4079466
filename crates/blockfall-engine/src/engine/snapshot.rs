use serde::Serialize;

use crate::core::{board::Board, piece::Piece};

use super::game_session::SessionState;

/// What a renderer needs to draw one frame of a session.
///
/// Borrowed from a [`GameSession`](super::GameSession) with
/// [`snapshot`](super::GameSession::snapshot); it cannot change the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot<'a> {
    pub board: &'a Board,
    /// `None` once the game is over.
    pub falling_piece: Option<Piece>,
    /// Where the falling piece would land with a hard drop.
    pub ghost_piece: Option<Piece>,
    pub next_piece: Piece,
    pub score: usize,
    pub level: usize,
    pub cleared_lines: usize,
    pub state: SessionState,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::{GameSession, PieceSeed, SessionConfig};

    #[test]
    fn test_snapshot_of_new_session() {
        let config = SessionConfig {
            width: 6,
            height: 5,
            seed: Some(PieceSeed::from([1; 16])),
        };
        let session = GameSession::new(config, Duration::ZERO).unwrap();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.board, session.field().board());
        assert_eq!(snapshot.falling_piece.as_ref(), session.field().falling_piece());
        assert_eq!(snapshot.next_piece, *session.field().next_piece());
        assert_eq!(snapshot.ghost_piece, session.field().ghost_piece());
        assert_eq!((snapshot.score, snapshot.level, snapshot.cleared_lines), (0, 1, 0));
        assert!(snapshot.state.is_playing());
    }

    #[test]
    fn test_snapshot_serialize() {
        let config = SessionConfig {
            width: 6,
            height: 5,
            seed: Some(PieceSeed::from([1; 16])),
        };
        let session = GameSession::new(config, Duration::ZERO).unwrap();
        let snapshot = session.snapshot();
        let falling = snapshot.falling_piece.unwrap();
        let ghost = snapshot.ghost_piece.unwrap();

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "board": {
                    "width": 6,
                    "height": 5,
                    "rows": ["......", "......", "......", "......", "......"],
                },
                "falling_piece": falling.to_string(),
                "ghost_piece": ghost.to_string(),
                "next_piece": snapshot.next_piece.to_string(),
                "score": 0,
                "level": 1,
                "cleared_lines": 0,
                "state": "Playing",
            })
        );
    }
}
