//! Canonical chess-rule constants.
//!
//! Static literals for setting up a board and for the handful of bughouse
//! drop restrictions layered on top of standard chess.

use crate::game_state::chess_types::{rank_of, PieceKind, Square};

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Pawns may not be dropped onto either back rank.
#[inline]
pub fn is_drop_rank_allowed(piece: PieceKind, to: Square) -> bool {
    piece != PieceKind::Pawn || !matches!(rank_of(to), 0 | 7)
}
