//! Position-feed token codec.
//!
//! Every move in the feed is two characters. The first character is either a
//! drop symbol or a square; the second is either a promotion symbol or a
//! square. Squares come from a 64-symbol alphabet laid out rank by rank from
//! a1. A promotion symbol carries the promoted piece and the file direction of
//! the pawn's step; the destination rank is always the mover's back rank.

use crate::game_state::chess_types::{file_of, rank_of, square_at, PieceKind, Square};

const SQUARE_ALPHABET: &[u8; 64] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!?";

const DROP_SYMBOLS: [(u8, PieceKind); 5] = [
    (b'=', PieceKind::Pawn),
    (b'-', PieceKind::Knight),
    (b'+', PieceKind::Bishop),
    (b'*', PieceKind::Rook),
    (b'&', PieceKind::Queen),
];

const TOWARD_A_FILE: i8 = -1;
const STRAIGHT: i8 = 0;
const TOWARD_H_FILE: i8 = 1;

const PROMOTION_SYMBOLS: [(u8, PieceKind, i8); 12] = [
    (b'{', PieceKind::Queen, TOWARD_A_FILE),
    (b'~', PieceKind::Queen, STRAIGHT),
    (b'}', PieceKind::Queen, TOWARD_H_FILE),
    (b'(', PieceKind::Knight, TOWARD_A_FILE),
    (b'^', PieceKind::Knight, STRAIGHT),
    (b')', PieceKind::Knight, TOWARD_H_FILE),
    (b'@', PieceKind::Bishop, TOWARD_A_FILE),
    (b'#', PieceKind::Bishop, STRAIGHT),
    (b'$', PieceKind::Bishop, TOWARD_H_FILE),
    (b'[', PieceKind::Rook, TOWARD_A_FILE),
    (b'_', PieceKind::Rook, STRAIGHT),
    (b']', PieceKind::Rook, TOWARD_H_FILE),
];

/// One decoded feed move. The kind is decided here and never re-inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompactMove {
    Board {
        from: Square,
        to: Square,
    },
    Drop {
        piece: PieceKind,
        to: Square,
    },
    Promotion {
        from: Square,
        to: Square,
        promotion: PieceKind,
    },
}

#[inline]
fn square_from_symbol(symbol: u8) -> Option<Square> {
    SQUARE_ALPHABET
        .iter()
        .position(|&c| c == symbol)
        .map(|index| index as Square)
}

#[inline]
fn drop_piece_from_symbol(symbol: u8) -> Option<PieceKind> {
    DROP_SYMBOLS
        .iter()
        .find(|(c, _)| *c == symbol)
        .map(|(_, piece)| *piece)
}

#[inline]
fn promotion_from_symbol(symbol: u8) -> Option<(PieceKind, i8)> {
    PROMOTION_SYMBOLS
        .iter()
        .find(|(c, _, _)| *c == symbol)
        .map(|(_, piece, direction)| (*piece, *direction))
}

/// Decode a single two-character token. Returns `None` for anything outside
/// the alphabets or a promotion that would step off the board.
pub fn decode_token(token: &[u8]) -> Option<CompactMove> {
    let &[first, second] = token else {
        return None;
    };

    if let Some(piece) = drop_piece_from_symbol(first) {
        return Some(CompactMove::Drop {
            piece,
            to: square_from_symbol(second)?,
        });
    }

    let from = square_from_symbol(first)?;

    if let Some((promotion, direction)) = promotion_from_symbol(second) {
        let to_rank = if rank_of(from) == 6 { 7 } else { 0 };
        let to = square_at(file_of(from) as i8 + direction, to_rank)?;
        return Some(CompactMove::Promotion {
            from,
            to,
            promotion,
        });
    }

    Some(CompactMove::Board {
        from,
        to: square_from_symbol(second)?,
    })
}

/// Split a feed string into its two-character tokens. A dangling final
/// character comes out as a one-byte token, which `decode_token` rejects.
pub fn split_tokens(stream: &str) -> impl Iterator<Item = &[u8]> {
    stream.as_bytes().chunks(2)
}

/// Number of tokens in a feed string.
#[inline]
pub fn token_count(stream: &str) -> usize {
    stream.len().div_ceil(2)
}
