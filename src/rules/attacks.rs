//! Piece-attack model.
//!
//! Each piece is described by its step offsets `(file_delta, rank_delta)`.
//! Leaper tables are built at compile time; sliders are traced against the
//! occupancy on demand. Attack sets are symmetric, so `piece_attacks` from a
//! king's square also gives the squares a piece would check it from.

use crate::game_state::chess_types::{square_at, Color, PieceKind, Square};

pub type Offset = (i8, i8);

pub const KNIGHT_OFFSETS: [Offset; 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_OFFSETS: [Offset; 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

pub const BISHOP_DIRECTIONS: [Offset; 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
pub const ROOK_DIRECTIONS: [Offset; 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const QUEEN_DIRECTIONS: [Offset; 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (-1, 1),
    (1, -1),
    (-1, -1),
];

/// Diagonal capture offsets of a pawn of `color`.
#[inline]
pub const fn pawn_capture_offsets(color: Color) -> [Offset; 2] {
    match color {
        Color::Light => [(-1, 1), (1, 1)],
        Color::Dark => [(-1, -1), (1, -1)],
    }
}

/// Square reached from `square` by `offset`, if it stays on the board.
#[inline]
pub fn step(square: Square, (df, dr): Offset) -> Option<Square> {
    square_at((square % 8) as i8 + df, (square / 8) as i8 + dr)
}

const fn leaper_table(offsets: &[Offset]) -> [u64; 64] {
    let mut table = [0u64; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut i = 0usize;
        while i < offsets.len() {
            let f = file + offsets[i].0;
            let r = rank + offsets[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                table[sq] |= 1u64 << (r as usize * 8 + f as usize);
            }
            i += 1;
        }
        sq += 1;
    }
    table
}

pub const KNIGHT_ATTACKS: [u64; 64] = leaper_table(&KNIGHT_OFFSETS);
pub const KING_ATTACKS: [u64; 64] = leaper_table(&KING_OFFSETS);
const LIGHT_PAWN_ATTACKS: [u64; 64] = leaper_table(&pawn_capture_offsets(Color::Light));
const DARK_PAWN_ATTACKS: [u64; 64] = leaper_table(&pawn_capture_offsets(Color::Dark));

#[inline]
pub const fn knight_attacks(square: Square) -> u64 {
    KNIGHT_ATTACKS[square as usize]
}

#[inline]
pub const fn king_attacks(square: Square) -> u64 {
    KING_ATTACKS[square as usize]
}

/// Squares a pawn of `color` standing on `square` attacks.
#[inline]
pub const fn pawn_attacks(color: Color, square: Square) -> u64 {
    match color {
        Color::Light => LIGHT_PAWN_ATTACKS[square as usize],
        Color::Dark => DARK_PAWN_ATTACKS[square as usize],
    }
}

/// Union of rays from `square`, each ray including its first blocker.
pub fn slider_attacks(square: Square, directions: &[Offset], occupancy: u64) -> u64 {
    let mut attacks = 0u64;
    for &direction in directions {
        let mut current = square;
        while let Some(next) = step(current, direction) {
            let bit = 1u64 << next;
            attacks |= bit;
            if occupancy & bit != 0 {
                break;
            }
            current = next;
        }
    }
    attacks
}

#[inline]
pub fn bishop_attacks(square: Square, occupancy: u64) -> u64 {
    slider_attacks(square, &BISHOP_DIRECTIONS, occupancy)
}

#[inline]
pub fn rook_attacks(square: Square, occupancy: u64) -> u64 {
    slider_attacks(square, &ROOK_DIRECTIONS, occupancy)
}

#[inline]
pub fn queen_attacks(square: Square, occupancy: u64) -> u64 {
    slider_attacks(square, &QUEEN_DIRECTIONS, occupancy)
}

/// Attack set of a non-pawn piece on `square`.
pub fn piece_attacks(piece: PieceKind, square: Square, occupancy: u64) -> u64 {
    match piece {
        PieceKind::Knight => knight_attacks(square),
        PieceKind::King => king_attacks(square),
        PieceKind::Bishop => bishop_attacks(square, occupancy),
        PieceKind::Rook => rook_attacks(square, occupancy),
        PieceKind::Queen => queen_attacks(square, occupancy),
        PieceKind::Pawn => 0,
    }
}
