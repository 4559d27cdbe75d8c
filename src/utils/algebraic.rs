//! Square conversions for long algebraic coordinates (`"e4"` <-> `28`).

use crate::errors::{BughouseError, BughouseResult};
use crate::game_state::chess_types::{file_of, rank_of, Square};

/// Convert long algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> BughouseResult<Square> {
    let &[file, rank] = square.as_bytes() else {
        return Err(BughouseError::InvalidSquare(square.to_owned()));
    };

    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(BughouseError::InvalidSquare(square.to_owned()));
    }

    Ok((rank - b'1') * 8 + (file - b'a'))
}

/// Convert a square index (`0..=63`) to long algebraic notation.
///
/// Indices above 63 are masked into range; callers only hand in squares taken
/// from bitboards or validated tables.
#[inline]
pub fn square_to_algebraic(square: Square) -> String {
    let square = square & 63;
    let mut out = String::with_capacity(2);
    out.push(char::from(b'a' + file_of(square)));
    out.push(char::from(b'1' + rank_of(square)));
    out
}
