//! Droppable piece reserves ("hands").
//!
//! A hand is a bag of piece kinds. Board 0's hands are only ever replaced
//! wholesale from the authoritative feed; nothing in this crate derives hand
//! contents from captures.

use std::fmt;

use crate::game_state::chess_types::{PieceKind, DROPPABLE_PIECE_KINDS};

const NUM_DROPPABLE: usize = DROPPABLE_PIECE_KINDS.len();

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandInventory {
    counts: [u8; NUM_DROPPABLE],
}

impl HandInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hand from a case-insensitive letter string such as `"PPn"`.
    /// Letters that do not name a droppable piece are ignored.
    pub fn from_letters(letters: &str) -> Self {
        let mut hand = Self::new();
        for piece in letters.chars().filter_map(PieceKind::from_letter) {
            if piece.is_droppable() {
                hand.counts[piece.index()] = hand.counts[piece.index()].saturating_add(1);
            }
        }
        hand
    }

    #[inline]
    pub fn count(&self, piece: PieceKind) -> u8 {
        if piece.is_droppable() {
            self.counts[piece.index()]
        } else {
            0
        }
    }

    #[inline]
    pub fn contains(&self, piece: PieceKind) -> bool {
        self.count(piece) > 0
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&c| c == 0)
    }

    /// Each piece kind present at least once, in pawn-to-queen order.
    pub fn distinct(&self) -> impl Iterator<Item = PieceKind> + '_ {
        DROPPABLE_PIECE_KINDS
            .iter()
            .copied()
            .filter(|piece| self.contains(*piece))
    }

    /// Letters in pawn-to-queen order, one per piece held.
    pub fn to_letters(&self, upper_case: bool) -> String {
        let mut out = String::new();
        for piece in DROPPABLE_PIECE_KINDS {
            let ch = if upper_case {
                piece.letter().to_ascii_uppercase()
            } else {
                piece.letter()
            };
            for _ in 0..self.count(piece) {
                out.push(ch);
            }
        }
        out
    }
}

impl fmt::Display for HandInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_letters(false))
    }
}
