//! Primitive chess types shared by both boards of a bughouse match.

pub use crate::game_state::game_state::GameState;
pub use crate::game_state::hand::HandInventory;

/// Side to move. `Light` moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Light,
    Dark,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::Light => 0,
            Color::Dark => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::Light => Color::Dark,
            Color::Dark => Color::Light,
        }
    }

    /// Rank a pawn of this color promotes on.
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::Light => 7,
            Color::Dark => 0,
        }
    }
}

/// Piece kind (color is represented separately for cache-friendly layouts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

pub const ALL_PIECE_KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

/// Everything that can sit in a hand. Kings are never captured into a hand.
pub const DROPPABLE_PIECE_KINDS: [PieceKind; 5] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
];

impl PieceKind {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Lower-case letter used by FEN, drops and promotion suffixes.
    #[inline]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    /// Case-insensitive inverse of [`PieceKind::letter`].
    pub fn from_letter(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }

    #[inline]
    pub const fn is_droppable(self) -> bool {
        !matches!(self, PieceKind::King)
    }

    /// FEN letter: upper case for light pieces, lower case for dark ones.
    #[inline]
    pub fn fen_char(self, color: Color) -> char {
        match color {
            Color::Light => self.letter().to_ascii_uppercase(),
            Color::Dark => self.letter(),
        }
    }
}

pub const CASTLE_LIGHT_KINGSIDE: CastlingRights = 1 << 0;
pub const CASTLE_LIGHT_QUEENSIDE: CastlingRights = 1 << 1;
pub const CASTLE_DARK_KINGSIDE: CastlingRights = 1 << 2;
pub const CASTLE_DARK_QUEENSIDE: CastlingRights = 1 << 3;
pub type CastlingRights = u8;

/// Board square index (`0..=63`, `0 == a1`, `63 == h8`).
pub type Square = u8;

#[inline]
pub const fn file_of(square: Square) -> u8 {
    square % 8
}

#[inline]
pub const fn rank_of(square: Square) -> u8 {
    square / 8
}

/// Square at `(file, rank)`, or `None` when either coordinate falls off the board.
#[inline]
pub fn square_at(file: i8, rank: i8) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some((rank * 8 + file) as Square)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_letters_are_case_insensitive() {
        assert_eq!(PieceKind::from_letter('Q'), Some(PieceKind::Queen));
        assert_eq!(PieceKind::from_letter('n'), Some(PieceKind::Knight));
        assert_eq!(PieceKind::from_letter('x'), None);
        assert_eq!(PieceKind::Rook.fen_char(Color::Light), 'R');
        assert_eq!(PieceKind::Rook.fen_char(Color::Dark), 'r');
    }

    #[test]
    fn square_at_rejects_off_board_coordinates() {
        assert_eq!(square_at(0, 0), Some(0));
        assert_eq!(square_at(7, 7), Some(63));
        assert_eq!(square_at(-1, 3), None);
        assert_eq!(square_at(4, 8), None);
        assert_eq!(file_of(28), 4);
        assert_eq!(rank_of(28), 3);
    }
}
