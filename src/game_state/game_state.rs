//! Bitboard position model for a single board of a bughouse match.
//!
//! `GameState` stores piece bitboards, occupancy caches, side/rights flags and
//! the two move clocks. Standard moves produce a new state (see
//! `rules::legal_move_apply`); drops edit a state in place by fiat.

use crate::errors::BughouseResult;
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    // [color][piece_kind]
    pub pieces: [[u64; 6]; 2],

    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    pub halfmove_clock: u16,
    pub fullmove_number: u16,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            pieces: [[0; 6]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,
            side_to_move: Color::Light,
            castling_rights: 0,
            en_passant_square: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl GameState {
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// The standard starting position.
    pub fn new_game() -> Self {
        // The literal is covered by tests; an empty board is never observed.
        parse_fen(STARTING_POSITION_FEN).unwrap_or_default()
    }

    #[inline]
    pub fn from_fen(fen: &str) -> BughouseResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    pub fn piece_at(&self, square: Square) -> Option<(Color, PieceKind)> {
        let mask = 1u64 << square;
        if self.occupancy_all & mask == 0 {
            return None;
        }
        for color in [Color::Light, Color::Dark] {
            for piece in ALL_PIECE_KINDS {
                if self.pieces[color.index()][piece.index()] & mask != 0 {
                    return Some((color, piece));
                }
            }
        }
        None
    }

    #[inline]
    pub fn is_empty_square(&self, square: Square) -> bool {
        self.occupancy_all & (1u64 << square) == 0
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces[color.index()][PieceKind::King.index()];
        (kings != 0).then(|| kings.trailing_zeros() as Square)
    }

    /// Place a piece by fiat, replacing whatever stood on the square.
    pub fn put_piece(&mut self, color: Color, piece: PieceKind, square: Square) {
        self.remove_piece(square);
        self.pieces[color.index()][piece.index()] |= 1u64 << square;
        self.recalc_occupancy();
    }

    /// Remove and return whatever stands on `square`.
    pub fn remove_piece(&mut self, square: Square) -> Option<(Color, PieceKind)> {
        let found = self.piece_at(square)?;
        self.pieces[found.0.index()][found.1.index()] &= !(1u64 << square);
        self.recalc_occupancy();
        Some(found)
    }

    /// Place `piece` on the empty `square`, run `probe` against the result, then
    /// take the piece off again. The exclusive borrow keeps the temporary
    /// placement invisible to every other reader.
    pub fn with_probe_piece<R>(
        &mut self,
        color: Color,
        piece: PieceKind,
        square: Square,
        probe: impl FnOnce(&GameState) -> R,
    ) -> Option<R> {
        if !self.is_empty_square(square) {
            return None;
        }
        self.put_piece(color, piece, square);
        let out = probe(self);
        self.remove_piece(square);
        Some(out)
    }

    /// Drop a piece for the side to move and hand the turn over.
    ///
    /// Placement bypasses move application, so the turn bookkeeping is done
    /// here: flip side, clear en passant, bump the halfmove clock, and bump the
    /// fullmove number when light is to move again.
    pub fn drop_piece(&mut self, piece: PieceKind, square: Square) {
        self.put_piece(self.side_to_move, piece, square);
        self.side_to_move = self.side_to_move.opposite();
        self.en_passant_square = None;
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        if self.side_to_move == Color::Light {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
    }

    pub fn recalc_occupancy(&mut self) {
        for color in [Color::Light, Color::Dark] {
            self.occupancy_by_color[color.index()] = self.pieces[color.index()]
                .iter()
                .fold(0u64, |acc, bb| acc | bb);
        }
        self.occupancy_all = self.occupancy_by_color[Color::Light.index()]
            | self.occupancy_by_color[Color::Dark.index()];
    }
}
