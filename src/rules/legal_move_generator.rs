//! Standard-chess rules oracle.
//!
//! Generates pseudo-legal candidates piece by piece, applies each one, drops
//! those that leave the mover's king attacked, and records whether the
//! survivor gives check. Drops are not generated here; the bughouse layer
//! handles them on top of this oracle.

use crate::game_state::{chess_types::*, game_state::GameState};
use crate::rules::attacks::{pawn_attacks, piece_attacks};
use crate::rules::board_move::*;
use crate::rules::legal_move_apply::apply_move;
use crate::rules::legal_move_checks::{is_king_in_check, is_square_attacked};

#[derive(Debug, Clone)]
pub struct GeneratedMove {
    pub mv: BoardMove,
    pub game_after_move: GameState,
    pub gives_check: bool,
}

/// The questions the bughouse layer asks of standard chess rules.
pub trait RulesOracle: Send + Sync {
    fn legal_moves(&self, game_state: &GameState) -> Vec<GeneratedMove>;

    /// Bitboard of legal destinations for the piece on `from`.
    fn legal_destinations(&self, game_state: &GameState, from: Square) -> u64 {
        self.legal_moves(game_state)
            .iter()
            .filter(|g| g.mv.from == from)
            .fold(0u64, |acc, g| acc | (1u64 << g.mv.to))
    }

    fn is_king_attacked(&self, game_state: &GameState, color: Color) -> bool {
        is_king_in_check(game_state, color)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRules;

impl RulesOracle for StandardRules {
    fn legal_moves(&self, game_state: &GameState) -> Vec<GeneratedMove> {
        let mover = game_state.side_to_move;
        let mut pseudo = Vec::<BoardMove>::with_capacity(64);
        generate_pseudo_moves(game_state, &mut pseudo);

        pseudo
            .into_iter()
            .filter_map(|mv| {
                let next = apply_move(game_state, mv);
                if is_king_in_check(&next, mover) {
                    return None;
                }
                let gives_check = is_king_in_check(&next, mover.opposite());
                Some(GeneratedMove {
                    mv,
                    game_after_move: next,
                    gives_check,
                })
            })
            .collect()
    }

    fn legal_destinations(&self, game_state: &GameState, from: Square) -> u64 {
        let mover = game_state.side_to_move;
        let mut pseudo = Vec::<BoardMove>::with_capacity(28);
        generate_pseudo_moves(game_state, &mut pseudo);

        pseudo
            .into_iter()
            .filter(|mv| mv.from == from)
            .filter(|mv| !is_king_in_check(&apply_move(game_state, *mv), mover))
            .fold(0u64, |acc, mv| acc | (1u64 << mv.to))
    }
}

pub fn generate_pseudo_moves(game_state: &GameState, out: &mut Vec<BoardMove>) {
    generate_pawn_moves(game_state, out);
    for piece in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        generate_piece_moves(game_state, piece, out);
    }
    generate_castling_moves(game_state, out);
}

fn generate_piece_moves(game_state: &GameState, piece: PieceKind, out: &mut Vec<BoardMove>) {
    let side = game_state.side_to_move;
    let own_occ = game_state.occupancy_by_color[side.index()];
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];

    let mut pieces = game_state.pieces[side.index()][piece.index()];
    while pieces != 0 {
        let from = pieces.trailing_zeros() as Square;
        let mut targets = piece_attacks(piece, from, game_state.occupancy_all) & !own_occ;
        while targets != 0 {
            let to = targets.trailing_zeros() as Square;
            let mut mv = BoardMove::new(from, to, piece);
            if enemy_occ & (1u64 << to) != 0 {
                mv = mv.with_flags(FLAG_CAPTURE);
            }
            out.push(mv);
            targets &= targets - 1;
        }
        pieces &= pieces - 1;
    }
}

const PROMOTION_PIECES: [PieceKind; 4] = [
    PieceKind::Queen,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::Knight,
];

fn push_pawn_move(mv: BoardMove, back_rank: u8, out: &mut Vec<BoardMove>) {
    if rank_of(mv.to) == back_rank {
        out.extend(PROMOTION_PIECES.iter().map(|&p| mv.promoting_to(p)));
    } else {
        out.push(mv);
    }
}

fn generate_pawn_moves(game_state: &GameState, out: &mut Vec<BoardMove>) {
    let side = game_state.side_to_move;
    let enemy_occ = game_state.occupancy_by_color[side.opposite().index()];
    let empty = !game_state.occupancy_all;
    let (forward, start_rank): (i8, u8) = match side {
        Color::Light => (8, 1),
        Color::Dark => (-8, 6),
    };
    let back_rank = side.back_rank();

    let mut pawns = game_state.pieces[side.index()][PieceKind::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let one_step = from as i8 + forward;
        if (0..64).contains(&one_step) && empty & (1u64 << one_step) != 0 {
            let to = one_step as Square;
            push_pawn_move(BoardMove::new(from, to, PieceKind::Pawn), back_rank, out);

            let two_step = one_step + forward;
            if rank_of(from) == start_rank && empty & (1u64 << two_step) != 0 {
                out.push(
                    BoardMove::new(from, two_step as Square, PieceKind::Pawn)
                        .with_flags(FLAG_DOUBLE_PAWN_PUSH),
                );
            }
        }

        let mut captures = pawn_attacks(side, from);
        while captures != 0 {
            let to = captures.trailing_zeros() as Square;
            captures &= captures - 1;

            let mv = BoardMove::new(from, to, PieceKind::Pawn);
            if enemy_occ & (1u64 << to) != 0 {
                push_pawn_move(mv.with_flags(FLAG_CAPTURE), back_rank, out);
            } else if game_state.en_passant_square == Some(to) {
                out.push(mv.with_flags(FLAG_CAPTURE | FLAG_EN_PASSANT));
            }
        }
    }
}

fn generate_castling_moves(game_state: &GameState, out: &mut Vec<BoardMove>) {
    let side = game_state.side_to_move;
    let enemy = side.opposite();
    let (home, kingside, queenside) = match side {
        Color::Light => (4u8, CASTLE_LIGHT_KINGSIDE, CASTLE_LIGHT_QUEENSIDE),
        Color::Dark => (60u8, CASTLE_DARK_KINGSIDE, CASTLE_DARK_QUEENSIDE),
    };

    if game_state.king_square(side) != Some(home) || is_square_attacked(game_state, home, enemy) {
        return;
    }

    let rooks = game_state.pieces[side.index()][PieceKind::Rook.index()];
    let occupied = game_state.occupancy_all;

    // The king crosses the first two of the squares that must be empty.
    let kingside_path = [home + 1, home + 2];
    let queenside_path = [home - 1, home - 2, home - 3];
    let wings: [(CastlingRights, Square, &[Square], Square); 2] = [
        (kingside, home + 3, &kingside_path, home + 2),
        (queenside, home - 4, &queenside_path, home - 2),
    ];

    for (right, rook_sq, path, to) in wings {
        if game_state.castling_rights & right == 0 || rooks & (1u64 << rook_sq) == 0 {
            continue;
        }
        if path.iter().any(|sq| occupied & (1u64 << sq) != 0) {
            continue;
        }
        if path[..2].iter().any(|&sq| is_square_attacked(game_state, sq, enemy)) {
            continue;
        }
        out.push(BoardMove::new(home, to, PieceKind::King).with_flags(FLAG_CASTLING));
    }
}
