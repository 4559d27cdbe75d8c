//! Standard move application.
//!
//! `classify_move` turns a bare from/to pair into a flagged [`BoardMove`] by
//! inspecting the board, and `apply_move` produces the successor position.
//! Neither checks legality; the position feed is trusted and the legal move
//! generator filters its own candidates.

use crate::errors::{BughouseError, BughouseResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::rules::board_move::*;

/// Flag a from/to move the way the side to move would play it.
///
/// A pawn reaching its back rank without an explicit promotion piece becomes
/// a queen.
pub fn classify_move(
    game_state: &GameState,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> BughouseResult<BoardMove> {
    let (color, piece) = game_state
        .piece_at(from)
        .filter(|(color, _)| *color == game_state.side_to_move)
        .ok_or(BughouseError::NoPieceOnSquare(from))?;

    let mut mv = BoardMove::new(from, to, piece);

    if matches!(game_state.piece_at(to), Some((target, _)) if target != color) {
        mv = mv.with_flags(FLAG_CAPTURE);
    }

    match piece {
        PieceKind::Pawn => {
            if from.abs_diff(to) == 16 {
                mv = mv.with_flags(FLAG_DOUBLE_PAWN_PUSH);
            }
            if game_state.en_passant_square == Some(to)
                && file_of(from) != file_of(to)
                && game_state.is_empty_square(to)
            {
                mv = mv.with_flags(FLAG_CAPTURE | FLAG_EN_PASSANT);
            }
            if rank_of(to) == color.back_rank() {
                mv = mv.promoting_to(promotion.unwrap_or(PieceKind::Queen));
            }
        }
        PieceKind::King if file_of(from).abs_diff(file_of(to)) == 2 => {
            mv = mv.with_flags(FLAG_CASTLING);
        }
        _ => {}
    }

    Ok(mv)
}

pub fn apply_move(game_state: &GameState, mv: BoardMove) -> GameState {
    let moving_color = game_state.side_to_move;
    let enemy_color = moving_color.opposite();
    let to_mask = 1u64 << mv.to;

    let mut next = game_state.clone();
    next.pieces[moving_color.index()][mv.piece.index()] &= !(1u64 << mv.from);

    if mv.has_flag(FLAG_EN_PASSANT) {
        let captured = match moving_color {
            Color::Light => mv.to.wrapping_sub(8),
            Color::Dark => mv.to.wrapping_add(8),
        };
        let captured = captured & 63;
        next.pieces[enemy_color.index()][PieceKind::Pawn.index()] &= !(1u64 << captured);
    } else {
        for bb in next.pieces[enemy_color.index()].iter_mut() {
            *bb &= !to_mask;
        }
    }

    let landed = mv.promotion.unwrap_or(mv.piece);
    next.pieces[moving_color.index()][landed.index()] |= to_mask;

    if mv.has_flag(FLAG_CASTLING) {
        let rank_base = mv.from - file_of(mv.from);
        let (rook_from, rook_to) = if file_of(mv.to) > file_of(mv.from) {
            (rank_base + 7, rank_base + 5)
        } else {
            (rank_base, rank_base + 3)
        };
        let rooks = &mut next.pieces[moving_color.index()][PieceKind::Rook.index()];
        *rooks = (*rooks & !(1u64 << rook_from)) | (1u64 << rook_to);
    }

    next.castling_rights &= !(castling_rights_touched(mv.from) | castling_rights_touched(mv.to));
    if mv.piece == PieceKind::King {
        next.castling_rights &= match moving_color {
            Color::Light => !(CASTLE_LIGHT_KINGSIDE | CASTLE_LIGHT_QUEENSIDE),
            Color::Dark => !(CASTLE_DARK_KINGSIDE | CASTLE_DARK_QUEENSIDE),
        };
    }

    next.en_passant_square = mv
        .has_flag(FLAG_DOUBLE_PAWN_PUSH)
        .then(|| (mv.from + mv.to) / 2);

    if mv.piece == PieceKind::Pawn || mv.has_flag(FLAG_CAPTURE) {
        next.halfmove_clock = 0;
    } else {
        next.halfmove_clock = next.halfmove_clock.saturating_add(1);
    }
    if moving_color == Color::Dark {
        next.fullmove_number = next.fullmove_number.saturating_add(1);
    }
    next.side_to_move = enemy_color;

    next.recalc_occupancy();
    next
}

/// Rights lost when a piece leaves or lands on a rook's home square.
fn castling_rights_touched(square: Square) -> CastlingRights {
    match square {
        0 => CASTLE_LIGHT_QUEENSIDE,
        7 => CASTLE_LIGHT_KINGSIDE,
        56 => CASTLE_DARK_QUEENSIDE,
        63 => CASTLE_DARK_KINGSIDE,
        _ => 0,
    }
}
