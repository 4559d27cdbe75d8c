use crate::game_state::{chess_types::*, game_state::GameState};
use crate::rules::attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks,
};

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// Is `square` attacked by any piece of `attacker_color`?
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let theirs = &game_state.pieces[attacker_color.index()];
    let occupancy = game_state.occupancy_all;

    // A pawn of the defending color on `square` would attack exactly the
    // squares from which an attacking pawn hits `square`.
    if pawn_attacks(attacker_color.opposite(), square) & theirs[PieceKind::Pawn.index()] != 0 {
        return true;
    }
    if knight_attacks(square) & theirs[PieceKind::Knight.index()] != 0 {
        return true;
    }
    if king_attacks(square) & theirs[PieceKind::King.index()] != 0 {
        return true;
    }

    let diagonal = theirs[PieceKind::Bishop.index()] | theirs[PieceKind::Queen.index()];
    if bishop_attacks(square, occupancy) & diagonal != 0 {
        return true;
    }

    let straight = theirs[PieceKind::Rook.index()] | theirs[PieceKind::Queen.index()];
    rook_attacks(square, occupancy) & straight != 0
}
