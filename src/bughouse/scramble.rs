//! Time-scramble move picker.
//!
//! Cheap, one-shot and check-happy: drop a piece with check if the hand allows
//! it, else play a checking move, else move the king, else anything legal.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::bughouse::board_pair::BoardPair;
use crate::codec::move_command::MoveCommand;
use crate::game_state::chess_rules::is_drop_rank_allowed;
use crate::game_state::chess_types::{HandInventory, PieceKind};
use crate::game_state::game_state::GameState;
use crate::rules::attacks::{pawn_attacks, piece_attacks};
use crate::rules::legal_move_generator::RulesOracle;

/// Every drop from `hand` that checks the opposing king without exposing our own.
///
/// Candidate squares are found by projecting each piece's movement outward from
/// the opposing king, which is where a piece of that kind would attack it from.
pub fn drop_check_candidates(
    game: &mut GameState,
    hand: &HandInventory,
    oracle: &dyn RulesOracle,
) -> Vec<MoveCommand> {
    let mover = game.side_to_move;
    let them = mover.opposite();
    let Some(king) = game.king_square(them) else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for piece in hand.distinct() {
        let mut targets = match piece {
            PieceKind::Pawn => pawn_attacks(them, king),
            _ => piece_attacks(piece, king, game.occupancy_all),
        } & !game.occupancy_all;

        while targets != 0 {
            let to = targets.trailing_zeros() as u8;
            targets &= targets - 1;
            if !is_drop_rank_allowed(piece, to) {
                continue;
            }
            let checks = game.with_probe_piece(mover, piece, to, |probe| {
                oracle.is_king_attacked(probe, them) && !oracle.is_king_attacked(probe, mover)
            });
            if checks == Some(true) {
                candidates.push(MoveCommand::Drop { piece, to });
            }
        }
    }
    candidates
}

/// Pick a move for the side to move on board 0, or `None` when it has no move.
pub fn scramble<R: Rng + ?Sized>(
    pair: &mut BoardPair,
    oracle: &dyn RulesOracle,
    rng: &mut R,
) -> Option<String> {
    let (game, hands) = pair.own_board_mut();
    let hand = hands[game.side_to_move.index()];

    let drops = drop_check_candidates(game, &hand, oracle);
    if let Some(choice) = drops.choose(rng) {
        debug!("scramble: checking drop {choice} of {}", drops.len());
        return Some(choice.to_string());
    }

    let moves = oracle.legal_moves(game);
    let picked = moves
        .iter()
        .find(|g| g.gives_check)
        .or_else(|| moves.iter().find(|g| g.mv.piece == PieceKind::King))
        .or_else(|| moves.choose(rng))?;
    debug!("scramble: {}", picked.mv);
    Some(picked.mv.to_string())
}
