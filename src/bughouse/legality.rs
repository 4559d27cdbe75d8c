//! Legality and predrop predicates for our board.
//!
//! Neither predicate ever fails: anything that does not parse is simply not
//! legal and not a predrop.

use log::trace;

use crate::bughouse::board_pair::{BoardIndex, BoardPair};
use crate::codec::move_command::MoveCommand;
use crate::game_state::chess_rules::is_drop_rank_allowed;
use crate::game_state::chess_types::Color;
use crate::rules::legal_move_generator::RulesOracle;

fn parse_command(move_text: &str) -> Option<MoveCommand> {
    if move_text.len() < 4 {
        return None;
    }
    match move_text.parse::<MoveCommand>() {
        Ok(command) => Some(command),
        Err(e) => {
            trace!("not a move command: {e}");
            None
        }
    }
}

/// Whether `move_text` can be played right now on board 0.
///
/// Drops need the piece in the side-to-move's hand, an empty target square and
/// must not leave the dropper in check; the piece is probed in place and always
/// removed again. Board moves are checked against the oracle's destinations
/// from the source square; a promotion suffix is not checked separately.
pub fn is_legal(pair: &mut BoardPair, oracle: &dyn RulesOracle, move_text: &str) -> bool {
    let Some(command) = parse_command(move_text) else {
        return false;
    };
    let (game, hands) = pair.own_board_mut();

    match command {
        MoveCommand::Drop { piece, to } => {
            let mover = game.side_to_move;
            if !hands[mover.index()].contains(piece) || !is_drop_rank_allowed(piece, to) {
                return false;
            }
            game.with_probe_piece(mover, piece, to, |probe| {
                !oracle.is_king_attacked(probe, mover)
            })
            .unwrap_or(false)
        }
        MoveCommand::Board { from, to, .. } => {
            oracle.legal_destinations(game, from) & (1u64 << to) != 0
        }
    }
}

/// A drop whose piece `side` does not hold yet.
pub fn is_predrop(pair: &BoardPair, move_text: &str, side: Color) -> bool {
    match parse_command(move_text) {
        Some(MoveCommand::Drop { piece, .. }) => {
            !pair.hand(BoardIndex::Own, side).contains(piece)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{is_legal, is_predrop};
    use crate::bughouse::board_pair::{BoardIndex, BoardPair};
    use crate::game_state::chess_types::Color;
    use crate::rules::legal_move_generator::StandardRules;

    #[test]
    fn short_and_malformed_strings_are_illegal() {
        let mut pair = BoardPair::new();
        for bad in ["", "e2", "e2e", "zzzz", "k@e4", "e2e4e5"] {
            assert!(!is_legal(&mut pair, &StandardRules, bad), "{bad:?}");
        }
    }

    #[test]
    fn board_moves_follow_the_oracle() {
        let mut pair = BoardPair::new();
        assert!(is_legal(&mut pair, &StandardRules, "e2e4"));
        assert!(is_legal(&mut pair, &StandardRules, "g1f3"));
        assert!(!is_legal(&mut pair, &StandardRules, "e2e5"));
        assert!(!is_legal(&mut pair, &StandardRules, "e7e5"));
    }

    #[test]
    fn drop_requires_piece_in_hand() {
        let mut pair = BoardPair::new();
        pair.set_hand(Color::Dark, "n");
        assert!(!is_legal(&mut pair, &StandardRules, "n@e4"));
        assert!(!is_legal(&mut pair, &StandardRules, "p@e4"));

        pair.set_hand(Color::Light, "n");
        assert!(is_legal(&mut pair, &StandardRules, "n@e4"));
        assert!(is_legal(&mut pair, &StandardRules, "N@e4"));
    }

    #[test]
    fn drop_requires_empty_target_and_legal_rank() {
        let mut pair = BoardPair::new();
        pair.set_hand(Color::Light, "pq");
        assert!(!is_legal(&mut pair, &StandardRules, "q@e2"));
        assert!(!is_legal(&mut pair, &StandardRules, "p@d8"));
        assert!(is_legal(&mut pair, &StandardRules, "p@d4"));
    }

    #[test]
    fn drop_that_leaves_own_king_in_check_is_illegal() {
        let mut pair = BoardPair::new();
        // Light king on e1 already in check from the rook on e8.
        pair.load_fen(BoardIndex::Own, "4r2k/8/8/8/8/8/8/4K3 w - - 0 1")
            .expect("test FEN should parse");
        pair.set_hand(Color::Light, "n");
        let before = pair.snapshot(BoardIndex::Own).to_owned();

        assert!(!is_legal(&mut pair, &StandardRules, "n@a4"));
        assert!(is_legal(&mut pair, &StandardRules, "n@e4"));
        assert_eq!(pair.board(BoardIndex::Own).get_fen(), before);
    }

    #[test]
    fn predrop_means_drop_syntax_with_piece_missing() {
        let mut pair = BoardPair::new();
        pair.set_hand(Color::Light, "b");
        assert!(is_predrop(&pair, "p@f7", Color::Light));
        assert!(!is_predrop(&pair, "b@f7", Color::Light));
        assert!(is_predrop(&pair, "b@f7", Color::Dark));
        assert!(!is_predrop(&pair, "e2e4", Color::Light));
        assert!(!is_predrop(&pair, "p@", Color::Light));
    }
}
