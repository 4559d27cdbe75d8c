//! FEN-to-GameState parser.

use crate::errors::{BughouseError, BughouseResult};
use crate::game_state::{chess_types::*, game_state::GameState};
use crate::utils::algebraic::algebraic_to_square;

fn invalid(msg: impl Into<String>) -> BughouseError {
    BughouseError::InvalidFen(msg.into())
}

pub fn parse_fen(fen: &str) -> BughouseResult<GameState> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    let &[board, side, castling, en_passant, halfmove, fullmove] = fields.as_slice() else {
        return Err(invalid(format!(
            "expected 6 fields, found {} in {fen:?}",
            fields.len()
        )));
    };

    let mut game_state = GameState::new_empty();
    parse_board(board, &mut game_state)?;

    game_state.side_to_move = match side {
        "w" => Color::Light,
        "b" => Color::Dark,
        _ => return Err(invalid(format!("side-to-move field {side:?}"))),
    };
    game_state.castling_rights = parse_castling_rights(castling)?;
    game_state.en_passant_square = match en_passant {
        "-" => None,
        sq => Some(algebraic_to_square(sq).map_err(|_| invalid(format!("en-passant {sq:?}")))?),
    };
    game_state.halfmove_clock = halfmove
        .parse::<u16>()
        .map_err(|_| invalid(format!("halfmove clock {halfmove:?}")))?;
    game_state.fullmove_number = fullmove
        .parse::<u16>()
        .map_err(|_| invalid(format!("fullmove number {fullmove:?}")))?;

    game_state.recalc_occupancy();
    Ok(game_state)
}

fn parse_board(board: &str, game_state: &mut GameState) -> BughouseResult<()> {
    let ranks: Vec<&str> = board.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    for (row, rank_str) in ranks.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(skip) = ch.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(invalid(format!("empty-square count {ch:?}")));
                }
                file += skip as u8;
                continue;
            }

            let piece = PieceKind::from_letter(ch)
                .filter(|_| ch.is_ascii_alphabetic())
                .ok_or_else(|| invalid(format!("piece character {ch:?}")))?;
            let color = if ch.is_ascii_uppercase() {
                Color::Light
            } else {
                Color::Dark
            };
            if file >= 8 {
                return Err(invalid(format!("rank {} has too many files", rank + 1)));
            }
            game_state.pieces[color.index()][piece.index()] |= 1u64 << (rank * 8 + file);
            file += 1;
        }

        if file != 8 {
            return Err(invalid(format!("rank {} does not sum to 8 files", rank + 1)));
        }
    }

    Ok(())
}

fn parse_castling_rights(castling: &str) -> BughouseResult<CastlingRights> {
    if castling == "-" {
        return Ok(0);
    }

    castling.chars().try_fold(0, |rights, ch| {
        let bit = match ch {
            'K' => CASTLE_LIGHT_KINGSIDE,
            'Q' => CASTLE_LIGHT_QUEENSIDE,
            'k' => CASTLE_DARK_KINGSIDE,
            'q' => CASTLE_DARK_QUEENSIDE,
            _ => return Err(invalid(format!("castling character {ch:?}"))),
        };
        Ok(rights | bit)
    })
}
