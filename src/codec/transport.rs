//! Outbound single-move transport format.
//!
//! One 85-symbol table covers everything: indices `0..64` are squares (a1
//! upward), `64..76` are promotion symbols packed as
//! `64 + 3 * piece + (file step + 1)`, and `79..85` are drop symbols packed as
//! `79 + piece`, with pieces numbered in queen, knight, rook, bishop, king, pawn
//! order. This is deliberately a separate table from the position-feed codec
//! in `compact_token`.

use crate::codec::move_command::MoveCommand;
use crate::errors::{BughouseError, BughouseResult};
use crate::game_state::chess_types::{file_of, rank_of, square_at, PieceKind, Square};

const TRANSPORT_TABLE: &[u8; 85] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!?{~}(^)[_]@#$,./&-*++=";

const PIECE_ORDER: [PieceKind; 6] = [
    PieceKind::Queen,
    PieceKind::Knight,
    PieceKind::Rook,
    PieceKind::Bishop,
    PieceKind::King,
    PieceKind::Pawn,
];

const SQUARE_LIMIT: usize = 64;
const PROMOTION_BASE: usize = 64;
const PROMOTION_LIMIT: usize = 76;
const DROP_BASE: usize = 79;

fn piece_number(piece: PieceKind) -> usize {
    PIECE_ORDER
        .iter()
        .position(|p| *p == piece)
        .unwrap_or(PIECE_ORDER.len() - 1)
}

fn symbol_index(symbol: u8) -> Option<usize> {
    TRANSPORT_TABLE.iter().position(|&c| c == symbol)
}

/// Encode `"piece@square"` or `"fromTo[promotion]"` into its two-symbol form.
pub fn encode(move_text: &str) -> BughouseResult<String> {
    let command: MoveCommand = move_text.parse()?;
    let (first, second) = match command {
        MoveCommand::Drop { piece, to } => (DROP_BASE + piece_number(piece), usize::from(to)),
        MoveCommand::Board {
            from,
            to,
            promotion: None,
        } => (usize::from(from), usize::from(to)),
        MoveCommand::Board {
            from,
            to,
            promotion: Some(piece),
        } => {
            let file_step = file_of(to) as i8 - file_of(from) as i8;
            let promotes = matches!((rank_of(from), rank_of(to)), (6, 7) | (1, 0));
            if file_step.abs() > 1 || !promotes {
                return Err(BughouseError::InvalidMoveSyntax(move_text.to_owned()));
            }
            let packed = PROMOTION_BASE + 3 * piece_number(piece) + (file_step + 1) as usize;
            (usize::from(from), packed)
        }
    };

    Ok([TRANSPORT_TABLE[first], TRANSPORT_TABLE[second]]
        .iter()
        .map(|&b| char::from(b))
        .collect())
}

/// Decode a two-symbol transport move back into human syntax. Malformed input
/// decodes to `None`.
pub fn decode(encoded: &str) -> Option<String> {
    let &[first, second] = encoded.as_bytes() else {
        return None;
    };
    let first = symbol_index(first)?;
    let second = symbol_index(second)?;

    let command = if first >= DROP_BASE {
        let piece = PIECE_ORDER[first - DROP_BASE];
        if !piece.is_droppable() || second >= SQUARE_LIMIT {
            return None;
        }
        MoveCommand::Drop {
            piece,
            to: second as Square,
        }
    } else if first < SQUARE_LIMIT {
        let from = first as Square;
        if second < SQUARE_LIMIT {
            MoveCommand::Board {
                from,
                to: second as Square,
                promotion: None,
            }
        } else if second < PROMOTION_LIMIT {
            let packed = second - PROMOTION_BASE;
            let file_step = (packed % 3) as i8 - 1;
            let rank_step = if rank_of(from) < 2 { -1 } else { 1 };
            let to = square_at(
                file_of(from) as i8 + file_step,
                rank_of(from) as i8 + rank_step,
            )?;
            MoveCommand::Board {
                from,
                to,
                promotion: Some(PIECE_ORDER[packed / 3]),
            }
        } else {
            return None;
        }
    } else {
        return None;
    };

    Some(command.to_string())
}
