//! Human move syntax: `"p@e4"` for drops, `"e2e4"` / `"e7e8q"` for board moves.

use std::fmt;
use std::str::FromStr;

use crate::errors::{BughouseError, BughouseResult};
use crate::game_state::chess_types::{PieceKind, Square};
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveCommand {
    Drop {
        piece: PieceKind,
        to: Square,
    },
    Board {
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    },
}

impl MoveCommand {
    #[inline]
    pub fn is_drop(&self) -> bool {
        matches!(self, MoveCommand::Drop { .. })
    }

    #[inline]
    pub fn to(&self) -> Square {
        match *self {
            MoveCommand::Drop { to, .. } | MoveCommand::Board { to, .. } => to,
        }
    }
}

impl FromStr for MoveCommand {
    type Err = BughouseError;

    fn from_str(s: &str) -> BughouseResult<Self> {
        let s = s.trim_end();
        let syntax_error = || BughouseError::InvalidMoveSyntax(s.to_owned());
        if !s.is_ascii() {
            return Err(syntax_error());
        }

        let bytes = s.as_bytes();
        if bytes.len() == 4 && bytes[1] == b'@' {
            let letter = char::from(bytes[0]);
            let piece = PieceKind::from_letter(letter)
                .filter(|p| p.is_droppable())
                .ok_or(BughouseError::UnknownPieceLetter(letter))?;
            return Ok(MoveCommand::Drop {
                piece,
                to: algebraic_to_square(&s[2..4])?,
            });
        }

        if bytes.len() != 4 && bytes.len() != 5 {
            return Err(syntax_error());
        }

        let promotion = match bytes.get(4) {
            None => None,
            Some(&b) => {
                let letter = char::from(b);
                let piece = PieceKind::from_letter(letter)
                    .filter(|p| !matches!(p, PieceKind::Pawn | PieceKind::King))
                    .ok_or(BughouseError::UnknownPieceLetter(letter))?;
                Some(piece)
            }
        };

        Ok(MoveCommand::Board {
            from: algebraic_to_square(&s[0..2])?,
            to: algebraic_to_square(&s[2..4])?,
            promotion,
        })
    }
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MoveCommand::Drop { piece, to } => {
                write!(f, "{}@{}", piece.letter(), square_to_algebraic(to))
            }
            MoveCommand::Board {
                from,
                to,
                promotion,
            } => {
                write!(f, "{}{}", square_to_algebraic(from), square_to_algebraic(to))?;
                if let Some(piece) = promotion {
                    write!(f, "{}", piece.letter())?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MoveCommand;
    use crate::game_state::chess_types::PieceKind;
    use crate::utils::algebraic::algebraic_to_square;

    #[test]
    fn parses_drops_case_insensitively() {
        let upper: MoveCommand = "Q@d5".parse().expect("drop should parse");
        let lower: MoveCommand = "q@d5".parse().expect("drop should parse");
        assert_eq!(upper, lower);
        assert_eq!(
            lower,
            MoveCommand::Drop {
                piece: PieceKind::Queen,
                to: algebraic_to_square("d5").expect("d5")
            }
        );
        assert_eq!(upper.to_string(), "q@d5");
    }

    #[test]
    fn parses_board_moves_with_optional_promotion() {
        let plain: MoveCommand = "e2e4".parse().expect("move should parse");
        assert!(!plain.is_drop());
        assert_eq!(plain.to_string(), "e2e4");

        let promo: MoveCommand = "e7e8N\n".parse().expect("promotion should parse");
        assert_eq!(promo.to_string(), "e7e8n");
    }

    #[test]
    fn rejects_malformed_commands() {
        for bad in ["", "e2e", "k@e4", "x@e4", "p@e9", "e2e4k", "e2e4e5", "é2e4"] {
            assert!(bad.parse::<MoveCommand>().is_err(), "{bad:?} should not parse");
        }
    }
}
