//! Crate-wide error type.
//!
//! Only constructors and encoders fail loudly. The bughouse predicates and the
//! feed decoders turn every failure into `false` / `None` and log it instead.

use std::error::Error;
use std::fmt;

use crate::game_state::chess_types::Square;

pub type BughouseResult<T> = Result<T, BughouseError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BughouseError {
    InvalidSquare(String),
    InvalidFen(String),
    InvalidMoveSyntax(String),
    UnknownPieceLetter(char),
    NoPieceOnSquare(Square),
    PremoveQueueFull { capacity: usize },
}

impl fmt::Display for BughouseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BughouseError::InvalidSquare(s) => write!(f, "invalid algebraic square: {s}"),
            BughouseError::InvalidFen(msg) => write!(f, "invalid FEN: {msg}"),
            BughouseError::InvalidMoveSyntax(s) => write!(f, "invalid move syntax: {s:?}"),
            BughouseError::UnknownPieceLetter(ch) => write!(f, "unknown piece letter: {ch:?}"),
            BughouseError::NoPieceOnSquare(sq) => write!(f, "no piece on square index {sq}"),
            BughouseError::PremoveQueueFull { capacity } => {
                write!(f, "premove queue is full ({capacity} entries)")
            }
        }
    }
}

impl Error for BughouseError {}
