//! Crate root module declarations for the Plum Bughouse engine.
//!
//! Exposes the board model, the standard-chess rules oracle, the two move
//! codecs, and the bughouse layer (board pair, legality, premoves, scramble and
//! the per-match session) so hosts and benches can import stable module paths.

pub mod errors;

pub mod game_state {
    pub mod chess_rules;
    pub mod chess_types;
    pub mod game_state;
    pub mod hand;
}

pub mod rules {
    pub mod attacks;
    pub mod board_move;
    pub mod legal_move_apply;
    pub mod legal_move_checks;
    pub mod legal_move_generator;
}

pub mod codec {
    pub mod compact_token;
    pub mod move_command;
    pub mod transport;
}

pub mod bughouse {
    pub mod board_pair;
    pub mod legality;
    pub mod premove_queue;
    pub mod scramble;
    pub mod session;
}

pub mod tables {
    pub mod opening_book;
}

pub mod utils {
    pub mod algebraic;
    pub mod fen_generator;
    pub mod fen_parser;
    pub mod render_game_state;
}
