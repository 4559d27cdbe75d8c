//! Terminal board renderer for trace logs and debugging.

use crate::game_state::game_state::GameState;

const GLYPHS: [[char; 6]; 2] = [
    ['♙', '♘', '♗', '♖', '♕', '♔'],
    ['♟', '♞', '♝', '♜', '♛', '♚'],
];

/// Render the board with rank 8 on top. Empty squares show as `·`.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::from("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        let label = char::from(b'1' + rank);
        out.push(label);
        for file in 0..8u8 {
            out.push(' ');
            out.push(match game_state.piece_at(rank * 8 + file) {
                Some((color, piece)) => GLYPHS[color.index()][piece.index()],
                None => '·',
            });
        }
        out.push(' ');
        out.push(label);
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");
    out
}
