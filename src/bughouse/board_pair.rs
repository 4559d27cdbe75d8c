//! The two linked boards of a bughouse match.
//!
//! Board 0 is ours and is authoritative for legality and drops; board 1 is
//! the partner's game, tracked for information only. Each board consumes the
//! cumulative compact-token feed incrementally and reports a new snapshot only
//! when the position actually changed.

use log::{debug, trace, warn};

use crate::codec::compact_token::{decode_token, split_tokens, token_count, CompactMove};
use crate::errors::{BughouseError, BughouseResult};
use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::{Color, HandInventory};
use crate::game_state::game_state::GameState;
use crate::rules::legal_move_apply::{apply_move, classify_move};
use crate::utils::render_game_state::render_game_state;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardIndex {
    Own,
    Partner,
}

impl BoardIndex {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            BoardIndex::Own => 0,
            BoardIndex::Partner => 1,
        }
    }
}

#[derive(Debug, Clone)]
struct BoardSlot {
    game: GameState,
    hands: [HandInventory; 2],
    applied_tokens: usize,
    snapshot: String,
}

impl BoardSlot {
    fn new() -> Self {
        Self {
            game: GameState::new_game(),
            hands: [HandInventory::new(); 2],
            applied_tokens: 0,
            snapshot: STARTING_POSITION_FEN.to_owned(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BoardPair {
    boards: [BoardSlot; 2],
}

impl Default for BoardPair {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardPair {
    pub fn new() -> Self {
        Self {
            boards: [BoardSlot::new(), BoardSlot::new()],
        }
    }

    #[inline]
    pub fn board(&self, index: BoardIndex) -> &GameState {
        &self.boards[index.index()].game
    }

    #[inline]
    pub fn hand(&self, index: BoardIndex, color: Color) -> &HandInventory {
        &self.boards[index.index()].hands[color.index()]
    }

    #[inline]
    pub fn applied_tokens(&self, index: BoardIndex) -> usize {
        self.boards[index.index()].applied_tokens
    }

    /// Last snapshot handed out for `index`.
    #[inline]
    pub fn snapshot(&self, index: BoardIndex) -> &str {
        &self.boards[index.index()].snapshot
    }

    /// Our board and its hands, split so the board can be probed while the
    /// hands are read.
    pub(crate) fn own_board_mut(&mut self) -> (&mut GameState, &[HandInventory; 2]) {
        let slot = &mut self.boards[BoardIndex::Own.index()];
        (&mut slot.game, &slot.hands)
    }

    /// Bring board `index` up to date with the cumulative token `stream`.
    ///
    /// A stream shorter than what was already applied means a new game or a
    /// missed frame: the board resets to the start position and replays the
    /// whole stream. Returns the new snapshot, or `None` when it did not change.
    pub fn apply_incremental_moves(&mut self, stream: &str, index: BoardIndex) -> Option<String> {
        let slot = &mut self.boards[index.index()];
        let total = token_count(stream);

        if total < slot.applied_tokens {
            debug!(
                "board {}: feed shrank from {} to {} tokens, replaying from the start",
                index.index(),
                slot.applied_tokens,
                total
            );
            slot.game = GameState::new_game();
            slot.applied_tokens = 0;
        }

        for token in split_tokens(stream).skip(slot.applied_tokens) {
            if let Err(e) = apply_token(&mut slot.game, token) {
                warn!(
                    "board {}: skipping token {:?}: {e}",
                    index.index(),
                    String::from_utf8_lossy(token)
                );
            }
        }
        slot.applied_tokens = total;

        let fen = slot.game.get_fen();
        if fen == slot.snapshot {
            return None;
        }
        trace!("board {}: {fen}", index.index());
        slot.snapshot.clone_from(&fen);
        Some(fen)
    }

    /// Start board `index` from an arbitrary position. The token counter is
    /// cleared, so the next feed is applied on top of this position.
    pub fn load_fen(&mut self, index: BoardIndex, fen: &str) -> BughouseResult<()> {
        let game = GameState::from_fen(fen)?;
        let slot = &mut self.boards[index.index()];
        slot.snapshot = game.get_fen();
        slot.game = game;
        slot.applied_tokens = 0;
        Ok(())
    }

    /// Authoritative overwrite of one of our hands.
    pub fn set_hand(&mut self, color: Color, letters: &str) {
        self.boards[BoardIndex::Own.index()].hands[color.index()] =
            HandInventory::from_letters(letters);
    }

    /// Record a partner-board hand. Never consulted for legality.
    pub fn set_partner_hand(&mut self, color: Color, letters: &str) {
        self.boards[BoardIndex::Partner.index()].hands[color.index()] =
            HandInventory::from_letters(letters);
    }

    /// Our last snapshot with both hands spliced in after the placement field,
    /// e.g. `rnbqkbnr/.../RNBQKBNR[PNp] w KQkq - 0 1`. Used as the opening-book key.
    pub fn position_with_hands(&self) -> String {
        let slot = &self.boards[BoardIndex::Own.index()];
        let hands = format!(
            "[{}{}]",
            slot.hands[Color::Light.index()].to_letters(true),
            slot.hands[Color::Dark.index()].to_letters(false)
        );
        match slot.snapshot.split_once(' ') {
            Some((placement, rest)) => format!("{placement}{hands} {rest}"),
            None => format!("{}{hands}", slot.snapshot),
        }
    }

    /// Board diagram followed by both hands.
    pub fn render(&self, index: BoardIndex) -> String {
        let slot = &self.boards[index.index()];
        format!(
            "{}\nwhite hand: {}\nblack hand: {}",
            render_game_state(&slot.game),
            slot.hands[Color::Light.index()].to_letters(true),
            slot.hands[Color::Dark.index()].to_letters(false)
        )
    }
}

fn apply_token(game: &mut GameState, token: &[u8]) -> BughouseResult<()> {
    let decoded = decode_token(token).ok_or_else(|| {
        BughouseError::InvalidMoveSyntax(String::from_utf8_lossy(token).into_owned())
    })?;

    match decoded {
        CompactMove::Drop { piece, to } => game.drop_piece(piece, to),
        CompactMove::Promotion {
            from,
            to,
            promotion,
        } => {
            let mv = classify_move(game, from, to, Some(promotion))?;
            *game = apply_move(game, mv);
        }
        CompactMove::Board { from, to } => {
            let mv = classify_move(game, from, to, None)?;
            *game = apply_move(game, mv);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{BoardIndex, BoardPair};
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, PieceKind};

    // 1. e4 e5 2. Nf3 Nc6 3. Bc4 Bc5 4. O-O Nf6 5. d3 d6
    const TEN_PLIES: &str = "mC0Kgv5QfA9Ieg!TltZR";

    #[test]
    fn applies_tokens_and_reports_changes() {
        let mut pair = BoardPair::new();
        let fen = pair
            .apply_incremental_moves("mC", BoardIndex::Own)
            .expect("first move should change the snapshot");
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(pair.applied_tokens(BoardIndex::Own), 1);
        assert_eq!(pair.snapshot(BoardIndex::Partner), STARTING_POSITION_FEN);
    }

    #[test]
    fn unchanged_stream_is_idempotent() {
        let mut pair = BoardPair::new();
        assert!(pair.apply_incremental_moves("mC0K", BoardIndex::Own).is_some());
        assert!(pair.apply_incremental_moves("mC0K", BoardIndex::Own).is_none());
        assert_eq!(pair.applied_tokens(BoardIndex::Own), 2);
    }

    #[test]
    fn shorter_stream_resets_and_replays() {
        let mut pair = BoardPair::new();
        pair.apply_incremental_moves(TEN_PLIES, BoardIndex::Own)
            .expect("ten plies should change the snapshot");
        assert_eq!(pair.applied_tokens(BoardIndex::Own), 10);
        assert_eq!(
            pair.snapshot(BoardIndex::Own),
            "r1bqk2r/ppp2ppp/2np1n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQ1RK1 w kq - 0 6"
        );

        let fen = pair
            .apply_incremental_moves(&TEN_PLIES[..12], BoardIndex::Own)
            .expect("replayed prefix should differ");
        assert_eq!(pair.applied_tokens(BoardIndex::Own), 6);
        assert_eq!(
            fen,
            "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4"
        );
    }

    #[test]
    fn drop_tokens_place_for_side_to_move() {
        let mut pair = BoardPair::new();
        // 1. e4 then black drops a knight on e5 ('K' is index 36).
        let fen = pair
            .apply_incremental_moves("mC-K", BoardIndex::Own)
            .expect("drop should change the snapshot");
        assert_eq!(
            pair.board(BoardIndex::Own).piece_at(36),
            Some((Color::Dark, PieceKind::Knight))
        );
        assert_eq!(
            fen,
            "rnbqkbnr/pppppppp/8/4n3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
        );
    }

    #[test]
    fn boards_are_independent() {
        let mut pair = BoardPair::new();
        pair.apply_incremental_moves("mC", BoardIndex::Partner);
        assert_eq!(pair.applied_tokens(BoardIndex::Own), 0);
        assert_eq!(pair.snapshot(BoardIndex::Own), STARTING_POSITION_FEN);
        assert_eq!(pair.applied_tokens(BoardIndex::Partner), 1);
    }

    #[test]
    fn undecodable_tokens_are_skipped_but_counted() {
        let mut pair = BoardPair::new();
        let fen = pair
            .apply_incremental_moves("%%mC", BoardIndex::Own)
            .expect("valid token should still apply");
        assert!(fen.starts_with("rnbqkbnr/pppppppp/8/8/4P3/"));
        assert_eq!(pair.applied_tokens(BoardIndex::Own), 2);
    }

    #[test]
    fn position_with_hands_splices_both_hands() {
        let mut pair = BoardPair::new();
        pair.set_hand(Color::Light, "np");
        pair.set_hand(Color::Dark, "Q");
        assert_eq!(
            pair.position_with_hands(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[PNq] w KQkq - 0 1"
        );

        pair.set_partner_hand(Color::Light, "rrr");
        assert!(pair.hand(BoardIndex::Own, Color::Light).contains(PieceKind::Knight));
        assert!(!pair.hand(BoardIndex::Own, Color::Light).contains(PieceKind::Rook));
        assert_eq!(pair.hand(BoardIndex::Partner, Color::Light).count(PieceKind::Rook), 3);
    }

    #[test]
    fn render_includes_hands() {
        let mut pair = BoardPair::new();
        pair.set_hand(Color::Dark, "bb");
        let rendered = pair.render(BoardIndex::Own);
        assert!(rendered.ends_with("white hand: \nblack hand: bb"));
    }
}
