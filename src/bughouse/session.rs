//! One bughouse match as seen from our seat.
//!
//! A `MatchSession` is fed already-parsed game updates for both boards. It
//! keeps the board pair, hands and premove queue in step and, when our turn
//! arrives, hands back the premove to send.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use parking_lot::{Mutex, MutexGuard};
use rand::Rng;

use crate::bughouse::board_pair::{BoardIndex, BoardPair};
use crate::bughouse::legality::is_predrop;
use crate::bughouse::premove_queue::{PremoveQueue, DEFAULT_PREMOVE_CAPACITY};
use crate::bughouse::scramble::scramble;
use crate::codec::transport;
use crate::errors::BughouseResult;
use crate::game_state::chess_types::Color;
use crate::rules::legal_move_generator::{RulesOracle, StandardRules};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub username: String,
    pub premove_capacity: usize,
    /// Base time per player, in tenths of a second.
    pub base_time_deciseconds: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            username: String::new(),
            premove_capacity: DEFAULT_PREMOVE_CAPACITY,
            base_time_deciseconds: 1800,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GameStatus {
    Starting,
    #[default]
    InProgress,
    Finished,
}

impl GameStatus {
    /// Map a status word from the game feed. Anything unknown counts as in progress.
    pub fn from_wire(status: &str) -> Self {
        match status {
            "starting" => GameStatus::Starting,
            "finished" => GameStatus::Finished,
            _ => GameStatus::InProgress,
        }
    }
}

/// One game record from the feed, for either board.
#[derive(Debug, Clone, Default)]
pub struct GameUpdate {
    pub players: Vec<String>,
    pub moves: String,
    pub seq: u32,
    pub white_hand: String,
    pub black_hand: String,
    pub status: GameStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMove {
    pub mv: String,
    pub encoded: String,
    pub ply: u32,
    pub clock_ms: i64,
    pub clock_deciseconds: i64,
}

pub struct MatchSession {
    config: SessionConfig,
    oracle: Box<dyn RulesOracle>,
    pair: BoardPair,
    premoves: PremoveQueue,
    ply: u32,
    our_color: Option<Color>,
    side_to_move: Color,
    opponent: Option<String>,
    playing: bool,
    // [board][color], as last seen on the feed
    last_hands: [[String; 2]; 2],
    turn_started: Option<DateTime<Utc>>,
    // ply our turn clock was started for, and the ply we last sent a move on
    turn_ply: Option<u32>,
    sent_ply: Option<u32>,
}

impl MatchSession {
    pub fn new(config: SessionConfig) -> Self {
        Self::with_oracle(config, Box::new(StandardRules))
    }

    pub fn with_oracle(config: SessionConfig, oracle: Box<dyn RulesOracle>) -> Self {
        let premoves = PremoveQueue::with_capacity(config.premove_capacity);
        Self {
            config,
            oracle,
            pair: BoardPair::new(),
            premoves,
            ply: 0,
            our_color: None,
            side_to_move: Color::Light,
            opponent: None,
            playing: false,
            last_hands: Default::default(),
            turn_started: None,
            turn_ply: None,
            sent_ply: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn pair(&self) -> &BoardPair {
        &self.pair
    }

    pub fn premoves(&self) -> &PremoveQueue {
        &self.premoves
    }

    pub fn ply(&self) -> u32 {
        self.ply
    }

    pub fn our_color(&self) -> Option<Color> {
        self.our_color
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn opponent(&self) -> Option<&str> {
        self.opponent.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_our_turn(&self) -> bool {
        self.our_color == Some(self.side_to_move)
    }

    /// Hand-aware key for the opening book.
    pub fn position_key(&self) -> String {
        self.pair.position_with_hands()
    }

    pub fn handle_update(&mut self, update: &GameUpdate) -> Option<OutboundMove> {
        self.handle_update_at(update, Utc::now())
    }

    /// Apply one game record as of `now`. Returns the premove to send when it
    /// is our turn and nothing has been sent for this ply yet.
    pub fn handle_update_at(
        &mut self,
        update: &GameUpdate,
        now: DateTime<Utc>,
    ) -> Option<OutboundMove> {
        let seat = update
            .players
            .iter()
            .position(|p| p.eq_ignore_ascii_case(&self.config.username));

        let Some(seat) = seat else {
            self.pair
                .apply_incremental_moves(&update.moves, BoardIndex::Partner);
            self.record_hands(BoardIndex::Partner, update);
            if update.status == GameStatus::Finished {
                debug!("partner game finished");
            }
            return None;
        };

        self.ply = update.seq;
        self.side_to_move = if update.seq % 2 == 0 {
            Color::Light
        } else {
            Color::Dark
        };
        self.our_color = Some(if seat == 0 { Color::Light } else { Color::Dark });
        self.opponent = update.players.get(1 - seat.min(1)).cloned();

        if update.status == GameStatus::Starting {
            self.playing = true;
        }
        let changed = self
            .pair
            .apply_incremental_moves(&update.moves, BoardIndex::Own)
            .is_some();
        if changed {
            self.playing = true;
        }
        self.record_hands(BoardIndex::Own, update);

        if update.status == GameStatus::Finished {
            debug!("game finished at ply {}", self.ply);
            self.playing = false;
            self.turn_ply = None;
            self.sent_ply = None;
            return None;
        }

        if !(self.playing && self.is_our_turn()) {
            return None;
        }
        if changed || self.turn_ply != Some(self.ply) {
            self.turn_started = Some(now);
            self.turn_ply = Some(self.ply);
        }
        self.resolve_turn(now)
    }

    fn resolve_turn(&mut self, now: DateTime<Utc>) -> Option<OutboundMove> {
        if self.sent_ply == Some(self.ply) {
            return None;
        }
        let mv = self.premoves.resolve(&mut self.pair, self.oracle.as_ref())?;
        match self.send(&mv, now) {
            Ok(out) => Some(out),
            Err(e) => {
                warn!("could not encode premove {mv}: {e}");
                None
            }
        }
    }

    fn record_hands(&mut self, board: BoardIndex, update: &GameUpdate) {
        for (color, letters) in [
            (Color::Light, &update.white_hand),
            (Color::Dark, &update.black_hand),
        ] {
            let seen = &mut self.last_hands[board.index()][color.index()];
            if seen == letters {
                continue;
            }
            seen.clone_from(letters);
            match board {
                BoardIndex::Own => self.pair.set_hand(color, letters),
                BoardIndex::Partner => self.pair.set_partner_hand(color, letters),
            }
        }
    }

    /// Package `mv` for sending and hand the turn to the opponent.
    ///
    /// The clock is the base time less what has elapsed since our turn began.
    pub fn send(&mut self, mv: &str, now: DateTime<Utc>) -> BughouseResult<OutboundMove> {
        let encoded = transport::encode(mv)?;
        let elapsed = self
            .turn_started
            .map_or(0, |start| (now - start).num_milliseconds());
        let clock_ms = self.config.base_time_deciseconds * 100 - elapsed;

        self.side_to_move = self.side_to_move.opposite();
        self.sent_ply = Some(self.ply);
        debug!("sending {mv} at ply {} with {clock_ms}ms left", self.ply);
        Ok(OutboundMove {
            mv: mv.to_owned(),
            encoded,
            ply: self.ply,
            clock_ms,
            clock_deciseconds: clock_ms.div_euclid(100),
        })
    }

    pub fn push_premove(&mut self, mv: &str) -> BughouseResult<Option<OutboundMove>> {
        self.push_premove_at(mv, Utc::now())
    }

    /// Queue a move; drops of pieces we lack become predrops. When it is
    /// already our turn and nothing was sent this ply, the queue is resolved
    /// straight away and the move to send is returned.
    pub fn push_premove_at(
        &mut self,
        mv: &str,
        now: DateTime<Utc>,
    ) -> BughouseResult<Option<OutboundMove>> {
        let side = self.our_color.unwrap_or(Color::Light);
        let predrop = is_predrop(&self.pair, mv, side);
        self.premoves.push(mv, predrop)?;

        if !(self.playing && self.is_our_turn()) {
            return Ok(None);
        }
        Ok(self.resolve_turn(now))
    }

    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        scramble(&mut self.pair, self.oracle.as_ref(), rng)
    }
}

/// A session behind one lock, so queueing a premove can never interleave with
/// an update resolving the queue.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<MatchSession>>,
}

impl SharedSession {
    pub fn new(session: MatchSession) -> Self {
        Self {
            inner: Arc::new(Mutex::new(session)),
        }
    }

    pub fn handle_update(&self, update: &GameUpdate) -> Option<OutboundMove> {
        self.inner.lock().handle_update(update)
    }

    pub fn push_premove(&self, mv: &str) -> BughouseResult<Option<OutboundMove>> {
        self.inner.lock().push_premove(mv)
    }

    pub fn lock(&self) -> MutexGuard<'_, MatchSession> {
        self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::{GameStatus, GameUpdate, MatchSession, SessionConfig, SharedSession};
    use crate::bughouse::board_pair::BoardIndex;
    use crate::game_state::chess_types::Color;
    use chrono::{Duration, TimeZone, Utc};

    fn config() -> SessionConfig {
        SessionConfig {
            username: "Plum".to_owned(),
            ..SessionConfig::default()
        }
    }

    fn update(players: [&str; 2], moves: &str, seq: u32) -> GameUpdate {
        GameUpdate {
            players: players.iter().map(|p| (*p).to_owned()).collect(),
            moves: moves.to_owned(),
            seq,
            ..GameUpdate::default()
        }
    }

    #[test]
    fn seat_picks_board_and_color() {
        let mut session = MatchSession::new(config());
        session.handle_update(&update(["alice", "plum"], "mC", 1));
        assert_eq!(session.our_color(), Some(Color::Dark));
        assert_eq!(session.opponent(), Some("alice"));
        assert_eq!(session.side_to_move(), Color::Dark);
        assert!(session.is_our_turn());
        assert!(session.is_playing());
        assert_eq!(session.pair().applied_tokens(BoardIndex::Own), 1);

        session.handle_update(&update(["bob", "carol"], "mC0K", 2));
        assert_eq!(session.pair().applied_tokens(BoardIndex::Partner), 2);
        assert_eq!(session.ply(), 1);
    }

    #[test]
    fn hands_are_applied_per_board() {
        let mut session = MatchSession::new(config());
        let mut own = update(["PLUM", "alice"], "", 0);
        own.white_hand = "NP".to_owned();
        session.handle_update(&own);

        let mut partner = update(["bob", "carol"], "", 0);
        partner.black_hand = "q".to_owned();
        session.handle_update(&partner);

        assert_eq!(
            session.position_key(),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[PN] w KQkq - 0 1"
        );
        assert!(session
            .pair()
            .hand(BoardIndex::Partner, Color::Dark)
            .contains(crate::game_state::chess_types::PieceKind::Queen));
    }

    #[test]
    fn premove_is_sent_when_turn_arrives() {
        let mut session = MatchSession::new(config());
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("valid time");
        let mut first = update(["alice", "plum"], "", 0);
        first.status = GameStatus::Starting;
        assert_eq!(session.handle_update_at(&first, start), None);

        session.push_premove("e7e5").expect("queue has room");
        session.push_premove("n@f6").expect("queue has room");
        assert!(session.premoves().entries().nth(1).is_some_and(|e| e.is_predrop));

        let out = session
            .handle_update_at(&update(["alice", "plum"], "mC", 1), start)
            .expect("premove should be sent");
        assert_eq!(out.mv, "e7e5");
        assert_eq!(out.encoded, "0K");
        assert_eq!(out.ply, 1);
        assert_eq!(out.clock_ms, 180_000);
        assert_eq!(out.clock_deciseconds, 1800);
        assert!(!session.is_our_turn());
        assert_eq!(session.premoves().len(), 1);
    }

    #[test]
    fn clock_counts_down_from_turn_start() {
        let mut session = MatchSession::new(config());
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("valid time");
        session.handle_update_at(&update(["plum", "alice"], "mC0K", 2), start);
        let out = session
            .send("g1f3", start + Duration::milliseconds(2_345))
            .expect("move should encode");
        assert_eq!(out.encoded, "gv");
        assert_eq!(out.clock_ms, 177_655);
        assert_eq!(out.clock_deciseconds, 1776);
        assert_eq!(session.side_to_move(), Color::Dark);
    }

    #[test]
    fn finished_status_stops_play() {
        let mut session = MatchSession::new(config());
        session.handle_update(&update(["plum", "alice"], "mC", 1));
        assert!(session.is_playing());
        session.push_premove("d2d4").expect("queue has room");

        let mut last = update(["plum", "alice"], "mC0K", 2);
        last.status = GameStatus::Finished;
        assert_eq!(session.handle_update(&last), None);
        assert!(!session.is_playing());
        assert_eq!(session.premoves().len(), 1);
    }

    #[test]
    fn shared_session_serializes_push_and_resolve() {
        let shared = SharedSession::new(MatchSession::new(config()));
        shared.handle_update(&update(["plum", "alice"], "", 0));
        shared.push_premove("e2e4").expect("queue has room");
        let worker = shared.clone();
        let handle = std::thread::spawn(move || worker.push_premove("d2d4"));
        handle
            .join()
            .expect("worker should not panic")
            .expect("queue has room");
        assert_eq!(shared.lock().premoves().len(), 2);
    }

    #[test]
    fn starting_update_plays_first_premove_as_light() {
        let mut session = MatchSession::new(config());
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("valid time");
        assert_eq!(
            session.push_premove_at("e2e4", start).expect("queue has room"),
            None
        );

        let mut first = update(["plum", "alice"], "", 0);
        first.status = GameStatus::Starting;
        let out = session
            .handle_update_at(&first, start)
            .expect("first move should be sent without a position change");
        assert_eq!(out.mv, "e2e4");
        assert_eq!(out.encoded, "mC");
        assert_eq!(out.ply, 0);
        assert!(session.premoves().is_empty());

        // A repeat of the same record must not send a second move for ply 0.
        session.push_premove("d2d4").expect("queue has room");
        assert_eq!(session.handle_update_at(&first, start), None);
        assert_eq!(session.premoves().len(), 1);
    }

    #[test]
    fn premove_pushed_on_our_turn_is_sent_at_once() {
        let mut session = MatchSession::new(config());
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).single().expect("valid time");
        let ours = update(["alice", "plum"], "mC", 1);
        assert_eq!(session.handle_update_at(&ours, start), None);
        assert!(session.is_our_turn());

        let out = session
            .push_premove_at("e7e5", start + Duration::milliseconds(1_500))
            .expect("queue has room")
            .expect("move should be sent on our turn");
        assert_eq!(out.mv, "e7e5");
        assert_eq!(out.clock_ms, 178_500);
        assert!(session.premoves().is_empty());

        assert_eq!(session.handle_update_at(&ours, start), None);
        session.push_premove("d7d5").expect("queue has room");
        assert_eq!(session.premoves().len(), 1);
    }

    #[test]
    fn illegal_push_on_our_turn_stays_queued_as_predrop() {
        let mut session = MatchSession::new(config());
        session.handle_update(&update(["alice", "plum"], "mC", 1));
        assert_eq!(
            session.push_premove("n@f6").expect("queue has room"),
            None
        );
        assert!(session.premoves().entries().all(|e| e.is_predrop));
    }

    #[test]
    fn status_words_map_from_the_wire() {
        assert_eq!(GameStatus::from_wire("starting"), GameStatus::Starting);
        assert_eq!(GameStatus::from_wire("finished"), GameStatus::Finished);
        assert_eq!(GameStatus::from_wire("playing"), GameStatus::InProgress);
    }
}
