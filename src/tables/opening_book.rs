//! Opening-book collaborator keyed by hand-aware position strings.
//!
//! Books record how often each move was played from a position and suggest
//! the most-used one. Keys come from `BoardPair::position_with_hands`, so the
//! same placement with different hands is a different entry.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;

pub trait OpeningBook {
    /// Most-used move recorded for `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Record one more use of `mv` from `key`.
    fn put(&mut self, key: &str, mv: &str);
}

/// In-memory usage counts. Moves are kept sorted, so a tie on count goes to
/// the lexicographically greatest move.
#[derive(Debug, Clone, Default)]
pub struct UsageCountBook {
    by_key: HashMap<String, BTreeMap<String, u32>>,
}

impl UsageCountBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import `key<TAB>move[<TAB>count]` rows. A missing or unparsable count
    /// counts as one use; repeated rows accumulate.
    pub fn from_tsv_str(tsv: &str) -> Result<Self, String> {
        let mut book = Self::new();
        for (line_no, line) in tsv.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let (key, mv) = match fields.as_slice() {
                [key, mv, ..] if !key.trim().is_empty() && !mv.trim().is_empty() => {
                    (key.trim(), mv.trim())
                }
                _ => return Err(format!("book row {} needs a key and a move", line_no + 1)),
            };
            let count = fields
                .get(2)
                .and_then(|c| c.trim().parse::<u32>().ok())
                .unwrap_or(1);
            book.add_uses(key, mv, count);
        }
        Ok(book)
    }

    fn add_uses(&mut self, key: &str, mv: &str, count: u32) {
        let uses = self
            .by_key
            .entry(key.to_owned())
            .or_default()
            .entry(mv.to_owned())
            .or_insert(0);
        *uses = uses.saturating_add(count);
    }

    pub fn moves_for(&self, key: &str) -> Option<&BTreeMap<String, u32>> {
        self.by_key.get(key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Pick a move for `key` with probability proportional to its use count.
    pub fn choose_weighted_move<R: Rng + ?Sized>(&self, key: &str, rng: &mut R) -> Option<String> {
        let moves = self.moves_for(key)?;
        let total: u64 = moves.values().map(|&c| u64::from(c)).sum();
        if total == 0 {
            return moves.keys().next().cloned();
        }

        let mut pick = rng.random_range(0..total);
        for (mv, &count) in moves {
            let weight = u64::from(count);
            if pick < weight {
                return Some(mv.clone());
            }
            pick -= weight;
        }
        moves.keys().next_back().cloned()
    }
}

impl OpeningBook for UsageCountBook {
    fn get(&self, key: &str) -> Option<String> {
        self.moves_for(key)?
            .iter()
            .max_by_key(|&(_, count)| *count)
            .map(|(mv, _)| mv.clone())
    }

    fn put(&mut self, key: &str, mv: &str) {
        self.add_uses(key, mv, 1);
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::{OpeningBook, UsageCountBook};
    use crate::bughouse::board_pair::BoardPair;
    use crate::game_state::chess_types::Color;

    #[test]
    fn get_returns_most_used_move() {
        let mut book = UsageCountBook::new();
        let key = BoardPair::new().position_with_hands();
        assert_eq!(book.get(&key), None);

        book.put(&key, "d2d4");
        book.put(&key, "e2e4");
        book.put(&key, "e2e4");
        assert_eq!(book.get(&key).as_deref(), Some("e2e4"));
    }

    #[test]
    fn ties_go_to_the_greatest_move() {
        let mut book = UsageCountBook::new();
        book.put("k", "b1c3");
        book.put("k", "g1f3");
        book.put("k", "e2e4");
        assert_eq!(book.get("k").as_deref(), Some("g1f3"));
    }

    #[test]
    fn hands_separate_book_entries() {
        let mut book = UsageCountBook::new();
        let mut pair = BoardPair::new();
        let bare = pair.position_with_hands();
        pair.set_hand(Color::Light, "n");
        let with_knight = pair.position_with_hands();
        assert_ne!(bare, with_knight);

        book.put(&with_knight, "n@e5");
        assert_eq!(book.get(&bare), None);
        assert_eq!(book.get(&with_knight).as_deref(), Some("n@e5"));
    }

    #[test]
    fn tsv_import_accumulates_counts() {
        let tsv = "start\te2e4\t4\nstart\td2d4\nstart\td2d4\t2\n\nother\tn@f3\tx\n";
        let book = UsageCountBook::from_tsv_str(tsv).expect("book should parse");
        assert_eq!(book.len(), 2);
        assert_eq!(book.moves_for("start").and_then(|m| m.get("d2d4")), Some(&3));
        assert_eq!(book.moves_for("other").and_then(|m| m.get("n@f3")), Some(&1));
        assert_eq!(book.get("start").as_deref(), Some("e2e4"));

        assert!(UsageCountBook::from_tsv_str("only-a-key\n").is_err());
    }

    #[test]
    fn weighted_choice_stays_within_recorded_moves() {
        let tsv = "k\te2e4\t4\nk\td2d4\t1\n";
        let book = UsageCountBook::from_tsv_str(tsv).expect("book should parse");
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..32 {
            let mv = book
                .choose_weighted_move("k", &mut rng)
                .expect("book should choose");
            assert!(mv == "e2e4" || mv == "d2d4");
        }
        assert_eq!(book.choose_weighted_move("missing", &mut rng), None);
    }
}
