//! Queued premoves and predrops, resolved when our turn arrives.

use std::collections::VecDeque;

use log::{debug, warn};

use crate::bughouse::board_pair::BoardPair;
use crate::bughouse::legality::is_legal;
use crate::errors::{BughouseError, BughouseResult};
use crate::rules::legal_move_generator::RulesOracle;

pub const DEFAULT_PREMOVE_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueEntry {
    pub mv: String,
    pub is_predrop: bool,
}

/// Bounded FIFO of moves. A move and its predrop flag live in one entry, so
/// they can never fall out of step.
#[derive(Debug, Clone)]
pub struct PremoveQueue {
    entries: VecDeque<QueueEntry>,
    capacity: usize,
}

impl Default for PremoveQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_PREMOVE_CAPACITY)
    }
}

impl PremoveQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn entries(&self) -> impl Iterator<Item = &QueueEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a move. A full queue rejects the push and keeps what it has.
    pub fn push(&mut self, mv: impl Into<String>, is_predrop: bool) -> BughouseResult<()> {
        let mv = mv.into();
        if self.entries.len() >= self.capacity {
            warn!("premove queue full, dropping {mv}");
            return Err(BughouseError::PremoveQueueFull {
                capacity: self.capacity,
            });
        }
        self.entries.push_back(QueueEntry { mv, is_predrop });
        Ok(())
    }

    /// Pick the move to play this turn, if any.
    ///
    /// With a predrop at the head, the first predrop that has become legal is
    /// played and everything in front of it, itself included, is removed; if
    /// none is legal the queue is left alone. Otherwise entries are popped in
    /// order: a legal one is played, an illegal premove is discarded, and an
    /// illegal predrop is put back at the head and stops the scan.
    pub fn resolve(&mut self, pair: &mut BoardPair, oracle: &dyn RulesOracle) -> Option<String> {
        let head_is_predrop = self.entries.front()?.is_predrop;

        if head_is_predrop {
            let hit = self
                .entries
                .iter()
                .position(|entry| entry.is_predrop && is_legal(pair, oracle, &entry.mv))?;
            let satisfied = self.entries.drain(..=hit).last()?;
            debug!("predrop {} satisfied, flushed {} entries", satisfied.mv, hit + 1);
            return Some(satisfied.mv);
        }

        while let Some(entry) = self.entries.pop_front() {
            if is_legal(pair, oracle, &entry.mv) {
                debug!("playing premove {}", entry.mv);
                return Some(entry.mv);
            }
            if entry.is_predrop {
                self.entries.push_front(entry);
                return None;
            }
            debug!("discarding stale premove {}", entry.mv);
        }
        None
    }
}
