//! Bounded trail of past simulation snapshots
//!
//! Chart consumers read this as a growing-then-sliding window: it fills
//! to capacity, then evicts the oldest record per append (FIFO). Records
//! are immutable once appended.

use crate::hormone::HormoneBank;
use crate::vad::Vad;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default window length.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// One immutable snapshot: derived affect plus the raw hormone levels it
/// was derived from, stamped with a monotonically increasing tick index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub time: u64,
    pub arousal: f32,
    pub valence: f32,
    pub dominance: f32,
    pub emotion: String,
    pub adrenaline: f32,
    pub cortisol: f32,
    pub gaba: f32,
    pub dopamine: f32,
    pub serotonin: f32,
    pub testosterone: f32,
    pub oxytocin: f32,
}

impl HistoryRecord {
    /// Capture the current bank + derived affect under the given tick index.
    pub fn capture(time: u64, bank: &HormoneBank, vad: &Vad, emotion: String) -> Self {
        Self {
            time,
            arousal: vad.arousal,
            valence: vad.valence,
            dominance: vad.dominance,
            emotion,
            adrenaline: bank.adrenaline.current,
            cortisol: bank.cortisol.current,
            gaba: bank.gaba.current,
            dopamine: bank.dopamine.current,
            serotonin: bank.serotonin.current,
            testosterone: bank.testosterone.current,
            oxytocin: bank.oxytocin.current,
        }
    }
}

/// Ring-buffer of records, bounded to `max_len`.
#[derive(Debug, Clone)]
pub struct History {
    records: VecDeque<HistoryRecord>,
    max_len: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl History {
    pub fn new(max_len: usize) -> Self {
        let max_len = max_len.max(1);
        Self {
            records: VecDeque::with_capacity(max_len),
            max_len,
        }
    }

    /// Append, evicting the oldest record when at capacity.
    pub fn push(&mut self, record: HistoryRecord) {
        if self.records.len() >= self.max_len {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Tick index for the next record: last + 1, or 0 on a fresh buffer.
    pub fn next_time(&self) -> u64 {
        self.records.back().map_or(0, |r| r.time + 1)
    }

    pub fn last(&self) -> Option<&HistoryRecord> {
        self.records.back()
    }

    pub fn oldest(&self) -> Option<&HistoryRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryRecord> {
        self.records.iter()
    }

    /// Owned copy for external consumers (charts, CLI output).
    pub fn to_vec(&self) -> Vec<HistoryRecord> {
        self.records.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
