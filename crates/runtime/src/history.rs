//! # Tick History
//!
//! Bounded FIFO of recent [`TickRecord`]s. The scheduler is the only writer;
//! observers get a shared borrow after a record has been fully appended, so a
//! half-built record is never visible. The history is never empty: it is
//! seeded with the initial record and eviction only happens on append.

use std::collections::VecDeque;

use crate::tick::TickRecord;

/// Rolling rates over the records currently held.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HistoryStats {
    /// Ticks per second of wall time across the window.
    pub frames_per_second: f64,
    /// Mean wall time between consecutive ticks.
    pub mean_frame_interval_ms: f64,
    /// Wall time between the last two ticks.
    pub instant_frame_interval_ms: f64,
    /// Physics steps per second of wall time across the window.
    pub updates_per_second: f64,
    /// Simulated time covered by the window.
    pub simulated_ms: f64,
}

#[derive(Clone, Debug)]
pub struct TickHistory {
    records: VecDeque<TickRecord>,
    capacity: usize,
}

impl TickHistory {
    /// History holding only `seed`. A zero capacity is raised to one.
    #[must_use]
    pub fn with_seed(capacity: usize, seed: TickRecord) -> Self {
        let capacity = capacity.max(1);
        let mut records = VecDeque::with_capacity(capacity);
        records.push_back(seed);
        Self { records, capacity }
    }

    /// Append a record, evicting and returning the oldest one when full.
    pub fn append(&mut self, record: TickRecord) -> Option<TickRecord> {
        let evicted = if self.records.len() >= self.capacity {
            self.records.pop_front()
        } else {
            None
        };
        self.records.push_back(record);
        evicted
    }

    /// Undo the latest [`append`](Self::append), restoring what it evicted.
    /// The seed record is never removed.
    pub fn rollback(&mut self, evicted: Option<TickRecord>) -> Option<TickRecord> {
        if self.records.len() < 2 && evicted.is_none() {
            return None;
        }
        let removed = self.records.pop_back();
        if let Some(record) = evicted {
            self.records.push_front(record);
        }
        removed
    }

    #[must_use]
    pub fn last(&self) -> &TickRecord {
        // Seeded at construction and never drained.
        &self.records[self.records.len() - 1]
    }

    /// The record before [`last`](Self::last), if there is one.
    #[must_use]
    pub fn previous(&self) -> Option<&TickRecord> {
        self.records.len().checked_sub(2).map(|i| &self.records[i])
    }

    #[must_use]
    pub fn oldest(&self) -> &TickRecord {
        &self.records[0]
    }

    /// Diagnostic access, `0` being the oldest record held.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&TickRecord> {
        self.records.get(index)
    }

    /// Oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TickRecord> + ExactSizeIterator {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Rates over the window, `None` until two records span some wall time.
    #[must_use]
    pub fn stats(&self) -> Option<HistoryStats> {
        let previous = self.previous()?;
        let last = self.last();
        let oldest = self.oldest();

        let wall_span = last.wall_ms - oldest.wall_ms;
        if wall_span <= 0.0 {
            return None;
        }

        #[allow(clippy::cast_precision_loss)]
        let frames = (self.records.len() - 1) as f64;
        #[allow(clippy::cast_precision_loss)]
        let steps = self
            .records
            .iter()
            .skip(1)
            .map(|record| record.physics_steps)
            .sum::<usize>() as f64;

        Some(HistoryStats {
            frames_per_second: frames * 1000.0 / wall_span,
            mean_frame_interval_ms: wall_span / frames,
            instant_frame_interval_ms: last.wall_ms - previous.wall_ms,
            updates_per_second: steps * 1000.0 / wall_span,
            simulated_ms: last.last_state().end_ms() - oldest.last_state().end_ms(),
        })
    }
}
