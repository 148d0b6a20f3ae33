// Bounded newest-first window of sensor records
use std::collections::VecDeque;

use super::telemetry::SensorRecord;

pub const WINDOW_SIZE: usize = 30;

/// The most recent records, newest first, deduplicated against the head.
///
/// History is loaded once with [`RollingWindow::seed`]; every later poll only
/// [`RollingWindow::prepend`]s the single newest record.
#[derive(Debug, Clone)]
pub struct RollingWindow {
    records: VecDeque<SensorRecord>,
    capacity: usize,
}

impl Default for RollingWindow {
    fn default() -> Self {
        Self::new(WINDOW_SIZE)
    }
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the window with `records` (already newest first).
    pub fn seed(&mut self, records: Vec<SensorRecord>) {
        self.records = records.into_iter().take(self.capacity).collect();
        tracing::debug!("Rolling window seeded with {} records", self.records.len());
    }

    /// Insert `record` at the head unless it repeats the current head.
    ///
    /// Returns `false` when the record was dropped as a duplicate.
    pub fn prepend(&mut self, record: SensorRecord) -> bool {
        if self
            .records
            .front()
            .is_some_and(|head| head.timestamp == record.timestamp)
        {
            tracing::debug!("Dropping duplicate record {}", record.timestamp);
            return false;
        }

        self.records.push_front(record);
        self.records.truncate(self.capacity);
        true
    }

    pub fn snapshot(&self) -> Vec<SensorRecord> {
        self.records.iter().cloned().collect()
    }

    #[cfg(test)]
    pub fn head(&self) -> Option<&SensorRecord> {
        self.records.front()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
