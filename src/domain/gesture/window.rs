//! Fixed-capacity ring buffer of recent accepted labels.

use std::collections::VecDeque;

/// The last `capacity` samples, `None` marking a rejected or empty frame.
///
/// Length never exceeds capacity; the oldest entry is evicted on overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StabilizationWindow {
    entries: VecDeque<Option<String>>,
    capacity: usize,
}

impl StabilizationWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, entry: Option<String>) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Returns the label if the window is full and every entry is that label.
    pub fn stable_label(&self) -> Option<&str> {
        if self.entries.len() < self.capacity {
            return None;
        }
        let first = self.entries.front()?.as_deref()?;
        self.entries
            .iter()
            .all(|entry| entry.as_deref() == Some(first))
            .then_some(first)
    }

    /// Returns true if any entry holds a label.
    pub fn has_detections(&self) -> bool {
        self.entries.iter().any(Option::is_some)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
