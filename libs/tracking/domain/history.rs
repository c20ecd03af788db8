//! Recent-searches ledger
//!
//! Bounded, deduplicated-by-order-id log of past lookups. The first snapshot
//! seen for an order is kept; later lookups of the same order neither add a
//! duplicate nor refresh the entry. Membership is a set lookup; eviction
//! follows insertion order.

use chrono::{DateTime, Utc};
use std::collections::{HashSet, VecDeque};
use swifttrack_client::OrderStatusSnapshot;

/// Default number of entries kept
pub const MAX_HISTORY_ENTRIES: usize = 5;

/// A snapshot plus when the user looked it up
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub snapshot: OrderStatusSnapshot,
    pub searched_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(snapshot: OrderStatusSnapshot, searched_at: DateTime<Utc>) -> Self {
        Self {
            snapshot,
            searched_at,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.snapshot.order_id
    }
}

#[derive(Debug, Clone)]
pub struct HistoryLedger {
    capacity: usize,
    ids: HashSet<String>,
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_ENTRIES)
    }

    /// A capacity of zero is treated as one
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            ids: HashSet::with_capacity(capacity + 1),
            entries: VecDeque::with_capacity(capacity + 1),
        }
    }

    /// Append an entry unless its order is already present
    ///
    /// Returns true if the entry was inserted.
    pub fn record(&mut self, entry: HistoryEntry) -> bool {
        if self.ids.contains(entry.order_id()) {
            return false;
        }

        self.ids.insert(entry.order_id().to_string());
        self.entries.push_back(entry);

        while self.entries.len() > self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                self.ids.remove(evicted.order_id());
            }
        }

        true
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.entries.clear();
    }

    /// Entries, oldest first
    pub fn list(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, order_id: &str) -> bool {
        self.ids.contains(order_id)
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

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::new()
    }
}
