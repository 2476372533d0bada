use crate::domain::errors::LedgerError;
use crate::ports::outbound::{key_in_range, KeyValue, LedgerContext, StateIterator};
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counts cursors that were opened but not yet closed.
#[derive(Debug, Clone, Default)]
pub struct IteratorTracker {
    open: Arc<AtomicUsize>,
}

impl IteratorTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cursors still open.
    pub fn open_count(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    fn opened(&self) {
        self.open.fetch_add(1, Ordering::SeqCst);
    }

    fn closed(&self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Cursor over a point-in-time copy of a key range.
pub struct SnapshotIterator {
    entries: VecDeque<KeyValue>,
    tracker: Option<IteratorTracker>,
    closed: bool,
}

impl SnapshotIterator {
    /// Cursor over `entries`, which must already be in key order.
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self {
            entries: entries.into(),
            tracker: None,
            closed: false,
        }
    }

    /// Cursor that reports its open/closed state to `tracker`.
    pub fn tracked(entries: Vec<KeyValue>, tracker: &IteratorTracker) -> Self {
        tracker.opened();
        Self {
            tracker: Some(tracker.clone()),
            ..Self::new(entries)
        }
    }
}

impl StateIterator for SnapshotIterator {
    fn has_next(&self) -> bool {
        !self.closed && !self.entries.is_empty()
    }

    fn next_entry(&mut self) -> Result<KeyValue, LedgerError> {
        if self.closed {
            return Err(LedgerError::IteratorClosed);
        }
        self.entries
            .pop_front()
            .ok_or_else(|| LedgerError::iterator("no more entries"))
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        if !self.closed {
            self.closed = true;
            self.entries.clear();
            if let Some(tracker) = &self.tracker {
                tracker.closed();
            }
        }
        Ok(())
    }
}

/// In-memory ledger for unit tests and local runs.
///
/// Keys are held in a `BTreeMap`, so range scans come back in
/// lexicographic order like the platform's world state.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    data: BTreeMap<String, Vec<u8>>,
    iterators: IteratorTracker,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Stored keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    /// Range cursors handed out and not yet closed.
    pub fn open_iterators(&self) -> usize {
        self.iterators.open_count()
    }
}

impl LedgerContext for InMemoryLedger {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        Ok(self.data.get(key).cloned())
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.data.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn get_state_by_range<'a>(
        &'a self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateIterator + 'a>, LedgerError> {
        let entries = self
            .data
            .iter()
            .filter(|(key, _)| key_in_range(key, start_key, end_key))
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect();
        Ok(Box::new(SnapshotIterator::tracked(entries, &self.iterators)))
    }
}
