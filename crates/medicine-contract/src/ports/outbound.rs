//! # Outbound Ports (Driven Ports)
//!
//! The ledger capabilities the contract needs from its host platform.
//!
//! Production: the platform's transaction context (see `chaincode-runtime`)
//! Testing: `InMemoryLedger`, `FaultyLedger`

use crate::domain::errors::LedgerError;

/// A single world state entry yielded by a range scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Cursor over a key range.
///
/// Implementations may hold platform resources; `close` must be called
/// exactly once when iteration ends. Use `RangeScan` rather than driving
/// this trait by hand.
pub trait StateIterator {
    /// Whether another entry is available.
    fn has_next(&self) -> bool;

    /// Advance and return the next entry.
    fn next_entry(&mut self) -> Result<KeyValue, LedgerError>;

    /// Release the cursor.
    fn close(&mut self) -> Result<(), LedgerError>;
}

/// Key-value view of world state for one transaction.
pub trait LedgerContext {
    /// Read the value at `key`. `Ok(None)` means the key is absent.
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError>;

    /// Write `value` at `key`, replacing any previous value.
    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError>;

    /// Iterate keys in `[start_key, end_key)` in the ledger's native order.
    ///
    /// An empty `start_key` or `end_key` leaves that side unbounded.
    fn get_state_by_range<'a>(
        &'a self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateIterator + 'a>, LedgerError>;
}

/// Whether `key` falls inside `[start_key, end_key)`, with empty bounds open.
pub fn key_in_range(key: &str, start_key: &str, end_key: &str) -> bool {
    (start_key.is_empty() || key >= start_key) && (end_key.is_empty() || key < end_key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_range_contains_everything() {
        assert!(key_in_range("", "", ""));
        assert!(key_in_range("MEDICINE0", "", ""));
    }

    #[test]
    fn test_range_end_is_exclusive() {
        assert!(key_in_range("A", "A", "B"));
        assert!(!key_in_range("B", "A", "B"));
        assert!(key_in_range("Azz", "", "B"));
        assert!(!key_in_range("0", "A", ""));
    }
}
