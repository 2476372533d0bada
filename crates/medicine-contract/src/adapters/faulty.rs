use crate::domain::errors::LedgerError;
use crate::ports::outbound::{KeyValue, LedgerContext, StateIterator};

/// Wraps a ledger and injects storage failures.
///
/// Used to exercise the contract's error paths without a real platform.
#[derive(Debug, Default)]
pub struct FaultyLedger<L> {
    inner: L,
    fail_reads: bool,
    fail_scan_open: bool,
    fail_scan_at: Option<usize>,
    writes_before_failure: Option<usize>,
}

impl<L> FaultyLedger<L> {
    pub fn new(inner: L) -> Self {
        Self {
            inner,
            fail_reads: false,
            fail_scan_open: false,
            fail_scan_at: None,
            writes_before_failure: None,
        }
    }

    /// Every `get_state` fails.
    pub fn with_failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Opening a range scan fails.
    pub fn with_failing_scan(mut self) -> Self {
        self.fail_scan_open = true;
        self
    }

    /// Range cursors fail when asked for entry number `index` (zero-based).
    pub fn with_scan_failure_at(mut self, index: usize) -> Self {
        self.fail_scan_at = Some(index);
        self
    }

    /// The first `count` writes succeed, every later one fails.
    pub fn with_write_failure_after(mut self, count: usize) -> Self {
        self.writes_before_failure = Some(count);
        self
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }
}

impl<L: LedgerContext> LedgerContext for FaultyLedger<L> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        if self.fail_reads {
            return Err(LedgerError::storage(format!("injected read failure for {key}")));
        }
        self.inner.get_state(key)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        match self.writes_before_failure.as_mut() {
            Some(0) => Err(LedgerError::storage(format!(
                "injected write failure for {key}"
            ))),
            Some(remaining) => {
                *remaining -= 1;
                self.inner.put_state(key, value)
            }
            None => self.inner.put_state(key, value),
        }
    }

    fn get_state_by_range<'a>(
        &'a self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateIterator + 'a>, LedgerError> {
        if self.fail_scan_open {
            return Err(LedgerError::storage("injected scan failure"));
        }
        let cursor = self.inner.get_state_by_range(start_key, end_key)?;
        match self.fail_scan_at {
            Some(index) => Ok(Box::new(FaultyCursor {
                inner: cursor,
                remaining: index,
            })),
            None => Ok(cursor),
        }
    }
}

struct FaultyCursor<'a> {
    inner: Box<dyn StateIterator + 'a>,
    remaining: usize,
}

impl StateIterator for FaultyCursor<'_> {
    fn has_next(&self) -> bool {
        self.inner.has_next()
    }

    fn next_entry(&mut self) -> Result<KeyValue, LedgerError> {
        if self.remaining == 0 {
            return Err(LedgerError::iterator("injected cursor failure"));
        }
        self.remaining -= 1;
        self.inner.next_entry()
    }

    fn close(&mut self) -> Result<(), LedgerError> {
        self.inner.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;

    #[test]
    fn test_write_failure_after_count() {
        let mut ledger = FaultyLedger::new(InMemoryLedger::new()).with_write_failure_after(1);

        assert!(ledger.put_state("a", b"1").is_ok());
        assert!(matches!(
            ledger.put_state("b", b"2"),
            Err(LedgerError::Storage { .. })
        ));
        assert_eq!(ledger.inner().len(), 1);
    }

    #[test]
    fn test_cursor_failure_still_closes_inner() {
        let mut inner = InMemoryLedger::new();
        inner.put_state("a", b"1").unwrap();
        inner.put_state("b", b"2").unwrap();
        let ledger = FaultyLedger::new(inner).with_scan_failure_at(1);

        let mut cursor = ledger.get_state_by_range("", "").unwrap();
        assert_eq!(cursor.next_entry().unwrap().key, "a");
        assert!(cursor.next_entry().is_err());
        cursor.close().unwrap();

        assert_eq!(ledger.inner().open_iterators(), 0);
    }
}
