use crate::domain::errors::LedgerError;
use crate::ports::outbound::{KeyValue, LedgerContext, StateIterator};
use tracing::warn;

/// Owns a `StateIterator` for the duration of one scan.
///
/// The cursor is closed when the scan is dropped, whichever way the
/// caller leaves. Call `close` to observe the close result instead.
pub struct RangeScan<'a> {
    cursor: Option<Box<dyn StateIterator + 'a>>,
}

impl<'a> RangeScan<'a> {
    pub fn open<C: LedgerContext + ?Sized>(
        ctx: &'a C,
        start_key: &str,
        end_key: &str,
    ) -> Result<Self, LedgerError> {
        let cursor = ctx.get_state_by_range(start_key, end_key)?;
        Ok(Self {
            cursor: Some(cursor),
        })
    }

    /// Close the cursor now and report the outcome.
    pub fn close(mut self) -> Result<(), LedgerError> {
        match self.cursor.take() {
            Some(mut cursor) => cursor.close(),
            None => Ok(()),
        }
    }
}

impl Iterator for RangeScan<'_> {
    type Item = Result<KeyValue, LedgerError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor.as_mut()?;
        if !cursor.has_next() {
            return None;
        }
        Some(cursor.next_entry())
    }
}

impl Drop for RangeScan<'_> {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.cursor.take() {
            if let Err(error) = cursor.close() {
                warn!(%error, "Failed to close range iterator");
            }
        }
    }
}
