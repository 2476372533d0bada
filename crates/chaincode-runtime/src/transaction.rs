//! # Transaction Context
//!
//! The `LedgerContext` handed to the contract for one invocation.
//!
//! Reads and range scans see committed world state only; they do not
//! observe the transaction's own pending writes. Writes go to a `WriteSet`
//! that the runtime commits in one batch when the invocation succeeds.

use crate::state::{StoreError, WorldState, WriteSet};
use medicine_contract::{KeyValue, LedgerContext, LedgerError, SnapshotIterator, StateIterator};
use uuid::Uuid;

pub struct TransactionContext<'s, S: WorldState + ?Sized> {
    tx_id: Uuid,
    state: &'s S,
    write_set: WriteSet,
}

impl<'s, S: WorldState + ?Sized> TransactionContext<'s, S> {
    pub fn new(state: &'s S, tx_id: Uuid) -> Self {
        Self {
            tx_id,
            state,
            write_set: WriteSet::new(),
        }
    }

    pub fn tx_id(&self) -> Uuid {
        self.tx_id
    }

    /// Pending writes, in key order.
    pub fn write_set(&self) -> &WriteSet {
        &self.write_set
    }

    /// Finish the transaction and hand back its writes.
    pub fn into_write_set(self) -> WriteSet {
        self.write_set
    }
}

fn ledger_error(error: StoreError) -> LedgerError {
    LedgerError::storage(error.to_string())
}

fn require_key(key: &str) -> Result<(), LedgerError> {
    if key.is_empty() {
        return Err(LedgerError::storage("key must not be an empty string"));
    }
    Ok(())
}

impl<S: WorldState + ?Sized> LedgerContext for TransactionContext<'_, S> {
    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, LedgerError> {
        require_key(key)?;
        self.state.get(key).map_err(ledger_error)
    }

    fn put_state(&mut self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        require_key(key)?;
        self.write_set.put(key, value);
        Ok(())
    }

    fn get_state_by_range<'a>(
        &'a self,
        start_key: &str,
        end_key: &str,
    ) -> Result<Box<dyn StateIterator + 'a>, LedgerError> {
        let entries = self
            .state
            .range(start_key, end_key)
            .map_err(ledger_error)?
            .into_iter()
            .map(|(key, value)| KeyValue::new(key, value))
            .collect();
        Ok(Box::new(SnapshotIterator::new(entries)))
    }
}
