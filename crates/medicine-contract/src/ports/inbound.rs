//! # Inbound Ports (Driving Ports)
//!
//! The five transaction entry points of the medicine ledger.

use crate::domain::entities::{Medicine, QueryResult};
use crate::domain::errors::ContractError;
use crate::ports::outbound::LedgerContext;

/// Medicine ledger operations.
///
/// Every call receives the context of the transaction it runs in. The
/// implementation keeps no state between calls.
pub trait MedicineLedgerApi {
    /// Write the configured seed records.
    ///
    /// Stops at the first failed write; earlier writes are left to the
    /// platform's transaction handling.
    fn init_ledger<C: LedgerContext + ?Sized>(&self, ctx: &mut C) -> Result<(), ContractError>;

    /// Store `medicine` under `key`.
    fn create_medicine<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &str,
        medicine: Medicine,
    ) -> Result<(), ContractError>;

    /// Read the record at `key`.
    ///
    /// # Errors
    ///
    /// * `ReadFailure` - the ledger could not be read
    /// * `NotFound` - nothing is stored at `key`
    /// * `MalformedRecord` - the stored value is not a medicine (strict decoding only)
    fn query_medicine<C: LedgerContext + ?Sized>(
        &self,
        ctx: &C,
        key: &str,
    ) -> Result<Medicine, ContractError>;

    /// List every record in ledger key order.
    fn query_all_medicines<C: LedgerContext + ?Sized>(
        &self,
        ctx: &C,
    ) -> Result<Vec<QueryResult>, ContractError>;

    /// Replace the quantity of the record at `key`, keeping every other field.
    fn change_medicine_quantity<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &str,
        new_quantity: &str,
    ) -> Result<(), ContractError>;
}
