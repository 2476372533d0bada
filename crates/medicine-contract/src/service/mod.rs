//! # Medicine Ledger Contract
//!
//! The application service implementing `MedicineLedgerApi`.
//!
//! ## Architecture
//!
//! This service:
//! 1. Translates each operation into `get_state` / `put_state` / range-scan calls
//! 2. Encodes and decodes `Medicine` values as JSON
//! 3. Holds configuration only; all state lives behind the injected `LedgerContext`
//!
//! Concurrency control between transactions touching the same key is the
//! platform's job. `change_medicine_quantity` is a plain read-modify-write.


use crate::adapters::RangeScan;
use crate::domain::codec::{decode_medicine, encode_medicine};
use crate::domain::config::ContractConfig;
use crate::domain::entities::{Medicine, QueryResult};
use crate::domain::errors::ContractError;
use crate::ports::inbound::MedicineLedgerApi;
use crate::ports::outbound::LedgerContext;
use tracing::{debug, info, instrument};

/// Stateless façade over the ledger context of the current transaction.
#[derive(Debug, Clone, Default)]
pub struct MedicineLedgerContract {
    config: ContractConfig,
}

impl MedicineLedgerContract {
    pub fn new(config: ContractConfig) -> Self {
        Self { config }
    }

    fn write_medicine<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &str,
        medicine: &Medicine,
    ) -> Result<(), ContractError> {
        let bytes = encode_medicine(medicine)?;
        ctx.put_state(key, &bytes)
            .map_err(ContractError::WriteFailure)
    }
}

impl MedicineLedgerApi for MedicineLedgerContract {
    #[instrument(skip(self, ctx))]
    fn init_ledger<C: LedgerContext + ?Sized>(&self, ctx: &mut C) -> Result<(), ContractError> {
        for (key, medicine) in self.config.seed.entries() {
            self.write_medicine(ctx, &key, medicine)?;
            debug!(key = %key, name = %medicine.name, "Seeded medicine");
        }
        info!(records = self.config.seed.len(), "Ledger initialized");
        Ok(())
    }

    #[instrument(skip(self, ctx, medicine))]
    fn create_medicine<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &str,
        medicine: Medicine,
    ) -> Result<(), ContractError> {
        if !self.config.allow_overwrite {
            let existing = ctx.get_state(key).map_err(ContractError::ReadFailure)?;
            if existing.is_some() {
                return Err(ContractError::AlreadyExists {
                    key: key.to_string(),
                });
            }
        }

        self.write_medicine(ctx, key, &medicine)?;
        debug!(name = %medicine.name, "Medicine stored");
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    fn query_medicine<C: LedgerContext + ?Sized>(
        &self,
        ctx: &C,
        key: &str,
    ) -> Result<Medicine, ContractError> {
        let bytes = ctx
            .get_state(key)
            .map_err(ContractError::ReadFailure)?
            .ok_or_else(|| ContractError::NotFound {
                key: key.to_string(),
            })?;

        decode_medicine(key, &bytes, self.config.decode_policy)
    }

    #[instrument(skip(self, ctx))]
    fn query_all_medicines<C: LedgerContext + ?Sized>(
        &self,
        ctx: &C,
    ) -> Result<Vec<QueryResult>, ContractError> {
        let mut scan = RangeScan::open(ctx, "", "").map_err(ContractError::ScanFailure)?;

        let mut results = Vec::new();
        for entry in scan.by_ref() {
            let entry = entry.map_err(ContractError::ScanFailure)?;
            let record = decode_medicine(&entry.key, &entry.value, self.config.decode_policy)?;
            results.push(QueryResult {
                key: entry.key,
                record,
            });
        }
        scan.close().map_err(ContractError::ScanFailure)?;

        debug!(count = results.len(), "Listed medicines");
        Ok(results)
    }

    #[instrument(skip(self, ctx))]
    fn change_medicine_quantity<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        key: &str,
        new_quantity: &str,
    ) -> Result<(), ContractError> {
        let medicine = self.query_medicine(&*ctx, key)?;
        let previous = medicine.quantity.clone();

        self.write_medicine(ctx, key, &medicine.with_quantity(new_quantity))?;
        debug!(%previous, "Quantity changed");
        Ok(())
    }
}
