//! # medicine-contract
//!
//! Medicine ledger chaincode: create, read, list and re-stock medicine
//! records held in a permissioned ledger's world state.
//!
//! ## Role in System
//!
//! - **Stateless Façade**: `MedicineLedgerContract` holds configuration only.
//!   Every operation receives the ledger context of the transaction that
//!   invoked it.
//! - **Platform-Owned State**: durability, ordering and conflict detection
//!   belong to whatever implements `LedgerContext`.
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - `Medicine`, `QueryResult`, configuration, errors, record codec
//! - `ports/` - `MedicineLedgerApi` (inbound), `LedgerContext` + `StateIterator` (outbound)
//! - `adapters/` - `InMemoryLedger` and the scoped `RangeScan` guard
//! - `service/` - `MedicineLedgerContract`
//! - `handler.rs` - routes function names and string arguments to operations
//!
//! ## Invocation Flow
//!
//! ```text
//! [Platform] ──(function, args)──→ ChaincodeHandler
//!                                       │
//!                                       ↓
//!                              MedicineLedgerContract ──get/put/scan──→ LedgerContext
//!                                       │
//!                                       ↓
//!                              JSON payload | error
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use medicine_contract::{InMemoryLedger, MedicineLedgerApi, MedicineLedgerContract};
//!
//! let contract = MedicineLedgerContract::default();
//! let mut ledger = InMemoryLedger::new();
//!
//! contract.init_ledger(&mut ledger)?;
//! let medicine = contract.query_medicine(&ledger, "MEDICINE0")?;
//! ```

pub mod adapters;
pub mod domain;
pub mod handler;
pub mod ports;
pub mod service;

pub use adapters::{InMemoryLedger, IteratorTracker, RangeScan, SnapshotIterator};
pub use domain::config::{ContractConfig, DecodePolicy, SeedData, UnknownDecodePolicy};
pub use domain::entities::{Medicine, QueryResult};
pub use domain::errors::{ContractError, LedgerError};
pub use handler::{ChaincodeHandler, Function, InvocationError};
pub use ports::inbound::MedicineLedgerApi;
pub use ports::outbound::{KeyValue, LedgerContext, StateIterator};
pub use service::MedicineLedgerContract;
