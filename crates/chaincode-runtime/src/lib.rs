//! # Chaincode Runtime
//!
//! Hosts `medicine-contract` the way a platform peer would.
//!
//! ## Modular Structure
//!
//! - `config` - environment-driven runtime configuration
//! - `state/` - committed world state (in-memory and file-backed)
//! - `transaction` - per-invocation `LedgerContext` with a buffered write set
//! - `runtime` - executes invocations and serves the line-delimited JSON loop
//!
//! ## Wire Format
//!
//! One request per input line, one response per output line:
//!
//! ```text
//! → {"function":"QueryMedicine","args":["MEDICINE0"]}
//! ← {"tx_id":"…","status":200,"payload":{"name":"Amoxicilina",…}}
//! ```

pub mod config;
pub mod runtime;
pub mod state;
pub mod transaction;

pub use config::{ConfigError, RuntimeConfig};
pub use runtime::{
    serve, ChaincodeRuntime, InvocationRequest, InvocationResponse, RuntimeStats,
    STATUS_BAD_REQUEST, STATUS_ERROR, STATUS_OK,
};
pub use state::{FileBackedWorldState, MemoryWorldState, StoreError, WorldState, WriteSet};
pub use transaction::TransactionContext;
