//! # Domain Layer
//!
//! Pure domain types for the medicine ledger. Nothing in here touches the
//! ledger context.

pub mod codec;
pub mod config;
pub mod entities;
pub mod errors;

pub use codec::*;
pub use config::*;
pub use entities::*;
pub use errors::*;
