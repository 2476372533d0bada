//! # Ports Layer
//!
//! - `inbound.rs` - Driving port (the contract operations)
//! - `outbound.rs` - Driven port (the ledger context supplied by the platform)

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
