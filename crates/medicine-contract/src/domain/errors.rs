//! # Domain Errors
//!
//! `LedgerError` is what a ledger context reports. `ContractError` is what
//! the contract reports to its caller: storage failures keep the ledger
//! error as their source and say which kind of access failed.

use thiserror::Error;

/// Failures reported by a `LedgerContext` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The backing store could not serve the request.
    #[error("storage error: {message}")]
    Storage { message: String },

    /// A range iterator failed while advancing.
    #[error("iterator error: {message}")]
    Iterator { message: String },

    /// `next` was called on an iterator that was already closed.
    #[error("iterator already closed")]
    IteratorClosed,
}

impl LedgerError {
    pub fn storage(message: impl Into<String>) -> Self {
        LedgerError::Storage {
            message: message.into(),
        }
    }

    pub fn iterator(message: impl Into<String>) -> Self {
        LedgerError::Iterator {
            message: message.into(),
        }
    }
}

/// Failures surfaced by contract operations.
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("failed to read from world state: {0}")]
    ReadFailure(#[source] LedgerError),

    #[error("failed to put to world state: {0}")]
    WriteFailure(#[source] LedgerError),

    #[error("failed to scan world state: {0}")]
    ScanFailure(#[source] LedgerError),

    #[error("{key} does not exist")]
    NotFound { key: String },

    /// Only raised when overwrite protection is configured.
    #[error("{key} already exists")]
    AlreadyExists { key: String },

    #[error("malformed record at {key}: {source}")]
    MalformedRecord {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode medicine: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ContractError {
    /// True for the not-found condition, as opposed to a storage failure.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ContractError::NotFound { .. })
    }

    /// True when the underlying ledger failed.
    #[must_use]
    pub fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            ContractError::ReadFailure(_)
                | ContractError::WriteFailure(_)
                | ContractError::ScanFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_names_key() {
        let err = ContractError::NotFound {
            key: "MEDICINE9".to_string(),
        };
        assert_eq!(err.to_string(), "MEDICINE9 does not exist");
        assert!(err.is_not_found());
        assert!(!err.is_storage_failure());
    }

    #[test]
    fn test_read_failure_keeps_ledger_message() {
        let err = ContractError::ReadFailure(LedgerError::storage("disk offline"));
        assert_eq!(
            err.to_string(),
            "failed to read from world state: storage error: disk offline"
        );
        assert!(err.is_storage_failure());
    }
}
