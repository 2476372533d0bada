//! # Contract Configuration
//!
//! Fixture data and the two policy switches the contract exposes. Defaults
//! reproduce the behaviour existing deployments rely on, except for decode
//! handling which defaults to `Strict`.

use crate::domain::entities::Medicine;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default key prefix for seeded records (`MEDICINE0`, `MEDICINE1`, ...).
pub const DEFAULT_SEED_PREFIX: &str = "MEDICINE";

/// Configuration for `MedicineLedgerContract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Records written by `InitLedger`.
    pub seed: SeedData,

    /// Whether `CreateMedicine` may replace an existing record (default: true).
    ///
    /// When `false`, creating over an existing key fails with `AlreadyExists`.
    pub allow_overwrite: bool,

    /// How stored values that fail to decode are treated (default: `Strict`).
    pub decode_policy: DecodePolicy,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            seed: SeedData::default(),
            allow_overwrite: true,
            decode_policy: DecodePolicy::Strict,
        }
    }
}

impl ContractConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the seed data.
    pub fn with_seed(mut self, seed: SeedData) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable overwriting on create.
    pub fn with_allow_overwrite(mut self, allow: bool) -> Self {
        self.allow_overwrite = allow;
        self
    }

    /// Set the decode policy.
    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }
}

/// Records written by `InitLedger`, keyed `<key_prefix><index>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default = "default_seed_prefix")]
    pub key_prefix: String,
    pub records: Vec<Medicine>,
}

fn default_seed_prefix() -> String {
    DEFAULT_SEED_PREFIX.to_string()
}

impl SeedData {
    pub fn new(key_prefix: impl Into<String>, records: Vec<Medicine>) -> Self {
        Self {
            key_prefix: key_prefix.into(),
            records,
        }
    }

    /// `(key, record)` pairs in seeding order.
    pub fn entries(&self) -> impl Iterator<Item = (String, &Medicine)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(move |(index, record)| (format!("{}{}", self.key_prefix, index), record))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for SeedData {
    fn default() -> Self {
        Self {
            key_prefix: default_seed_prefix(),
            records: vec![
                Medicine::new("Amoxicilina", "250mg/5ml", "Jarabe", "31/12/2023", "100", "1234567"),
                Medicine::new("Ibuprofeno", "400mg", "Tableta", "31/12/2024", "100", "1234567"),
            ],
        }
    }
}

/// Handling of stored values that are not a well-formed `Medicine`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Surface `ContractError::MalformedRecord`.
    #[default]
    Strict,
    /// Keep whichever string members can be recovered and blank the rest.
    Lenient,
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodePolicy::Strict => write!(f, "strict"),
            DecodePolicy::Lenient => write!(f, "lenient"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown decode policy '{0}' (expected 'strict' or 'lenient')")]
pub struct UnknownDecodePolicy(pub String);

impl FromStr for DecodePolicy {
    type Err = UnknownDecodePolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(DecodePolicy::Strict),
            "lenient" => Ok(DecodePolicy::Lenient),
            _ => Err(UnknownDecodePolicy(s.to_string())),
        }
    }
}
