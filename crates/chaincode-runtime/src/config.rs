//! # Runtime Configuration
//!
//! Defaults overridden by environment variables.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `MEDLEDGER_DATA_PATH` | world state file | `./data/world_state.db` |
//! | `MEDLEDGER_IN_MEMORY` | keep world state in memory only | `false` |
//! | `MEDLEDGER_ALLOW_OVERWRITE` | let `CreateMedicine` replace records | `true` |
//! | `MEDLEDGER_DECODE_POLICY` | `strict` or `lenient` | `strict` |
//! | `MEDLEDGER_SEED_FILE` | JSON seed data for `InitLedger` | built-in records |

use medicine_contract::{ContractConfig, DecodePolicy, SeedData, UnknownDecodePolicy};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const ENV_DATA_PATH: &str = "MEDLEDGER_DATA_PATH";
pub const ENV_IN_MEMORY: &str = "MEDLEDGER_IN_MEMORY";
pub const ENV_ALLOW_OVERWRITE: &str = "MEDLEDGER_ALLOW_OVERWRITE";
pub const ENV_DECODE_POLICY: &str = "MEDLEDGER_DECODE_POLICY";
pub const ENV_SEED_FILE: &str = "MEDLEDGER_SEED_FILE";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{variable} must be true/false/1/0, got '{value}'")]
    InvalidBool { variable: &'static str, value: String },

    #[error(transparent)]
    DecodePolicy(#[from] UnknownDecodePolicy),

    #[error("failed to read seed file {}: {source}", .path.display())]
    SeedFileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed seed file {}: {source}", .path.display())]
    SeedFileParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// World state file.
    pub data_path: PathBuf,
    /// Use `MemoryWorldState` instead of the file.
    pub in_memory: bool,
    /// Passed through to `ContractConfig::allow_overwrite`.
    pub allow_overwrite: bool,
    /// Passed through to `ContractConfig::decode_policy`.
    pub decode_policy: DecodePolicy,
    /// Seed data file; the built-in seed is used when unset.
    pub seed_file: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("./data/world_state.db"),
            in_memory: false,
            allow_overwrite: true,
            decode_policy: DecodePolicy::Strict,
            seed_file: None,
        }
    }
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = lookup(ENV_DATA_PATH) {
            config.data_path = PathBuf::from(path);
        }
        if let Some(value) = lookup(ENV_IN_MEMORY) {
            config.in_memory = parse_bool(ENV_IN_MEMORY, &value)?;
        }
        if let Some(value) = lookup(ENV_ALLOW_OVERWRITE) {
            config.allow_overwrite = parse_bool(ENV_ALLOW_OVERWRITE, &value)?;
        }
        if let Some(value) = lookup(ENV_DECODE_POLICY) {
            config.decode_policy = value.parse()?;
        }
        if let Some(path) = lookup(ENV_SEED_FILE).filter(|path| !path.trim().is_empty()) {
            config.seed_file = Some(PathBuf::from(path));
        }

        Ok(config)
    }

    /// Build the contract configuration, reading the seed file if one is set.
    pub fn contract_config(&self) -> Result<ContractConfig, ConfigError> {
        let mut contract = ContractConfig::default()
            .with_allow_overwrite(self.allow_overwrite)
            .with_decode_policy(self.decode_policy);

        if let Some(path) = &self.seed_file {
            contract = contract.with_seed(load_seed_file(path)?);
        }

        Ok(contract)
    }
}

fn parse_bool(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            variable,
            value: value.to_string(),
        }),
    }
}

fn load_seed_file(path: &Path) -> Result<SeedData, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::SeedFileRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ConfigError::SeedFileParse {
        path: path.to_path_buf(),
        source,
    })
}
