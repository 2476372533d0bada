//! # Medicine Ledger Chaincode Runtime
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging (stderr; stdout carries responses)
//! 2. Load configuration from the environment
//! 3. Open the world state
//! 4. Serve invocations from stdin until EOF or Ctrl+C

use anyhow::{Context, Result};
use chaincode_runtime::{
    serve, ChaincodeRuntime, FileBackedWorldState, MemoryWorldState, RuntimeConfig, WorldState,
};
use medicine_contract::ContractConfig;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = RuntimeConfig::from_env().context("invalid runtime configuration")?;
    let contract_config = config
        .contract_config()
        .context("invalid contract configuration")?;

    info!(
        data_path = %config.data_path.display(),
        in_memory = config.in_memory,
        allow_overwrite = config.allow_overwrite,
        decode_policy = %config.decode_policy,
        seed_records = contract_config.seed.len(),
        "Starting medicine ledger chaincode"
    );

    if config.in_memory {
        run(MemoryWorldState::new(), contract_config).await
    } else {
        let state = FileBackedWorldState::open(&config.data_path)
            .with_context(|| format!("failed to open world state at {}", config.data_path.display()))?;
        run(state, contract_config).await
    }
}

async fn run<S: WorldState>(state: S, contract_config: ContractConfig) -> Result<()> {
    let mut runtime = ChaincodeRuntime::new(state, contract_config);
    let shutdown = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "Ctrl+C handler unavailable, running until input closes");
            std::future::pending::<()>().await;
        }
    };

    serve(
        &mut runtime,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        shutdown,
    )
    .await
}
