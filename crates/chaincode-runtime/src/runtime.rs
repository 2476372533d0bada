//! # Chaincode Runtime
//!
//! Executes invocations one at a time against a world state.
//!
//! ## Transaction Flow
//!
//! ```text
//! request ──→ TransactionContext (tx_id, committed reads, buffered writes)
//!                  │
//!                  ↓
//!            ChaincodeHandler::invoke
//!                  │
//!        ┌─────────┴─────────┐
//!        ↓ Ok                ↓ Err
//!  atomic_batch_write   write set dropped
//!        │                   │
//!        ↓                   ↓
//!   status 200           status 500
//! ```

use crate::state::WorldState;
use crate::transaction::TransactionContext;
use medicine_contract::{ChaincodeHandler, ContractConfig, MedicineLedgerContract};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

pub const STATUS_OK: u16 = 200;
pub const STATUS_BAD_REQUEST: u16 = 400;
pub const STATUS_ERROR: u16 = 500;

/// One transaction request: a function name and its string arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl InvocationRequest {
    pub fn new<I, A>(function: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            function: function.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvocationResponse {
    pub tx_id: Uuid,
    pub status: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl InvocationResponse {
    fn success(tx_id: Uuid, payload: Option<Value>) -> Self {
        Self {
            tx_id,
            status: STATUS_OK,
            payload,
            message: None,
        }
    }

    fn failure(tx_id: Uuid, status: u16, message: impl Into<String>) -> Self {
        Self {
            tx_id,
            status,
            payload: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Counters for the lifetime of a runtime.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Invocations received, including malformed ones.
    pub transactions: u64,
    /// Invocations whose writes (if any) were committed.
    pub committed: u64,
    /// Invocations that failed and left world state untouched.
    pub failed: u64,
    /// Keys written by committed invocations.
    pub keys_written: u64,
}

/// Hosts the medicine contract over a world state.
pub struct ChaincodeRuntime<S: WorldState> {
    state: S,
    handler: ChaincodeHandler,
    stats: RuntimeStats,
}

impl<S: WorldState> ChaincodeRuntime<S> {
    pub fn new(state: S, config: ContractConfig) -> Self {
        Self {
            state,
            handler: ChaincodeHandler::new(MedicineLedgerContract::new(config)),
            stats: RuntimeStats::default(),
        }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    /// Run one invocation as its own transaction.
    pub fn execute(&mut self, request: &InvocationRequest) -> InvocationResponse {
        let mut ctx = TransactionContext::new(&self.state, Uuid::new_v4());
        let tx_id = ctx.tx_id();
        let span = info_span!("transaction", %tx_id, function = %request.function);
        let _entered = span.enter();

        self.stats.transactions += 1;

        let outcome = self
            .handler
            .invoke(&mut ctx, &request.function, &request.args);

        let payload = match outcome {
            Ok(payload) => payload,
            Err(error) => {
                warn!(%error, "Transaction failed, discarding writes");
                self.stats.failed += 1;
                return InvocationResponse::failure(tx_id, STATUS_ERROR, error.to_string());
            }
        };

        let writes = ctx.into_write_set();
        let written = writes.len() as u64;
        if !writes.is_empty() {
            if let Err(error) = self.state.atomic_batch_write(writes) {
                warn!(%error, "Commit failed");
                self.stats.failed += 1;
                return InvocationResponse::failure(tx_id, STATUS_ERROR, error.to_string());
            }
        }

        self.stats.committed += 1;
        self.stats.keys_written += written;
        debug!(keys_written = written, "Transaction committed");
        InvocationResponse::success(tx_id, payload)
    }

    /// Parse one JSON request line and execute it.
    pub fn handle_line(&mut self, line: &str) -> InvocationResponse {
        match serde_json::from_str::<InvocationRequest>(line) {
            Ok(request) => self.execute(&request),
            Err(error) => self.reject(error),
        }
    }

    /// Like `handle_line`, for a line read as raw bytes.
    pub fn handle_bytes(&mut self, line: &[u8]) -> InvocationResponse {
        match std::str::from_utf8(line) {
            Ok(line) => self.handle_line(line),
            Err(error) => self.reject(error),
        }
    }

    fn reject(&mut self, error: impl fmt::Display) -> InvocationResponse {
        self.stats.transactions += 1;
        self.stats.failed += 1;
        warn!(%error, "Malformed invocation request");
        InvocationResponse::failure(
            Uuid::new_v4(),
            STATUS_BAD_REQUEST,
            format!("malformed request: {error}"),
        )
    }
}

/// Serve line-delimited JSON requests from `reader`, writing one response
/// line per request to `writer`, until EOF or `shutdown` resolves.
pub async fn serve<S, R, W, F>(
    runtime: &mut ChaincodeRuntime<S>,
    reader: R,
    mut writer: W,
    shutdown: F,
) -> anyhow::Result<()>
where
    S: WorldState,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    let mut lines = reader.split(b'\n');
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_segment() => {
                let Some(line) = line? else {
                    info!("Input closed");
                    break;
                };
                let line = line.strip_suffix(b"\r").unwrap_or(&line[..]);
                if line.trim_ascii().is_empty() {
                    continue;
                }

                // Bad UTF-8 is answered like any other malformed line.
                let response = runtime.handle_bytes(line);
                let mut encoded = serde_json::to_vec(&response)?;
                encoded.push(b'\n');
                writer.write_all(&encoded).await?;
                writer.flush().await?;
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    let stats = runtime.stats();
    info!(
        transactions = stats.transactions,
        committed = stats.committed,
        failed = stats.failed,
        "Chaincode runtime stopped"
    );
    Ok(())
}
