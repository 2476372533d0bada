//! # Invocation Handler
//!
//! Routes a transaction's function name and positional string arguments to
//! the matching contract operation, and turns the result into a JSON
//! payload.
//!
//! | Function | Arguments | Payload |
//! |----------|-----------|---------|
//! | `InitLedger` | - | none |
//! | `CreateMedicine` | key, name, concentration, form, expiration, quantity, code | none |
//! | `QueryMedicine` | key | `Medicine` |
//! | `QueryAllMedicines` | - | `[QueryResult]` |
//! | `ChangeMedicineQuantity` | key, new quantity | none |
//!
//! A `<contract>:` prefix on the function name is accepted and ignored.

use crate::domain::entities::Medicine;
use crate::domain::errors::ContractError;
use crate::ports::inbound::MedicineLedgerApi;
use crate::ports::outbound::LedgerContext;
use crate::service::MedicineLedgerContract;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors raised while dispatching an invocation.
#[derive(Debug, Error)]
pub enum InvocationError {
    #[error("unknown function: {0}")]
    UnknownFunction(String),

    #[error("incorrect number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: Function,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

/// The contract's transaction entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    InitLedger,
    CreateMedicine,
    QueryMedicine,
    QueryAllMedicines,
    ChangeMedicineQuantity,
}

impl Function {
    pub const ALL: [Function; 5] = [
        Function::InitLedger,
        Function::CreateMedicine,
        Function::QueryMedicine,
        Function::QueryAllMedicines,
        Function::ChangeMedicineQuantity,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::InitLedger => "InitLedger",
            Function::CreateMedicine => "CreateMedicine",
            Function::QueryMedicine => "QueryMedicine",
            Function::QueryAllMedicines => "QueryAllMedicines",
            Function::ChangeMedicineQuantity => "ChangeMedicineQuantity",
        }
    }

    /// Number of string arguments the function takes.
    pub fn arity(self) -> usize {
        match self {
            Function::InitLedger | Function::QueryAllMedicines => 0,
            Function::QueryMedicine => 1,
            Function::ChangeMedicineQuantity => 2,
            Function::CreateMedicine => 7,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = InvocationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.rsplit_once(':').map_or(s, |(_, name)| name);
        Function::ALL
            .into_iter()
            .find(|function| function.name() == name)
            .ok_or_else(|| InvocationError::UnknownFunction(s.to_string()))
    }
}

/// Dispatches invocations to a `MedicineLedgerContract`.
#[derive(Debug, Clone, Default)]
pub struct ChaincodeHandler {
    contract: MedicineLedgerContract,
}

impl ChaincodeHandler {
    pub fn new(contract: MedicineLedgerContract) -> Self {
        Self { contract }
    }

    /// Run `function` with `args` against `ctx`.
    ///
    /// Returns the JSON payload for queries and `None` for writes.
    #[instrument(skip(self, ctx, args), fields(argc = args.len()))]
    pub fn invoke<C: LedgerContext + ?Sized>(
        &self,
        ctx: &mut C,
        function: &str,
        args: &[String],
    ) -> Result<Option<Value>, InvocationError> {
        let function: Function = function.parse()?;
        if args.len() != function.arity() {
            return Err(InvocationError::ArgumentCount {
                function,
                expected: function.arity(),
                actual: args.len(),
            });
        }
        debug!(%function, "Dispatching invocation");

        match function {
            Function::InitLedger => {
                self.contract.init_ledger(ctx)?;
                Ok(None)
            }
            Function::CreateMedicine => {
                let medicine = Medicine::new(
                    args[1].as_str(),
                    args[2].as_str(),
                    args[3].as_str(),
                    args[4].as_str(),
                    args[5].as_str(),
                    args[6].as_str(),
                );
                self.contract.create_medicine(ctx, &args[0], medicine)?;
                Ok(None)
            }
            Function::QueryMedicine => {
                let medicine = self.contract.query_medicine(&*ctx, &args[0])?;
                to_payload(&medicine)
            }
            Function::QueryAllMedicines => {
                let results = self.contract.query_all_medicines(&*ctx)?;
                to_payload(&results)
            }
            Function::ChangeMedicineQuantity => {
                self.contract
                    .change_medicine_quantity(ctx, &args[0], &args[1])?;
                Ok(None)
            }
        }
    }
}

fn to_payload<T: serde::Serialize>(value: &T) -> Result<Option<Value>, InvocationError> {
    serde_json::to_value(value)
        .map(Some)
        .map_err(InvocationError::Encode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryLedger;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn test_function_lookup_accepts_namespace() {
        assert_eq!(
            "QueryMedicine".parse::<Function>().unwrap(),
            Function::QueryMedicine
        );
        assert_eq!(
            "MedicineContract:InitLedger".parse::<Function>().unwrap(),
            Function::InitLedger
        );
        assert!(matches!(
            "queryMedicine".parse::<Function>(),
            Err(InvocationError::UnknownFunction(_))
        ));
    }

    #[test]
    fn test_create_and_query_through_handler() {
        let handler = ChaincodeHandler::default();
        let mut ledger = InMemoryLedger::new();

        let payload = handler
            .invoke(
                &mut ledger,
                "CreateMedicine",
                &args(&["MED9", "Loratadina", "10mg", "Tableta", "01/01/2027", "12", "555"]),
            )
            .unwrap();
        assert!(payload.is_none());

        let payload = handler
            .invoke(&mut ledger, "QueryMedicine", &args(&["MED9"]))
            .unwrap()
            .unwrap();
        assert_eq!(payload["name"], "Loratadina");
        assert_eq!(payload["quantity"], "12");
    }

    #[test]
    fn test_query_all_payload_shape() {
        let handler = ChaincodeHandler::default();
        let mut ledger = InMemoryLedger::new();
        handler.invoke(&mut ledger, "InitLedger", &[]).unwrap();

        let payload = handler
            .invoke(&mut ledger, "QueryAllMedicines", &[])
            .unwrap()
            .unwrap();

        let entries = payload.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["Key"], "MEDICINE0");
        assert_eq!(entries[0]["Record"]["name"], "Amoxicilina");
    }

    #[test]
    fn test_argument_count_is_checked() {
        let handler = ChaincodeHandler::default();
        let mut ledger = InMemoryLedger::new();

        let err = handler
            .invoke(&mut ledger, "ChangeMedicineQuantity", &args(&["MEDICINE0"]))
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "incorrect number of arguments for ChangeMedicineQuantity: expected 2, got 1"
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_contract_errors_pass_through() {
        let handler = ChaincodeHandler::default();
        let mut ledger = InMemoryLedger::new();

        let err = handler
            .invoke(&mut ledger, "QueryMedicine", &args(&["MEDICINE0"]))
            .unwrap_err();

        assert!(matches!(err, InvocationError::Contract(ContractError::NotFound { .. })));
        assert_eq!(err.to_string(), "MEDICINE0 does not exist");
    }
}
