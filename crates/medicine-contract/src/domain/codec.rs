//! # Record Codec
//!
//! JSON encoding of `Medicine` values and the decode policies applied when
//! reading them back.

use crate::domain::config::DecodePolicy;
use crate::domain::entities::Medicine;
use crate::domain::errors::ContractError;
use serde_json::{Map, Value};
use tracing::warn;

pub fn encode_medicine(medicine: &Medicine) -> Result<Vec<u8>, ContractError> {
    serde_json::to_vec(medicine).map_err(ContractError::Encode)
}

/// Decode the value stored at `key` according to `policy`.
pub fn decode_medicine(
    key: &str,
    bytes: &[u8],
    policy: DecodePolicy,
) -> Result<Medicine, ContractError> {
    match serde_json::from_slice::<Medicine>(bytes) {
        Ok(medicine) => Ok(medicine),
        Err(source) => match policy {
            DecodePolicy::Strict => Err(ContractError::MalformedRecord {
                key: key.to_string(),
                source,
            }),
            DecodePolicy::Lenient => {
                warn!(key, error = %source, "Recovering malformed medicine record");
                Ok(recover_fields(bytes))
            }
        },
    }
}

/// Best-effort recovery: string members are matched by name, ignoring
/// ASCII case. Anything unparseable or mistyped comes back empty.
fn recover_fields(bytes: &[u8]) -> Medicine {
    let object = match serde_json::from_slice::<Value>(bytes) {
        Ok(Value::Object(object)) => object,
        _ => return Medicine::default(),
    };

    Medicine {
        name: string_member(&object, "name"),
        concentration: string_member(&object, "concentration"),
        form: string_member(&object, "form"),
        expiration: string_member(&object, "expiration"),
        quantity: string_member(&object, "quantity"),
        code: string_member(&object, "code"),
    }
}

fn string_member(object: &Map<String, Value>, field: &str) -> String {
    object
        .get(field)
        .or_else(|| {
            object
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(field))
                .map(|(_, value)| value)
        })
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
