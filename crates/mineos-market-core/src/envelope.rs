//! # Response Envelope
//!
//! Every decoded response is wrapped as either
//! `{ success = true, result = <any> }` or `{ success = false, reason = "..." }`.
//! The shape is always checked, independently of
//! [`Config::validate_responses`](crate::Config::validate_responses).

use crate::error::MarketError;
use crate::schema::{validate, FieldPath, ObjectSchema, Schema, Violations};
use crate::value::LuaValue;

/// Unwrapped outer layer of a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success { result: Option<LuaValue> },
    Failure { reason: Option<String> },
}

/// `success = true` with an optional result, or `success = false` with an
/// optional string reason.
pub fn envelope_schema() -> Schema {
    Schema::tagged(
        "success",
        [
            (
                LuaValue::Boolean(true),
                Schema::object(ObjectSchema::new().optional("result", Schema::Any)),
            ),
            (
                LuaValue::Boolean(false),
                Schema::object(ObjectSchema::new().optional("reason", Schema::string())),
            ),
        ],
    )
}

impl Envelope {
    /// Check the envelope shape and split it into its tag and payload.
    pub fn from_value(value: LuaValue) -> Result<Self, Violations> {
        validate(&value, &envelope_schema())?;

        let LuaValue::Mapping(mut entries) = value else {
            return Err(Violations::single(FieldPath::root(), "expected object envelope"));
        };

        let success = entries
            .get("success")
            .and_then(LuaValue::as_bool)
            .unwrap_or(false);

        Ok(if success {
            Self::Success {
                result: entries.remove("result").filter(|result| !result.is_nil()),
            }
        } else {
            Self::Failure {
                reason: match entries.remove("reason") {
                    Some(LuaValue::String(reason)) => Some(reason),
                    _ => None,
                },
            }
        })
    }

    /// The success payload, or [`MarketError::Api`] for a failure envelope.
    ///
    /// A failure without a non-empty reason gets
    /// `Unknown API error at "<endpoint>"`.
    pub fn into_result(self, endpoint: &str) -> Result<Option<LuaValue>, MarketError> {
        match self {
            Self::Success { result } => Ok(result),
            Self::Failure { reason } => Err(MarketError::Api {
                reason: reason
                    .filter(|reason| !reason.is_empty())
                    .unwrap_or_else(|| format!("Unknown API error at \"{endpoint}\"")),
            }),
        }
    }
}
