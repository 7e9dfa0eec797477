use thiserror::Error;

use crate::codec::DecodeError;
use crate::schema::Violations;

/// Client-side parameter constraints, checked before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("rating must be between 1 and 5, got {value}")]
    RatingOutOfRange { value: u8 },
    #[error("field '{field}' cannot be empty")]
    EmptyField { field: &'static str },
    #[error("login requires a user name or an e-mail address")]
    MissingLogin,
    #[error("invalid {kind} '{value}', expected one of {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Top-level error type for market requests.
#[derive(Debug, Error)]
pub enum MarketError {
    #[error("authentication required for endpoint \"{endpoint}\"")]
    AuthRequired { endpoint: String },

    #[error("network error while fetching \"{endpoint}\": {message}")]
    Network { endpoint: String, message: String },

    #[error("HTTP {status} for \"{endpoint}\": {status_text}")]
    Http {
        endpoint: String,
        status: u16,
        status_text: String,
    },

    #[error("failed to decode response for \"{endpoint}\": {source}")]
    Decode {
        endpoint: String,
        body: String,
        #[source]
        source: DecodeError,
    },

    #[error("{reason}")]
    Api { reason: String },

    #[error("response for \"{endpoint}\" does not match expected schema: {violations}")]
    Schema {
        endpoint: String,
        violations: Violations,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MarketError {
    /// Endpoint the failure belongs to, when the error carries one.
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            Self::AuthRequired { endpoint }
            | Self::Network { endpoint, .. }
            | Self::Http { endpoint, .. }
            | Self::Decode { endpoint, .. }
            | Self::Schema { endpoint, .. } => Some(endpoint),
            _ => None,
        }
    }
}
