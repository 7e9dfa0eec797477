use mineos_market_core::MarketError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] mineos_market_core::ValidationError),

    #[error(transparent)]
    Market(#[from] MarketError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Market(error) => match error {
                MarketError::Validation(_) | MarketError::InvalidConfig { .. } => 2,
                MarketError::Api { .. } => 3,
                MarketError::Schema { .. }
                | MarketError::Decode { .. }
                | MarketError::Serialization(_) => 4,
                MarketError::Network { .. } | MarketError::Http { .. } => 5,
                MarketError::AuthRequired { .. } => 6,
            },
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_market_failures_to_distinct_codes() {
        let auth = CliError::from(MarketError::AuthRequired {
            endpoint: "dialogs".to_owned(),
        });
        let api = CliError::from(MarketError::Api {
            reason: "bad token".to_owned(),
        });
        let network = CliError::from(MarketError::Network {
            endpoint: "statistics".to_owned(),
            message: "connection refused".to_owned(),
        });

        assert_eq!(auth.exit_code(), 6);
        assert_eq!(api.exit_code(), 3);
        assert_eq!(network.exit_code(), 5);
        assert_eq!(
            CliError::from(mineos_market_core::ValidationError::MissingLogin).exit_code(),
            2
        );
    }
}
