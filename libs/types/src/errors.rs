//! Error types for the market simulator
//!
//! Comprehensive error taxonomy using thiserror

use thiserror::Error;

/// Top-level market error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MarketError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Order error: {0}")]
    Order(#[from] OrderError),
}

/// Invalid construction parameters. Fatal: no partially built object exists.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Initial price must be positive, got {0}")]
    NonPositiveInitialPrice(String),

    #[error("Volatility must be positive, got {0}")]
    NonPositiveVolatility(String),

    #[error("Price floor must be positive, got {0}")]
    NonPositiveFloor(String),

    #[error("Half spread must be positive, got {0}")]
    NonPositiveSpread(String),

    #[error("Quote size must be positive")]
    ZeroQuoteSize,

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("Agent already registered: {agent_id}")]
    DuplicateAgent { agent_id: String },

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Order submission and lookup errors.
///
/// Everything except `NotFound` is a validation failure local to a single
/// submit; `NotFound` is only produced for callers that require an
/// existence-checked cancel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OrderError {
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Invalid order id: {0}")]
    InvalidOrderId(String),

    #[error("Order id already live on the book: {order_id}")]
    DuplicateOrderId { order_id: String },

    #[error("Order not found: {order_id}")]
    NotFound { order_id: String },
}

impl OrderError {
    /// Whether this is a submit-time validation failure
    pub fn is_validation(&self) -> bool {
        !matches!(self, OrderError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_error_display() {
        let err = OrderError::InvalidPrice("0".to_string());
        assert_eq!(err.to_string(), "Invalid price: 0");
        assert!(err.is_validation());
    }

    #[test]
    fn test_not_found_is_not_validation() {
        let err = OrderError::NotFound { order_id: "O9".to_string() };
        assert!(!err.is_validation());
        assert!(err.to_string().contains("O9"));
    }

    #[test]
    fn test_market_error_from_config_error() {
        let err: MarketError = ConfigError::ZeroQuoteSize.into();
        assert!(matches!(err, MarketError::Config(_)));
        assert_eq!(err.to_string(), "Configuration error: Quote size must be positive");
    }

    #[test]
    fn test_invalid_parameter_helper() {
        let err = ConfigError::invalid("jitter", "must be finite");
        assert_eq!(err.to_string(), "Invalid parameter jitter: must be finite");
    }
}
