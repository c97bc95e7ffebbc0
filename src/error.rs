//! Error types
//!
//! The core pipeline reports [`StrategyError`]; the scanner client reports
//! [`FetchError`]. Both are plain values for the caller to surface or skip.

use rust_decimal::Decimal;
use thiserror::Error;

/// Failures of the pure grid-strategy pipeline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StrategyError {
    #[error("cannot convert '{field}' to decimal: {reason}")]
    Conversion { field: String, reason: String },

    #[error("price must be positive, got {0}")]
    InvalidPrice(Decimal),

    #[error("invalid {name}: {value}")]
    InvalidInput { name: &'static str, value: Decimal },

    #[error("total volume is zero, weighted ATR is unavailable")]
    VolumeUnavailable,

    #[error("decimal overflow while computing {stage}")]
    Overflow { stage: &'static str },
}

impl StrategyError {
    pub(crate) fn conversion(field: impl Into<String>, reason: impl Into<String>) -> Self {
        StrategyError::Conversion {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(stage: &'static str) -> Self {
        StrategyError::Overflow { stage }
    }
}

/// Failures while fetching indicator data from the scanner
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scanner returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to decode scanner response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("symbol {0} not found on scanner")]
    SymbolNotFound(String),
}
