//! Error taxonomy for the calculation engine
//!
//! Value types and single-calculation engines return these synchronously.
//! The aggregation layer is the only place that catches them and falls back
//! to a default per metric.

use thiserror::Error;

/// Errors raised by the calculation engine
#[derive(Debug, Error)]
pub enum CalcError {
    /// Validation failure on an entry point (bad amount, unknown enum, missing table)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid currency: {0}")]
    InvalidCurrency(String),

    #[error("invalid rate type: {0}")]
    InvalidRateType(String),

    #[error("invalid compounding period: {0}")]
    InvalidCompoundingPeriod(String),

    /// Money arithmetic across two different currencies
    #[error("currency mismatch: {left} != {right}")]
    CurrencyMismatch { left: String, right: String },

    #[error("division by zero")]
    DivisionByZero,

    /// Unexpected failure while computing a single metric
    #[error("calculation of {metric} failed: {reason}")]
    Calculation { metric: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl CalcError {
    pub fn invalid(message: impl Into<String>) -> Self {
        CalcError::InvalidArgument(message.into())
    }

    pub fn calculation(metric: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::Calculation {
            metric: metric.into(),
            reason: reason.into(),
        }
    }

    /// Collapse any validation error into `InvalidArgument`
    ///
    /// Entry points that accept raw strings report every unrecognized enum
    /// value the same way.
    pub fn into_invalid_argument(self) -> Self {
        match self {
            CalcError::InvalidArgument(_) => self,
            other => CalcError::InvalidArgument(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
