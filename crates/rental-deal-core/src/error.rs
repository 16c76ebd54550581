use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a boundary value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidInputKind {
    NegativePrice,
    NegativeRent,
    RateOutOfRange,
    PercentageOutOfRange,
    MissingRent,
    NonPositiveTerm,
    ScoreOutOfRange,
    InvalidSweep,
}

impl std::fmt::Display for InvalidInputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            InvalidInputKind::NegativePrice => "price must not be negative",
            InvalidInputKind::NegativeRent => "rent must not be negative",
            InvalidInputKind::RateOutOfRange => "rate must be between 0 and 1",
            InvalidInputKind::PercentageOutOfRange => "percentage must be between 0 and 1",
            InvalidInputKind::MissingRent => "estimated monthly rent is required",
            InvalidInputKind::NonPositiveTerm => "loan term must be at least 1 year",
            InvalidInputKind::ScoreOutOfRange => "score must be between 0 and 100",
            InvalidInputKind::InvalidSweep => "step must be positive and min must not exceed max",
        };
        f.write_str(reason)
    }
}

#[derive(Debug, Error)]
pub enum DealError {
    #[error("Invalid input: {field} — {kind}")]
    InvalidInput {
        field: String,
        kind: InvalidInputKind,
    },

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl DealError {
    pub(crate) fn invalid(field: &str, kind: InvalidInputKind) -> Self {
        DealError::InvalidInput {
            field: field.to_string(),
            kind,
        }
    }
}

impl From<serde_json::Error> for DealError {
    fn from(e: serde_json::Error) -> Self {
        DealError::SerializationError(e.to_string())
    }
}
