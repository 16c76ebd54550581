pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "underwriting")]
pub mod underwriting;

#[cfg(feature = "stress_test")]
pub mod stress_test;

#[cfg(feature = "stress_test")]
pub mod deal_analysis;

#[cfg(feature = "scenarios")]
pub mod scenarios;

pub use error::{DealError, InvalidInputKind};
pub use types::*;

/// Standard result type for all rental-deal operations
pub type DealResult<T> = Result<T, DealError>;
