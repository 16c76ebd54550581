use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Multiples (e.g., 11.4x gross rent)
pub type Multiple = Decimal;

/// Loan term used when the caller does not supply one.
pub const DEFAULT_LOAN_TERM_YEARS: u32 = 30;

fn default_loan_term_years() -> u32 {
    DEFAULT_LOAN_TERM_YEARS
}

/// Listing data for a single residential property, as supplied by the
/// property catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyInput {
    pub list_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_monthly_rent: Option<Money>,
}

/// Financing assumptions for an offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingInput {
    /// Fraction of the offer price paid in cash (0.20 = 20% down)
    pub down_payment_pct: Rate,
    /// Annual mortgage rate, passed in explicitly by the caller
    pub annual_interest_rate: Rate,
    #[serde(default = "default_loan_term_years")]
    pub loan_term_years: u32,
}

/// The price a buyer is prepared to pay. Conventionally between 70% and 100%
/// of the list price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OfferScenario {
    pub offer_price: Money,
}

/// Sweep specification for one axis of a sensitivity grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityVariable {
    pub name: String,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
