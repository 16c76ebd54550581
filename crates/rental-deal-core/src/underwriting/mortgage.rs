use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::monthly_payment;
use crate::types::{with_metadata, ComputationOutput, Money, Rate, DEFAULT_LOAN_TERM_YEARS};
use crate::underwriting::validation;
use crate::DealResult;

fn default_term() -> u32 {
    DEFAULT_LOAN_TERM_YEARS
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageInput {
    pub principal: Money,
    pub annual_rate: Rate,
    #[serde(default = "default_term")]
    pub term_years: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgageSummary {
    pub monthly_payment: Money,
    pub num_payments: u32,
    pub total_paid: Money,
    pub total_interest: Money,
}

/// Monthly payment plus lifetime totals for a fixed-rate loan.
pub fn mortgage_summary(input: &MortgageInput) -> DealResult<ComputationOutput<MortgageSummary>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validation::validate_loan_terms(input.annual_rate, input.term_years)?;
    if input.principal <= Decimal::ZERO {
        warnings.push("Principal is not positive — payment is reported as 0".into());
    }

    let payment = monthly_payment(input.principal, input.annual_rate, input.term_years);
    let num_payments = input.term_years.saturating_mul(12);
    let total_paid = match payment.checked_mul(Decimal::from(num_payments)) {
        Some(total) => total,
        None => {
            warnings.push("Lifetime total exceeds the representable range and is capped".into());
            Decimal::MAX
        }
    };
    let total_interest = (total_paid - input.principal.max(Decimal::ZERO)).max(Decimal::ZERO);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-Rate Mortgage (Level-Payment Annuity)",
        input,
        warnings,
        elapsed,
        MortgageSummary {
            monthly_payment: payment,
            num_payments,
            total_paid,
            total_interest,
        },
    ))
}
