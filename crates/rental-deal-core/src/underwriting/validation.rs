//! Boundary checks applied before the engine runs.
//!
//! The engine itself never fails: it guards its denominators and computes
//! something for any input. These checks sit in front of it so that callers
//! get a typed `InvalidInput` error for values that would otherwise produce
//! meaningless ratios, plus warnings for values that are legal but unusual.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::{DealError, InvalidInputKind};
use crate::types::{FinancingInput, Money, PropertyInput, Rate};
use crate::underwriting::cash_flow::CashFlowInput;
use crate::underwriting::expenses::ExpenseRates;
use crate::DealResult;

/// Lowest offer, as a fraction of list price, that callers conventionally allow.
pub const MIN_OFFER_FRACTION: Decimal = dec!(0.7);

fn check_unit_interval(field: &str, value: Rate, kind: InvalidInputKind) -> DealResult<()> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(DealError::invalid(field, kind));
    }
    Ok(())
}

fn check_price(field: &str, value: Money) -> DealResult<()> {
    if value < Decimal::ZERO {
        return Err(DealError::invalid(field, InvalidInputKind::NegativePrice));
    }
    Ok(())
}

fn check_rent(field: &str, value: Money) -> DealResult<()> {
    if value < Decimal::ZERO {
        return Err(DealError::invalid(field, InvalidInputKind::NegativeRent));
    }
    Ok(())
}

/// Financing terms: down payment and rate within [0, 1], term of at least a year.
pub fn validate_financing(financing: &FinancingInput) -> DealResult<()> {
    check_unit_interval(
        "down_payment_pct",
        financing.down_payment_pct,
        InvalidInputKind::PercentageOutOfRange,
    )?;
    validate_loan_terms(financing.annual_interest_rate, financing.loan_term_years)
}

/// Annual rate within [0, 1] and a term of at least one year.
pub fn validate_loan_terms(annual_interest_rate: Rate, loan_term_years: u32) -> DealResult<()> {
    check_unit_interval(
        "annual_interest_rate",
        annual_interest_rate,
        InvalidInputKind::RateOutOfRange,
    )?;
    if loan_term_years == 0 {
        return Err(DealError::invalid(
            "loan_term_years",
            InvalidInputKind::NonPositiveTerm,
        ));
    }
    Ok(())
}

/// Every expense assumption must be a fraction in [0, 1].
pub fn validate_expense_rates(rates: &ExpenseRates, warnings: &mut Vec<String>) -> DealResult<()> {
    let fields = [
        ("property_tax_rate", rates.property_tax_rate),
        ("insurance_rate", rates.insurance_rate),
        ("vacancy_rate", rates.vacancy_rate),
        ("maintenance_rate", rates.maintenance_rate),
        ("capex_rate", rates.capex_rate),
        ("property_management_rate", rates.property_management_rate),
        ("closing_cost_rate", rates.closing_cost_rate),
    ];
    for (field, value) in fields {
        check_unit_interval(field, value, InvalidInputKind::PercentageOutOfRange)?;
    }

    if rates.vacancy_rate > dec!(0.15) {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            rates.vacancy_rate * dec!(100)
        ));
    }
    Ok(())
}

/// Rent is optional in catalog data but required for any cash flow analysis.
pub fn require_rent(property: &PropertyInput) -> DealResult<Money> {
    let rent = property.estimated_monthly_rent.ok_or_else(|| {
        DealError::invalid("estimated_monthly_rent", InvalidInputKind::MissingRent)
    })?;
    check_rent("estimated_monthly_rent", rent)?;
    Ok(rent)
}

/// Base scores come from an external scoring service on a 0-100 scale.
pub fn validate_base_score(base_score: Decimal) -> DealResult<()> {
    if base_score < Decimal::ZERO || base_score > dec!(100) {
        return Err(DealError::invalid(
            "base_score",
            InvalidInputKind::ScoreOutOfRange,
        ));
    }
    Ok(())
}

/// List and offer price must be non-negative; offers outside the
/// conventional 70-100% band are allowed but flagged.
pub fn validate_offer(list_price: Money, offer_price: Money, warnings: &mut Vec<String>) -> DealResult<()> {
    check_price("list_price", list_price)?;
    check_price("offer_price", offer_price)?;

    if list_price.is_zero() {
        warnings.push("List price is zero — discount-based metrics are reported as 0".into());
        return Ok(());
    }

    if offer_price < list_price * MIN_OFFER_FRACTION {
        warnings.push(format!(
            "Offer {offer_price} is below 70% of list price {list_price}"
        ));
    } else if offer_price > list_price {
        warnings.push(format!(
            "Offer {offer_price} is above list price {list_price}"
        ));
    }
    Ok(())
}

/// Full check of a single offer scenario before cash flow analysis.
pub fn validate_cash_flow_input(
    input: &CashFlowInput,
    rates: &ExpenseRates,
    warnings: &mut Vec<String>,
) -> DealResult<()> {
    check_price("offer_price", input.offer_price)?;
    check_rent("monthly_rent", input.monthly_rent)?;
    validate_financing(&input.financing)?;
    validate_expense_rates(rates, warnings)?;

    if input.offer_price.is_zero() {
        warnings.push("Offer price is zero — cap rate and rent-to-price are reported as 0".into());
    }
    if input.monthly_rent.is_zero() {
        warnings.push(
            "Monthly rent is zero — GRM is reported as 0 and break-even occupancy as 100%".into(),
        );
    }
    Ok(())
}
