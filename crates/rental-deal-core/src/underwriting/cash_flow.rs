use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::time_value::monthly_payment;
use crate::types::{with_metadata, ComputationOutput, FinancingInput, Money, Multiple, Rate};
use crate::underwriting::expenses::{self, estimate_expenses, ExpenseRates, OperatingExpenses};
use crate::underwriting::validation::validate_cash_flow_input;
use crate::DealResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One offer on one property under one set of financing terms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlowInput {
    pub offer_price: Money,
    pub monthly_rent: Money,
    pub financing: FinancingInput,
}

/// Cash flow and return ratios for a single offer scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialResult {
    /// Rent less mortgage and operating expenses
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// Annual cash flow / total cash invested
    pub cash_on_cash_return: Rate,
    /// NOI / offer price
    pub cap_rate: Rate,
    /// Monthly rent / offer price (the "1% rule" ratio)
    pub rent_to_price_ratio: Rate,
    /// Offer price / annual gross rent
    pub gross_rent_multiplier: Multiple,
    /// Share of gross rent needed to cover every cost except vacancy
    pub break_even_occupancy: Rate,
    /// Down payment plus closing costs
    pub total_cash_invested: Money,
    /// Externally supplied score, adjusted for the offer discount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deal_score: Option<Decimal>,
    pub down_payment: Money,
    pub loan_amount: Money,
    pub closing_costs: Money,
    pub monthly_mortgage: Money,
    pub expenses: OperatingExpenses,
    /// Mortgage plus operating expenses
    pub total_monthly_expenses: Money,
    /// Annual rent less operating expenses, before debt service
    pub net_operating_income: Money,
    /// NOI / annual debt service (zero when there is no loan)
    pub debt_service_coverage: Multiple,
    pub loan_to_value: Rate,
}

/// Qualitative reading of monthly cash flow, independent of any display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashFlowBand {
    Negative,
    Marginal,
    Strong,
}

/// Boundary between a marginal and a strong monthly cash flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CashFlowBandThresholds {
    pub strong_floor: Money,
}

impl Default for CashFlowBandThresholds {
    fn default() -> Self {
        Self {
            strong_floor: dec!(200),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Combine mortgage cost and estimated operating expenses into cash flow and
/// the standard return ratios for one offer.
///
/// Pure and O(1): every ratio with a possibly-zero denominator falls back to
/// a defined value (0, or full occupancy for `break_even_occupancy`), so the
/// function never fails and can be called on every input change.
pub fn analyze_cash_flow(input: &CashFlowInput, rates: &ExpenseRates) -> FinancialResult {
    let offer_price = input.offer_price;
    let monthly_rent = input.monthly_rent;
    let financing = &input.financing;

    // --- Acquisition ---
    let down_payment = offer_price * financing.down_payment_pct;
    let loan_amount = offer_price - down_payment;
    let closing_costs = expenses::closing_costs(offer_price, rates);
    let total_cash_invested = down_payment + closing_costs;

    // --- Monthly costs ---
    let monthly_mortgage = monthly_payment(
        loan_amount,
        financing.annual_interest_rate,
        financing.loan_term_years,
    );
    let expenses = estimate_expenses(offer_price, monthly_rent, rates);
    let operating_expenses = expenses.total();
    let total_monthly_expenses = monthly_mortgage + operating_expenses;

    let monthly_cash_flow = monthly_rent - total_monthly_expenses;
    let annual_cash_flow = monthly_cash_flow * dec!(12);
    let net_operating_income = (monthly_rent - operating_expenses) * dec!(12);
    let annual_debt_service = monthly_mortgage * dec!(12);

    // --- Ratios ---
    let cash_on_cash_return = ratio_or(annual_cash_flow, total_cash_invested, Decimal::ZERO);
    let cap_rate = ratio_or(net_operating_income, offer_price, Decimal::ZERO);
    let rent_to_price_ratio = ratio_or(monthly_rent, offer_price, Decimal::ZERO);
    let loan_to_value = ratio_or(loan_amount, offer_price, Decimal::ZERO);
    let gross_rent_multiplier = ratio_or(offer_price, monthly_rent * dec!(12), Decimal::ZERO);
    let break_even_occupancy = ratio_or(
        total_monthly_expenses - expenses.vacancy,
        monthly_rent,
        Decimal::ONE,
    );
    let debt_service_coverage = ratio_or(net_operating_income, annual_debt_service, Decimal::ZERO);

    FinancialResult {
        monthly_cash_flow,
        annual_cash_flow,
        cash_on_cash_return,
        cap_rate,
        rent_to_price_ratio,
        gross_rent_multiplier,
        break_even_occupancy,
        total_cash_invested,
        deal_score: None,
        down_payment,
        loan_amount,
        closing_costs,
        monthly_mortgage,
        expenses,
        total_monthly_expenses,
        net_operating_income,
        debt_service_coverage,
        loan_to_value,
    }
}

/// `numerator / denominator`, or `fallback` when the denominator is not
/// positive or the quotient leaves the Decimal range.
fn ratio_or(numerator: Decimal, denominator: Decimal, fallback: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return fallback;
    }
    numerator.checked_div(denominator).unwrap_or(fallback)
}

/// Monthly cash flow only. Used by the stress tests, which re-evaluate the
/// same offer many times under shifted assumptions.
pub fn monthly_cash_flow(input: &CashFlowInput, rates: &ExpenseRates) -> Money {
    let offer_price = input.offer_price;
    let loan_amount = offer_price - offer_price * input.financing.down_payment_pct;
    let mortgage = monthly_payment(
        loan_amount,
        input.financing.annual_interest_rate,
        input.financing.loan_term_years,
    );
    let expenses = estimate_expenses(offer_price, input.monthly_rent, rates);
    input.monthly_rent - (mortgage + expenses.total())
}

/// Band a monthly cash flow as negative, marginal or strong.
pub fn classify_cash_flow(monthly_cash_flow: Money, thresholds: &CashFlowBandThresholds) -> CashFlowBand {
    if monthly_cash_flow < Decimal::ZERO {
        CashFlowBand::Negative
    } else if monthly_cash_flow < thresholds.strong_floor {
        CashFlowBand::Marginal
    } else {
        CashFlowBand::Strong
    }
}

/// Validated cash flow analysis wrapped in the standard output envelope.
pub fn cash_flow_analysis(
    input: &CashFlowInput,
    rates: &ExpenseRates,
) -> DealResult<ComputationOutput<FinancialResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_cash_flow_input(input, rates, &mut warnings)?;

    let result = analyze_cash_flow(input, rates);
    if result.debt_service_coverage > Decimal::ZERO && result.debt_service_coverage < Decimal::ONE {
        warnings.push(format!(
            "DSCR of {:.2} is below 1.00x — rent does not cover debt service",
            result.debt_service_coverage
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental Cash Flow Analysis (Amortized Debt Service + Estimated Operating Expenses)",
        &serde_json::json!({
            "input": input,
            "expense_rates": rates,
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
