//! Stress testing of a single offer against adverse market shifts.
//!
//! Every scenario re-evaluates monthly cash flow with the offer price, down
//! payment and closing costs held fixed; only the interest rate, vacancy
//! assumption and rent move. Break-even thresholds are located with the
//! shared fixed-iteration bisection in `time_value`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::stress_test::risk::{classify_risk, RiskPolicy, RiskRating};
use crate::time_value::{bisect, Monotonicity};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::underwriting::cash_flow::{monthly_cash_flow, CashFlowInput};
use crate::underwriting::expenses::ExpenseRates;
use crate::underwriting::validation::validate_cash_flow_input;
use crate::DealResult;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// An adverse shift applied to one offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressShock {
    /// Added to the annual interest rate
    #[serde(default)]
    pub rate_increase: Rate,
    /// Replaces the vacancy assumption when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vacancy_rate: Option<Rate>,
    /// Multiplies monthly rent
    #[serde(default = "unit_factor")]
    pub rent_factor: Decimal,
}

fn unit_factor() -> Decimal {
    Decimal::ONE
}

impl StressShock {
    pub fn rate(rate_increase: Rate) -> Self {
        Self {
            rate_increase,
            vacancy_rate: None,
            rent_factor: Decimal::ONE,
        }
    }

    pub fn vacancy(vacancy_rate: Rate) -> Self {
        Self {
            rate_increase: Decimal::ZERO,
            vacancy_rate: Some(vacancy_rate),
            rent_factor: Decimal::ONE,
        }
    }

    pub fn rent(rent_factor: Decimal) -> Self {
        Self {
            rate_increase: Decimal::ZERO,
            vacancy_rate: None,
            rent_factor,
        }
    }

    pub fn combined(rate_increase: Rate, vacancy_rate: Rate, rent_factor: Decimal) -> Self {
        Self {
            rate_increase,
            vacancy_rate: Some(vacancy_rate),
            rent_factor,
        }
    }

    /// Monthly cash flow of `input` after applying this shock.
    pub fn cash_flow(&self, input: &CashFlowInput, rates: &ExpenseRates) -> Money {
        let mut shocked = input.clone();
        shocked.financing.annual_interest_rate += self.rate_increase;
        shocked.monthly_rent *= self.rent_factor;

        match self.vacancy_rate {
            Some(vacancy) => monthly_cash_flow(&shocked, &rates.with_vacancy(vacancy)),
            None => monthly_cash_flow(&shocked, rates),
        }
    }
}

/// The fixed set of shocks every deal is run through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressSuite {
    pub rate_plus_1: StressShock,
    pub rate_plus_2: StressShock,
    pub vacancy_10: StressShock,
    pub vacancy_15: StressShock,
    pub rent_minus_5: StressShock,
    pub moderate: StressShock,
    pub severe: StressShock,
}

impl Default for StressSuite {
    fn default() -> Self {
        Self {
            rate_plus_1: StressShock::rate(dec!(0.01)),
            rate_plus_2: StressShock::rate(dec!(0.02)),
            vacancy_10: StressShock::vacancy(dec!(0.10)),
            vacancy_15: StressShock::vacancy(dec!(0.15)),
            rent_minus_5: StressShock::rent(dec!(0.95)),
            moderate: StressShock::combined(dec!(0.01), dec!(0.10), dec!(0.97)),
            severe: StressShock::combined(dec!(0.02), dec!(0.15), dec!(0.90)),
        }
    }
}

/// Bracket and iteration count for the break-even searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreakEvenSearch {
    pub iterations: u32,
    /// Upper rate bracket is the current rate plus this span
    pub rate_span: Rate,
    /// Upper vacancy bracket
    pub max_vacancy: Rate,
}

impl Default for BreakEvenSearch {
    fn default() -> Self {
        Self {
            iterations: 20,
            rate_span: dec!(0.20),
            max_vacancy: Decimal::ONE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StressTestConfig {
    pub shocks: StressSuite,
    pub break_even: BreakEvenSearch,
    pub risk_policy: RiskPolicy,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Monthly cash flow under each shock, break-even thresholds and the
/// resulting risk rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResult {
    pub base_cash_flow: Money,
    pub rate_plus_1: Money,
    pub rate_plus_2: Money,
    pub vacancy_10: Money,
    pub vacancy_15: Money,
    pub rent_minus_5: Money,
    pub moderate_stress: Money,
    pub severe_stress: Money,
    pub survives_moderate: bool,
    pub survives_severe: bool,
    /// Highest annual rate at which cash flow stays non-negative
    pub break_even_rate: Option<Rate>,
    /// Highest vacancy rate at which cash flow stays non-negative
    pub break_even_vacancy: Option<Rate>,
    /// Lowest monthly rent at which cash flow stays non-negative
    pub break_even_rent: Option<Money>,
    pub risk_rating: RiskRating,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the stress suite and break-even searches for one offer.
///
/// Break-even thresholds are only searched for when the base case is
/// profitable; for a deal that already loses money they are `None`.
pub fn run_stress_test(
    input: &CashFlowInput,
    rates: &ExpenseRates,
    config: &StressTestConfig,
) -> SensitivityResult {
    let shocks = &config.shocks;
    let base_cash_flow = monthly_cash_flow(input, rates);

    let moderate_stress = shocks.moderate.cash_flow(input, rates);
    let severe_stress = shocks.severe.cash_flow(input, rates);

    let (break_even_rate, break_even_vacancy, break_even_rent) = if base_cash_flow > Decimal::ZERO {
        let search = &config.break_even;
        (
            Some(break_even_rate(input, rates, search)),
            Some(break_even_vacancy(input, rates, search)),
            Some(break_even_rent(input, rates, search)),
        )
    } else {
        (None, None, None)
    };

    SensitivityResult {
        base_cash_flow,
        rate_plus_1: shocks.rate_plus_1.cash_flow(input, rates),
        rate_plus_2: shocks.rate_plus_2.cash_flow(input, rates),
        vacancy_10: shocks.vacancy_10.cash_flow(input, rates),
        vacancy_15: shocks.vacancy_15.cash_flow(input, rates),
        rent_minus_5: shocks.rent_minus_5.cash_flow(input, rates),
        moderate_stress,
        severe_stress,
        survives_moderate: moderate_stress >= Decimal::ZERO,
        survives_severe: severe_stress >= Decimal::ZERO,
        break_even_rate,
        break_even_vacancy,
        break_even_rent,
        risk_rating: classify_risk(
            base_cash_flow,
            moderate_stress,
            severe_stress,
            &config.risk_policy,
        ),
    }
}

/// Validated stress test wrapped in the standard output envelope.
pub fn stress_test(
    input: &CashFlowInput,
    rates: &ExpenseRates,
    config: &StressTestConfig,
) -> DealResult<ComputationOutput<SensitivityResult>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_cash_flow_input(input, rates, &mut warnings)?;

    let result = run_stress_test(input, rates, config);
    warnings.extend(break_even_warnings(input, rates, config, &result));

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental Cash Flow Stress Test (Fixed Shocks + Bisection Break-Even)",
        &serde_json::json!({
            "input": input,
            "expense_rates": rates,
            "config": config,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Flags break-even values pinned to the edge of their search bracket,
/// where the true threshold lies outside the range searched.
pub fn break_even_warnings(
    input: &CashFlowInput,
    rates: &ExpenseRates,
    config: &StressTestConfig,
    result: &SensitivityResult,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if result.break_even_rate.is_none() {
        if result.base_cash_flow <= Decimal::ZERO {
            warnings.push("Base cash flow is not positive — break-even analysis skipped".into());
        }
        return warnings;
    }

    let search = &config.break_even;
    let ceiling = input.financing.annual_interest_rate + search.rate_span;
    if monthly_cash_flow(&with_rate(input, ceiling), rates) > Decimal::ZERO {
        warnings.push(format!(
            "Cash flow stays positive up to a {:.2}% rate — break-even rate lies beyond the search range",
            ceiling * dec!(100)
        ));
    }

    if monthly_cash_flow(input, &rates.with_vacancy(search.max_vacancy)) > Decimal::ZERO {
        warnings.push(format!(
            "Cash flow stays positive at {:.0}% vacancy — break-even vacancy lies beyond the search range",
            search.max_vacancy * dec!(100)
        ));
    }
    warnings
}

// ---------------------------------------------------------------------------
// Break-even searches
// ---------------------------------------------------------------------------

fn with_rate(input: &CashFlowInput, annual_interest_rate: Rate) -> CashFlowInput {
    let mut shifted = input.clone();
    shifted.financing.annual_interest_rate = annual_interest_rate;
    shifted
}

fn with_rent(input: &CashFlowInput, monthly_rent: Money) -> CashFlowInput {
    CashFlowInput {
        monthly_rent,
        ..input.clone()
    }
}

/// Cash flow falls as the rate rises: search `[rate, rate + span]`.
fn break_even_rate(input: &CashFlowInput, rates: &ExpenseRates, search: &BreakEvenSearch) -> Rate {
    let current = input.financing.annual_interest_rate;
    bisect(
        |rate| monthly_cash_flow(&with_rate(input, rate), rates),
        current,
        current + search.rate_span,
        search.iterations,
        Monotonicity::Decreasing,
    )
}

/// Cash flow falls as vacancy rises: search `[vacancy, max_vacancy]`.
fn break_even_vacancy(input: &CashFlowInput, rates: &ExpenseRates, search: &BreakEvenSearch) -> Rate {
    bisect(
        |vacancy| monthly_cash_flow(input, &rates.with_vacancy(vacancy)),
        rates.vacancy_rate,
        search.max_vacancy,
        search.iterations,
        Monotonicity::Decreasing,
    )
}

/// Cash flow rises with rent, so this is the mirror image of the other two
/// searches: the minimum rent in `[0, rent]` that keeps cash flow at zero.
fn break_even_rent(input: &CashFlowInput, rates: &ExpenseRates, search: &BreakEvenSearch) -> Money {
    bisect(
        |rent| monthly_cash_flow(&with_rent(input, rent), rates),
        Decimal::ZERO,
        input.monthly_rent,
        search.iterations,
        Monotonicity::Increasing,
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
