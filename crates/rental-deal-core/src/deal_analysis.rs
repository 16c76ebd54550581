use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::stress_test::sensitivity::{
    break_even_warnings, run_stress_test, SensitivityResult, StressTestConfig,
};
use crate::types::{
    with_metadata, ComputationOutput, FinancingInput, Money, OfferScenario, PropertyInput, Rate,
};
use crate::underwriting::cash_flow::{
    analyze_cash_flow, classify_cash_flow, CashFlowBand, CashFlowBandThresholds, CashFlowInput,
    FinancialResult,
};
use crate::underwriting::deal_score::{adjust_deal_score, discount_fraction};
use crate::underwriting::expenses::ExpenseRates;
use crate::underwriting::validation;
use crate::DealResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Every overridable assumption the engine uses. Missing sections fall back
/// to the canonical defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Assumptions {
    pub expense_rates: ExpenseRates,
    pub stress_test: StressTestConfig,
    pub cash_flow_bands: CashFlowBandThresholds,
}

/// A property, financing terms and an optional offer to analyse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealInput {
    pub property: PropertyInput,
    pub financing: FinancingInput,
    /// Defaults to the list price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_price: Option<Money>,
    /// 0-100 score from the external deal-scoring service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_score: Option<Decimal>,
    #[serde(default)]
    pub assumptions: Assumptions,
}

impl DealInput {
    /// The offer under analysis, at list price when none was given.
    pub fn offer(&self) -> OfferScenario {
        OfferScenario {
            offer_price: self.offer_price.unwrap_or(self.property.list_price),
        }
    }
}

/// Complete analysis of one offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealAnalysis {
    pub offer_price: Money,
    /// Discount to list price (negative above asking)
    pub discount_to_list: Rate,
    pub financials: FinancialResult,
    pub cash_flow_band: CashFlowBand,
    pub sensitivity: SensitivityResult,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate a deal and run the full engine on it: cash flow and ratios,
/// score adjustment, stress test and risk rating.
pub fn analyze_deal(input: &DealInput) -> DealResult<ComputationOutput<DealAnalysis>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let offer_price = input.offer().offer_price;
    let rates = &input.assumptions.expense_rates;

    // --- Validation ---
    let monthly_rent = validation::require_rent(&input.property)?;
    validation::validate_offer(input.property.list_price, offer_price, &mut warnings)?;
    validation::validate_financing(&input.financing)?;
    validation::validate_expense_rates(rates, &mut warnings)?;
    if let Some(score) = input.base_score {
        validation::validate_base_score(score)?;
    }
    if monthly_rent.is_zero() {
        warnings.push(
            "Monthly rent is zero — GRM is reported as 0 and break-even occupancy as 100%".into(),
        );
    }

    let cash_flow_input = CashFlowInput {
        offer_price,
        monthly_rent,
        financing: input.financing.clone(),
    };

    // --- Engine ---
    let mut financials = analyze_cash_flow(&cash_flow_input, rates);
    financials.deal_score = input.base_score.map(|base| {
        adjust_deal_score(base, input.property.list_price, offer_price)
    });
    if let Some(score) = financials.deal_score {
        if score < Decimal::ZERO {
            warnings.push(format!(
                "Adjusted deal score {score} is negative — above-asking offers are not floored at 0"
            ));
        }
    }

    let stress_config = &input.assumptions.stress_test;
    let sensitivity = run_stress_test(&cash_flow_input, rates, stress_config);
    warnings.extend(break_even_warnings(
        &cash_flow_input,
        rates,
        stress_config,
        &sensitivity,
    ));

    if financials.debt_service_coverage > Decimal::ZERO
        && financials.debt_service_coverage < Decimal::ONE
    {
        warnings.push(format!(
            "DSCR of {:.2} is below 1.00x — rent does not cover debt service",
            financials.debt_service_coverage
        ));
    }

    let output = DealAnalysis {
        offer_price,
        discount_to_list: discount_fraction(input.property.list_price, offer_price),
        cash_flow_band: classify_cash_flow(
            financials.monthly_cash_flow,
            &input.assumptions.cash_flow_bands,
        ),
        financials,
        sensitivity,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rental Property Deal Analysis (Cash Flow, Returns, Stress Test)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
