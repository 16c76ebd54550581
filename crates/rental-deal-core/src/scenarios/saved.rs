//! Immutable snapshots of analysed offers.
//!
//! A `SavedScenario` is the record handed to the external persistence layer
//! when a user bookmarks an offer. Decimals serialise as strings, so the
//! three scenario inputs (offer price, down payment, rate) survive a JSON
//! round trip exactly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::error::DealError;
use crate::types::{with_metadata, ComputationOutput, FinancingInput, Money, Rate};
use crate::underwriting::cash_flow::{analyze_cash_flow, CashFlowInput, FinancialResult};
use crate::underwriting::expenses::ExpenseRates;
use crate::underwriting::validation::validate_cash_flow_input;
use crate::DealResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedScenario {
    pub name: String,
    pub offer_price: Money,
    pub down_payment_pct: Rate,
    pub interest_rate: Rate,
    pub monthly_cash_flow: Money,
    pub cash_on_cash: Rate,
    pub cap_rate: Rate,
    pub total_cash_needed: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
}

/// One scenario's headline metrics relative to the first (baseline) scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDelta {
    pub name: String,
    pub monthly_cash_flow: Money,
    pub cash_on_cash: Rate,
    pub cap_rate: Rate,
    pub total_cash_needed: Money,
    pub cash_flow_vs_baseline: Money,
    pub cash_needed_vs_baseline: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub baseline: String,
    pub rows: Vec<ScenarioDelta>,
    pub best_cash_flow: String,
    pub best_cash_on_cash: String,
    pub best_cap_rate: String,
    pub lowest_cash_needed: String,
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

impl SavedScenario {
    /// Snapshot an analysed offer under `name`.
    pub fn capture(name: &str, input: &CashFlowInput, result: &FinancialResult) -> Self {
        Self {
            name: name.to_string(),
            offer_price: input.offer_price,
            down_payment_pct: input.financing.down_payment_pct,
            interest_rate: input.financing.annual_interest_rate,
            monthly_cash_flow: result.monthly_cash_flow,
            cash_on_cash: result.cash_on_cash_return,
            cap_rate: result.cap_rate,
            total_cash_needed: result.total_cash_invested,
            captured_at: None,
        }
    }

    pub fn with_timestamp(self, captured_at: DateTime<Utc>) -> Self {
        Self {
            captured_at: Some(captured_at),
            ..self
        }
    }

    pub fn to_json(&self) -> DealResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> DealResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild the inputs needed to re-run this scenario. Rent and term are
    /// not part of the snapshot and must come from the property record.
    pub fn to_cash_flow_input(&self, monthly_rent: Money, loan_term_years: u32) -> CashFlowInput {
        CashFlowInput {
            offer_price: self.offer_price,
            monthly_rent,
            financing: FinancingInput {
                down_payment_pct: self.down_payment_pct,
                annual_interest_rate: self.interest_rate,
                loan_term_years,
            },
        }
    }
}

/// Validate, analyse and snapshot one offer. Validation warnings travel in
/// the envelope; the snapshot itself stays warning-free.
pub fn capture_scenario(
    name: &str,
    input: &CashFlowInput,
    rates: &ExpenseRates,
) -> DealResult<ComputationOutput<SavedScenario>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_cash_flow_input(input, rates, &mut warnings)?;
    let result = analyze_cash_flow(input, rates);
    let scenario = SavedScenario::capture(name, input, &result);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Saved Scenario Snapshot",
        &serde_json::json!({
            "name": name,
            "input": input,
            "expense_rates": rates,
        }),
        warnings,
        elapsed,
        scenario,
    ))
}

// ---------------------------------------------------------------------------
// Comparison
// ---------------------------------------------------------------------------

fn best_by<F>(scenarios: &[SavedScenario], key: F) -> String
where
    F: Fn(&SavedScenario) -> Decimal,
{
    scenarios
        .iter()
        .reduce(|best, s| if key(s) > key(best) { s } else { best })
        .map(|s| s.name.clone())
        .unwrap_or_default()
}

/// Rank saved scenarios on their headline metrics. The first scenario is
/// the baseline the deltas are measured against.
pub fn compare_scenarios(
    scenarios: &[SavedScenario],
) -> DealResult<ComputationOutput<ScenarioComparison>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let baseline = scenarios
        .first()
        .ok_or_else(|| DealError::InsufficientData("At least one saved scenario required".into()))?;

    let mut seen = HashSet::new();
    for s in scenarios {
        if !seen.insert(s.name.as_str()) {
            warnings.push(format!("Scenario name '{}' appears more than once", s.name));
        }
    }

    let rows = scenarios
        .iter()
        .map(|s| ScenarioDelta {
            name: s.name.clone(),
            monthly_cash_flow: s.monthly_cash_flow,
            cash_on_cash: s.cash_on_cash,
            cap_rate: s.cap_rate,
            total_cash_needed: s.total_cash_needed,
            cash_flow_vs_baseline: s.monthly_cash_flow - baseline.monthly_cash_flow,
            cash_needed_vs_baseline: s.total_cash_needed - baseline.total_cash_needed,
        })
        .collect();

    let output = ScenarioComparison {
        baseline: baseline.name.clone(),
        rows,
        best_cash_flow: best_by(scenarios, |s| s.monthly_cash_flow),
        best_cash_on_cash: best_by(scenarios, |s| s.cash_on_cash),
        best_cap_rate: best_by(scenarios, |s| s.cap_rate),
        lowest_cash_needed: best_by(scenarios, |s| -s.total_cash_needed),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Saved Scenario Comparison",
        &serde_json::json!({
            "num_scenarios": scenarios.len(),
            "baseline": baseline.name,
        }),
        warnings,
        elapsed,
        output,
    ))
}
