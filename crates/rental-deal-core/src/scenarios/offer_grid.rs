use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::{DealError, InvalidInputKind};
use crate::types::*;
use crate::underwriting::cash_flow::{analyze_cash_flow, CashFlowInput, FinancialResult};
use crate::underwriting::expenses::ExpenseRates;
use crate::underwriting::validation::{self, MIN_OFFER_FRACTION};
use crate::DealResult;

/// Upper bound on points per axis, so a tiny step cannot explode the grid.
const MAX_AXIS_POINTS: usize = 500;

/// Which figure fills the grid cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMetric {
    #[default]
    MonthlyCashFlow,
    CashOnCashReturn,
    CapRate,
}

impl GridMetric {
    fn pick(&self, result: &FinancialResult) -> Decimal {
        match self {
            GridMetric::MonthlyCashFlow => result.monthly_cash_flow,
            GridMetric::CashOnCashReturn => result.cash_on_cash_return,
            GridMetric::CapRate => result.cap_rate,
        }
    }
}

/// Input for an offer price x interest rate sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferGridInput {
    pub property: PropertyInput,
    pub financing: FinancingInput,
    /// Defaults to 70%-100% of list price in 5% steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offer_axis: Option<SensitivityVariable>,
    pub rate_axis: SensitivityVariable,
    #[serde(default)]
    pub metric: GridMetric,
    #[serde(default)]
    pub expense_rates: ExpenseRates,
}

/// Output of the offer x rate sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferGridOutput {
    pub offer_values: Vec<Money>,
    pub rate_values: Vec<Rate>,
    pub metric: GridMetric,
    /// matrix[i][j] = metric at offer_values[i], rate_values[j]
    pub matrix: Vec<Vec<Decimal>>,
    /// Cell nearest to list price at the current financing rate
    pub base_case_value: Decimal,
    pub base_case_position: (usize, usize),
}

/// Conventional offer axis: 70% of list up to list price.
pub fn default_offer_axis(list_price: Money, step_fraction: Rate) -> SensitivityVariable {
    SensitivityVariable {
        name: "offer_price".into(),
        min: list_price * MIN_OFFER_FRACTION,
        max: list_price,
        step: list_price * step_fraction,
    }
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> DealResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO || var.min > var.max {
        return Err(DealError::InvalidInput {
            field: format!("axis:{}", var.name),
            kind: InvalidInputKind::InvalidSweep,
        });
    }

    let mut values = Vec::new();
    let mut current = var.min;
    while current <= var.max {
        values.push(current);
        if values.len() > MAX_AXIS_POINTS {
            return Err(DealError::InvalidInput {
                field: format!("axis:{}", var.name),
                kind: InvalidInputKind::InvalidSweep,
            });
        }
        current += var.step;
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Find the closest index to a target value in a sorted list.
fn closest_index(values: &[Decimal], target: Decimal) -> usize {
    values
        .iter()
        .enumerate()
        .min_by_key(|(_, v)| (**v - target).abs())
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Evaluate the chosen metric over every offer price / interest rate pair.
pub fn evaluate_offer_grid(input: &OfferGridInput) -> DealResult<ComputationOutput<OfferGridOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let monthly_rent = validation::require_rent(&input.property)?;
    validation::validate_financing(&input.financing)?;
    validation::validate_expense_rates(&input.expense_rates, &mut warnings)?;

    let offer_axis = input
        .offer_axis
        .clone()
        .unwrap_or_else(|| default_offer_axis(input.property.list_price, dec!(0.05)));
    let offer_values = generate_sweep_values(&offer_axis)?;
    let rate_values = generate_sweep_values(&input.rate_axis)?;

    if offer_values.first().is_some_and(|v| *v < Decimal::ZERO) {
        return Err(DealError::InvalidInput {
            field: format!("axis:{}", offer_axis.name),
            kind: InvalidInputKind::NegativePrice,
        });
    }
    if rate_values
        .iter()
        .any(|r| *r < Decimal::ZERO || *r > Decimal::ONE)
    {
        return Err(DealError::InvalidInput {
            field: format!("axis:{}", input.rate_axis.name),
            kind: InvalidInputKind::RateOutOfRange,
        });
    }

    let mut matrix = Vec::with_capacity(offer_values.len());
    for offer in &offer_values {
        let mut row = Vec::with_capacity(rate_values.len());
        for rate in &rate_values {
            let scenario = CashFlowInput {
                offer_price: *offer,
                monthly_rent,
                financing: FinancingInput {
                    annual_interest_rate: *rate,
                    ..input.financing.clone()
                },
            };
            row.push(input.metric.pick(&analyze_cash_flow(&scenario, &input.expense_rates)));
        }
        matrix.push(row);
    }

    let base_row = closest_index(&offer_values, input.property.list_price);
    let base_col = closest_index(&rate_values, input.financing.annual_interest_rate);
    let base_case_value = matrix[base_row][base_col];

    if input.metric == GridMetric::MonthlyCashFlow
        && matrix.iter().flatten().all(|v| *v < Decimal::ZERO)
    {
        warnings.push("Cash flow is negative at every offer price and rate in the grid".into());
    }

    let output = OfferGridOutput {
        offer_values,
        rate_values,
        metric: input.metric,
        matrix,
        base_case_value,
        base_case_position: (base_row, base_col),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Offer Price x Interest Rate Sensitivity Grid",
        &serde_json::json!({
            "offer_axis": offer_axis,
            "rate_axis": input.rate_axis,
            "metric": input.metric,
            "expense_rates": input.expense_rates,
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> OfferGridInput {
        OfferGridInput {
            property: PropertyInput {
                list_price: dec!(200000),
                estimated_monthly_rent: Some(dec!(2400)),
            },
            financing: FinancingInput {
                down_payment_pct: dec!(0.25),
                annual_interest_rate: dec!(0.06),
                loan_term_years: 30,
            },
            offer_axis: None,
            rate_axis: SensitivityVariable {
                name: "annual_interest_rate".into(),
                min: dec!(0.05),
                max: dec!(0.08),
                step: dec!(0.01),
            },
            metric: GridMetric::MonthlyCashFlow,
            expense_rates: ExpenseRates::default(),
        }
    }

    #[test]
    fn test_default_offer_axis() {
        let result = evaluate_offer_grid(&sample_input()).unwrap();
        let out = &result.result;
        // 140k, 150k, ..., 200k => 7 values
        assert_eq!(out.offer_values.len(), 7);
        assert_eq!(out.offer_values[0], dec!(140000));
        assert_eq!(*out.offer_values.last().unwrap(), dec!(200000));
        assert_eq!(out.rate_values.len(), 4);
        assert_eq!(out.matrix.len(), 7);
        assert_eq!(out.matrix[0].len(), 4);
    }

    #[test]
    fn test_grid_monotonic() {
        let result = evaluate_offer_grid(&sample_input()).unwrap();
        let out = &result.result;
        // Higher offer => lower cash flow
        for i in 0..out.matrix.len() - 1 {
            assert!(out.matrix[i][0] > out.matrix[i + 1][0]);
        }
        // Higher rate => lower cash flow
        for j in 0..out.matrix[0].len() - 1 {
            assert!(out.matrix[0][j] > out.matrix[0][j + 1]);
        }
    }

    #[test]
    fn test_base_case_at_list_and_current_rate() {
        let result = evaluate_offer_grid(&sample_input()).unwrap();
        let out = &result.result;
        assert_eq!(out.base_case_position, (6, 1));
        assert_eq!(out.base_case_value, out.matrix[6][1]);
    }

    #[test]
    fn test_cap_rate_ignores_financing() {
        let mut input = sample_input();
        input.metric = GridMetric::CapRate;
        let result = evaluate_offer_grid(&input).unwrap();
        let row = &result.result.matrix[3];
        assert!(row.iter().all(|v| *v == row[0]));
    }

    #[test]
    fn test_sweep_with_non_exact_step() {
        let var = SensitivityVariable {
            name: "test".into(),
            min: dec!(0),
            max: dec!(1),
            step: dec!(0.3),
        };
        let vals = generate_sweep_values(&var).unwrap();
        // 0, 0.3, 0.6, 0.9, 1.0 (max appended)
        assert_eq!(vals.len(), 5);
        assert_eq!(*vals.last().unwrap(), dec!(1));
    }

    #[test]
    fn test_invalid_step() {
        let mut input = sample_input();
        input.rate_axis.step = Decimal::ZERO;
        assert!(evaluate_offer_grid(&input).is_err());
    }

    #[test]
    fn test_too_many_points() {
        let mut input = sample_input();
        input.rate_axis.step = dec!(0.00001);
        assert!(evaluate_offer_grid(&input).is_err());
    }

    #[test]
    fn test_rate_axis_out_of_range() {
        let mut input = sample_input();
        input.rate_axis.max = dec!(1.5);
        input.rate_axis.step = dec!(0.5);
        assert!(evaluate_offer_grid(&input).is_err());
    }

    #[test]
    fn test_all_negative_warning() {
        let mut input = sample_input();
        input.property.estimated_monthly_rent = Some(dec!(800));
        let result = evaluate_offer_grid(&input).unwrap();
        assert!(!result.warnings.is_empty());
    }
}
