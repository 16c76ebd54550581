use chrono::Utc;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use rental_deal_core::scenarios::offer_grid::{self, GridMetric, OfferGridInput};
use rental_deal_core::scenarios::saved::{self, SavedScenario};
use rental_deal_core::types::{PropertyInput, SensitivityVariable};
use rental_deal_core::underwriting::cash_flow::CashFlowInput;

use super::OfferArgs;
use crate::input;

#[derive(Debug, Clone, ValueEnum)]
pub enum MetricArg {
    CashFlow,
    CashOnCash,
    CapRate,
}

impl From<MetricArg> for GridMetric {
    fn from(m: MetricArg) -> Self {
        match m {
            MetricArg::CashFlow => GridMetric::MonthlyCashFlow,
            MetricArg::CashOnCash => GridMetric::CashOnCashReturn,
            MetricArg::CapRate => GridMetric::CapRate,
        }
    }
}

/// Arguments for the offer price x interest rate grid
#[derive(Args)]
pub struct OfferGridArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Listed asking price
    #[arg(long)]
    pub list_price: Option<Decimal>,

    #[command(flatten)]
    pub offer: OfferArgs,

    /// Rate axis in format min:max:step (e.g. "0.05:0.08:0.005")
    #[arg(long)]
    pub rates: Option<String>,

    /// Offer axis in format min:max:step (defaults to 70-100% of list in 5% steps)
    #[arg(long)]
    pub offers: Option<String>,

    /// Figure shown in each cell
    #[arg(long, default_value = "cash-flow")]
    pub metric: MetricArg,

    /// YAML or JSON file overriding expense rates
    #[arg(long)]
    pub assumptions: Option<String>,
}

fn parse_axis(name: &str, spec: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 3 {
        return Err(format!("Axis '{}' must be min:max:step, got '{}'", name, spec).into());
    }
    Ok(SensitivityVariable {
        name: name.to_string(),
        min: parts[0].parse()?,
        max: parts[1].parse()?,
        step: parts[2].parse()?,
    })
}

pub fn run_offer_grid(args: OfferGridArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut grid_input: OfferGridInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let rates = args
                .rates
                .as_deref()
                .ok_or("--rates is required (or provide --input)")?;
            OfferGridInput {
                property: PropertyInput {
                    list_price: args
                        .list_price
                        .ok_or("--list-price is required (or provide --input)")?,
                    estimated_monthly_rent: args.offer.rent,
                },
                financing: args.offer.financing()?,
                offer_axis: args
                    .offers
                    .as_deref()
                    .map(|spec| parse_axis("offer_price", spec))
                    .transpose()?,
                rate_axis: parse_axis("annual_interest_rate", rates)?,
                metric: args.metric.into(),
                expense_rates: Default::default(),
            }
        }
    };
    if let Some(ref path) = args.assumptions {
        grid_input.expense_rates = input::assumptions::load_assumptions(path)?.expense_rates;
    }

    let result = offer_grid::evaluate_offer_grid(&grid_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for capturing a saved scenario
#[derive(Args)]
pub struct SnapshotArgs {
    /// Name to store the scenario under
    #[arg(long)]
    pub name: String,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub offer: OfferArgs,

    /// YAML or JSON file overriding expense rates
    #[arg(long)]
    pub assumptions: Option<String>,
}

pub fn run_snapshot(args: SnapshotArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cf_input: CashFlowInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => args.offer.cash_flow_input()?,
    };
    let assumptions = input::assumptions::load_or_default(args.assumptions.as_deref())?;

    let captured = saved::capture_scenario(&args.name, &cf_input, &assumptions.expense_rates)?;
    for w in &captured.warnings {
        eprintln!("warning: {}", w);
    }

    let scenario = captured.result.with_timestamp(Utc::now());
    Ok(serde_json::to_value(scenario)?)
}

/// Arguments for comparing saved scenarios
#[derive(Args)]
pub struct CompareArgs {
    /// Path to a JSON array of saved scenarios (or pipe it on stdin)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_compare(args: CompareArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios: Vec<SavedScenario> = input::read_input(args.input.as_deref())?
        .ok_or("--input <file.json> or stdin required for compare")?;

    let result = saved::compare_scenarios(&scenarios)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_axis() {
        let axis = parse_axis("annual_interest_rate", "0.05:0.08:0.005").unwrap();
        assert_eq!(axis.min, dec!(0.05));
        assert_eq!(axis.max, dec!(0.08));
        assert_eq!(axis.step, dec!(0.005));
    }

    #[test]
    fn test_parse_axis_rejects_wrong_arity() {
        assert!(parse_axis("offer_price", "150000:200000").is_err());
        assert!(parse_axis("offer_price", "a:b:c").is_err());
    }
}
