use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rental_deal_core::types::DEFAULT_LOAN_TERM_YEARS;
use rental_deal_core::underwriting::cash_flow::{self, CashFlowInput};
use rental_deal_core::underwriting::deal_score::{self, DealScoreInput};
use rental_deal_core::underwriting::mortgage::{self, MortgageInput};

use super::OfferArgs;
use crate::input;

/// Arguments for the mortgage calculator
#[derive(Args)]
pub struct MortgageArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate as a decimal (e.g. 0.07)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value_t = DEFAULT_LOAN_TERM_YEARS)]
    pub term: u32,
}

pub fn run_mortgage(args: MortgageArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mortgage_input: MortgageInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => MortgageInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_years: args.term,
        },
    };

    let result = mortgage::mortgage_summary(&mortgage_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for single-offer cash flow analysis
#[derive(Args)]
pub struct CashFlowArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub offer: OfferArgs,

    /// YAML or JSON file overriding expense rates and thresholds
    #[arg(long)]
    pub assumptions: Option<String>,
}

pub fn run_cash_flow(args: CashFlowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let cf_input: CashFlowInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => args.offer.cash_flow_input()?,
    };
    let assumptions = input::assumptions::load_or_default(args.assumptions.as_deref())?;

    let result = cash_flow::cash_flow_analysis(&cf_input, &assumptions.expense_rates)?;
    Ok(serde_json::to_value(result)?)
}

/// Arguments for the deal score adjustment
#[derive(Args)]
pub struct DealScoreArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Score from the external scoring service (0-100)
    #[arg(long)]
    pub base_score: Option<Decimal>,

    /// Listed asking price
    #[arg(long)]
    pub list_price: Option<Decimal>,

    /// Offer price (defaults to the list price)
    #[arg(long)]
    pub offer_price: Option<Decimal>,
}

pub fn run_deal_score(args: DealScoreArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let score_input: DealScoreInput = match input::read_input(args.input.as_deref())? {
        Some(parsed) => parsed,
        None => {
            let list_price = args
                .list_price
                .ok_or("--list-price is required (or provide --input)")?;
            DealScoreInput {
                base_score: args
                    .base_score
                    .ok_or("--base-score is required (or provide --input)")?,
                list_price,
                offer_price: args.offer_price.unwrap_or(list_price),
            }
        }
    };

    let result = deal_score::score_offer(&score_input)?;
    Ok(serde_json::to_value(result)?)
}
