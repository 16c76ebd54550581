pub mod scenarios;
pub mod underwriting;

use clap::Args;
use rust_decimal::Decimal;

use rental_deal_core::types::{FinancingInput, DEFAULT_LOAN_TERM_YEARS};
use rental_deal_core::underwriting::cash_flow::CashFlowInput;

/// Flags describing one offer, shared by the per-offer subcommands
#[derive(Args)]
pub struct OfferArgs {
    /// Offer price
    #[arg(long)]
    pub offer_price: Option<Decimal>,

    /// Estimated monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Down payment as a fraction of the offer (e.g. 0.20)
    #[arg(long)]
    pub down_payment: Option<Decimal>,

    /// Annual mortgage rate as a decimal (e.g. 0.065)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long, default_value_t = DEFAULT_LOAN_TERM_YEARS)]
    pub term: u32,
}

impl OfferArgs {
    pub fn financing(&self) -> Result<FinancingInput, Box<dyn std::error::Error>> {
        Ok(FinancingInput {
            down_payment_pct: self
                .down_payment
                .ok_or("--down-payment is required (or provide --input)")?,
            annual_interest_rate: self
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            loan_term_years: self.term,
        })
    }

    pub fn cash_flow_input(&self) -> Result<CashFlowInput, Box<dyn std::error::Error>> {
        Ok(CashFlowInput {
            offer_price: self
                .offer_price
                .ok_or("--offer-price is required (or provide --input)")?,
            monthly_rent: self.rent.ok_or("--rent is required (or provide --input)")?,
            financing: self.financing()?,
        })
    }
}
