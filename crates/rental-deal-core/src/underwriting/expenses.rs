//! Proportional operating-expense heuristics for single-family rentals.
//!
//! Expenses are estimated from the offer price (taxes, insurance, upkeep) and
//! the rent (vacancy, management) rather than fetched from external data.
//! The rates are named, overridable assumptions; `ExpenseRates::default()`
//! is the one canonical set used by every caller.

use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Assumed cost rates. Annual rates apply to the offer price; vacancy and
/// property management apply to monthly rent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseRates {
    /// Annual property tax as a fraction of price
    pub property_tax_rate: Rate,
    /// Annual hazard insurance as a fraction of price
    pub insurance_rate: Rate,
    /// Fraction of rent lost to vacancy and collection
    pub vacancy_rate: Rate,
    /// Annual routine maintenance as a fraction of price
    pub maintenance_rate: Rate,
    /// Annual capital expenditure reserve as a fraction of price
    pub capex_rate: Rate,
    /// Property management fee as a fraction of rent
    pub property_management_rate: Rate,
    /// One-off closing costs as a fraction of price
    pub closing_cost_rate: Rate,
}

impl Default for ExpenseRates {
    fn default() -> Self {
        Self {
            property_tax_rate: dec!(0.012),
            insurance_rate: dec!(0.005),
            vacancy_rate: dec!(0.08),
            maintenance_rate: dec!(0.01),
            capex_rate: dec!(0.01),
            property_management_rate: dec!(0.10),
            closing_cost_rate: dec!(0.03),
        }
    }
}

impl ExpenseRates {
    /// Copy of these rates with a different vacancy assumption.
    pub fn with_vacancy(&self, vacancy_rate: Rate) -> Self {
        Self {
            vacancy_rate,
            ..self.clone()
        }
    }
}

/// Monthly recurring costs, excluding debt service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingExpenses {
    pub property_tax: Money,
    pub insurance: Money,
    pub vacancy: Money,
    pub maintenance: Money,
    pub capex: Money,
    pub property_management: Money,
}

impl OperatingExpenses {
    pub fn total(&self) -> Money {
        self.property_tax
            + self.insurance
            + self.vacancy
            + self.maintenance
            + self.capex
            + self.property_management
    }
}

/// Estimate monthly operating expenses for an offer price and rent.
pub fn estimate_expenses(offer_price: Money, monthly_rent: Money, rates: &ExpenseRates) -> OperatingExpenses {
    let monthly = |annual_rate: Rate| offer_price * annual_rate / dec!(12);

    OperatingExpenses {
        property_tax: monthly(rates.property_tax_rate),
        insurance: monthly(rates.insurance_rate),
        vacancy: monthly_rent * rates.vacancy_rate,
        maintenance: monthly(rates.maintenance_rate),
        capex: monthly(rates.capex_rate),
        property_management: monthly_rent * rates.property_management_rate,
    }
}

/// Closing costs paid in cash at purchase.
pub fn closing_costs(offer_price: Money, rates: &ExpenseRates) -> Money {
    offer_price * rates.closing_cost_rate
}
