use rental_deal_core::time_value::monthly_payment;
use rental_deal_core::types::FinancingInput;
use rental_deal_core::underwriting::cash_flow::{analyze_cash_flow, cash_flow_analysis, CashFlowInput};
use rental_deal_core::underwriting::deal_score::adjust_deal_score;
use rental_deal_core::underwriting::expenses::{estimate_expenses, ExpenseRates};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

fn offer(offer_price: Decimal, monthly_rent: Decimal, down: Decimal, rate: Decimal) -> CashFlowInput {
    CashFlowInput {
        offer_price,
        monthly_rent,
        financing: FinancingInput {
            down_payment_pct: down,
            annual_interest_rate: rate,
            loan_term_years: 30,
        },
    }
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

#[test]
fn test_scenario_a_full_derivation() {
    // $300k at 7% with 20% down renting for $2,200
    let input = offer(dec!(300000), dec!(2200), dec!(0.20), dec!(0.07));
    let out = analyze_cash_flow(&input, &ExpenseRates::default());

    assert_eq!(out.loan_amount, dec!(240000));

    // Annuity formula computed independently
    let r = dec!(0.07) / dec!(12);
    let growth = (Decimal::ONE + r).powu(360);
    let expected_payment = dec!(240000) * r * growth / (growth - Decimal::ONE);
    assert!((out.monthly_mortgage - expected_payment).abs() < dec!(0.0000001));
    assert!((out.monthly_mortgage - dec!(1596.73)).abs() < dec!(0.01));

    // 300 tax + 125 insurance + 176 vacancy + 250 maintenance + 250 capex + 220 management
    let expenses = estimate_expenses(dec!(300000), dec!(2200), &ExpenseRates::default());
    assert_eq!(expenses.property_tax, dec!(300));
    assert_eq!(expenses.insurance, dec!(125));
    assert_eq!(expenses.vacancy, dec!(176));
    assert_eq!(expenses.maintenance, dec!(250));
    assert_eq!(expenses.capex, dec!(250));
    assert_eq!(expenses.property_management, dec!(220));
    assert_eq!(out.expenses, expenses);

    assert_eq!(
        out.monthly_cash_flow,
        dec!(2200) - (out.monthly_mortgage + dec!(1321))
    );
    assert!((out.monthly_cash_flow - dec!(-717.73)).abs() < dec!(0.01));
    assert_eq!(out.total_cash_invested, dec!(69000));
    assert_eq!(out.cash_on_cash_return, out.annual_cash_flow / dec!(69000));
    assert_eq!(out.rent_to_price_ratio, dec!(2200) / dec!(300000));
}

#[test]
fn test_scenario_b_zero_offer_price() {
    let input = offer(Decimal::ZERO, dec!(2200), dec!(0.20), dec!(0.07));
    let out = analyze_cash_flow(&input, &ExpenseRates::default());
    assert_eq!(out.cap_rate, Decimal::ZERO);
    assert_eq!(out.rent_to_price_ratio, Decimal::ZERO);
    assert_eq!(out.total_cash_invested, Decimal::ZERO);
    assert_eq!(out.cash_on_cash_return, Decimal::ZERO);
}

#[test]
fn test_scenario_c_zero_rate_is_straight_line() {
    let input = offer(dec!(300000), dec!(2200), dec!(0.20), Decimal::ZERO);
    let out = analyze_cash_flow(&input, &ExpenseRates::default());
    assert_eq!(out.monthly_mortgage, out.loan_amount / dec!(360));
    assert_eq!(out.monthly_mortgage, dec!(240000) / dec!(360));
}

// ===========================================================================
// Mortgage properties
// ===========================================================================

#[test]
fn test_mortgage_increasing_in_principal() {
    let mut last = monthly_payment(dec!(50000), dec!(0.065), 30);
    for principal in [dec!(100000), dec!(150000), dec!(400000), dec!(1250000)] {
        let p = monthly_payment(principal, dec!(0.065), 30);
        assert!(p > last);
        last = p;
    }
}

#[test]
fn test_mortgage_increasing_in_rate() {
    let mut last = monthly_payment(dec!(250000), dec!(0.01), 30);
    for rate in [dec!(0.02), dec!(0.045), dec!(0.07), dec!(0.12), dec!(0.25)] {
        let p = monthly_payment(dec!(250000), rate, 30);
        assert!(p > last);
        last = p;
    }
}

#[test]
fn test_mortgage_zero_and_negative_principal() {
    assert_eq!(monthly_payment(Decimal::ZERO, dec!(0.07), 30), Decimal::ZERO);
    assert_eq!(monthly_payment(dec!(-1000), dec!(0.07), 30), Decimal::ZERO);
}

// ===========================================================================
// Aggregator properties
// ===========================================================================

#[test]
fn test_aggregator_is_pure() {
    let input = offer(dec!(275000), dec!(2350), dec!(0.25), dec!(0.0675));
    let rates = ExpenseRates::default();
    let first = analyze_cash_flow(&input, &rates);
    let second = analyze_cash_flow(&input, &rates);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_zero_rent_defaults() {
    let input = offer(dec!(300000), Decimal::ZERO, dec!(0.20), dec!(0.07));
    let out = analyze_cash_flow(&input, &ExpenseRates::default());
    assert_eq!(out.gross_rent_multiplier, Decimal::ZERO);
    assert_eq!(out.break_even_occupancy, Decimal::ONE);
    assert_eq!(out.expenses.property_management, Decimal::ZERO);
    assert_eq!(out.expenses.vacancy, Decimal::ZERO);
}

#[test]
fn test_custom_expense_rates() {
    let input = offer(dec!(300000), dec!(2200), dec!(0.20), dec!(0.07));
    let rates = ExpenseRates {
        property_management_rate: Decimal::ZERO,
        ..ExpenseRates::default()
    };
    let self_managed = analyze_cash_flow(&input, &rates);
    let managed = analyze_cash_flow(&input, &ExpenseRates::default());
    assert_eq!(self_managed.monthly_cash_flow - managed.monthly_cash_flow, dec!(220));
}

#[test]
fn test_envelope_rejects_bad_down_payment() {
    let input = offer(dec!(300000), dec!(2200), dec!(1.2), dec!(0.07));
    assert!(cash_flow_analysis(&input, &ExpenseRates::default()).is_err());
}

// ===========================================================================
// Deal score
// ===========================================================================

#[test]
fn test_deal_score_rewards_discount() {
    // 20000 / 220000 * 50 = 4.545... => 70 + 5
    assert_eq!(adjust_deal_score(dec!(70), dec!(220000), dec!(200000)), dec!(75));
}

#[test]
fn test_deal_score_clamps_at_100() {
    assert_eq!(adjust_deal_score(dec!(95), dec!(200000), dec!(140000)), dec!(100));
}

#[test]
fn test_deal_score_has_no_lower_clamp() {
    // Offer at double the list price: 10 - 50 = -40
    assert_eq!(adjust_deal_score(dec!(10), dec!(100000), dec!(200000)), dec!(-40));
}
