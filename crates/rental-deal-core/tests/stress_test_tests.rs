use rental_deal_core::deal_analysis::{analyze_deal, Assumptions, DealInput};
use rental_deal_core::stress_test::risk::RiskRating;
use rental_deal_core::stress_test::sensitivity::{run_stress_test, stress_test, StressTestConfig};
use rental_deal_core::types::{FinancingInput, PropertyInput};
use rental_deal_core::underwriting::cash_flow::{monthly_cash_flow, CashFlowBand, CashFlowInput};
use rental_deal_core::underwriting::expenses::ExpenseRates;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// $200k at 6% with 25% down renting for $2,400
fn profitable() -> CashFlowInput {
    CashFlowInput {
        offer_price: dec!(200000),
        monthly_rent: dec!(2400),
        financing: FinancingInput {
            down_payment_pct: dec!(0.25),
            annual_interest_rate: dec!(0.06),
            loan_term_years: 30,
        },
    }
}

/// $300k at 7% with 20% down renting for $2,200
fn losing() -> CashFlowInput {
    CashFlowInput {
        offer_price: dec!(300000),
        monthly_rent: dec!(2200),
        financing: FinancingInput {
            down_payment_pct: dec!(0.20),
            annual_interest_rate: dec!(0.07),
            loan_term_years: 30,
        },
    }
}

// ===========================================================================
// Break-even searches
// ===========================================================================

#[test]
fn test_break_even_rate_zeroes_cash_flow() {
    let input = profitable();
    let rates = ExpenseRates::default();
    let result = run_stress_test(&input, &rates, &StressTestConfig::default());

    let be_rate = result.break_even_rate.unwrap();
    assert!(be_rate > dec!(0.06));

    let mut at_break_even = input.clone();
    at_break_even.financing.annual_interest_rate = be_rate;
    assert!(monthly_cash_flow(&at_break_even, &rates).abs() < dec!(0.01));
}

#[test]
fn test_break_even_vacancy_zeroes_cash_flow() {
    let input = profitable();
    let rates = ExpenseRates::default();
    let result = run_stress_test(&input, &rates, &StressTestConfig::default());

    let be_vacancy = result.break_even_vacancy.unwrap();
    assert!(be_vacancy > rates.vacancy_rate && be_vacancy < Decimal::ONE);
    assert!(monthly_cash_flow(&input, &rates.with_vacancy(be_vacancy)).abs() < dec!(0.01));
}

#[test]
fn test_break_even_rent_zeroes_cash_flow() {
    let input = profitable();
    let rates = ExpenseRates::default();
    let result = run_stress_test(&input, &rates, &StressTestConfig::default());

    let be_rent = result.break_even_rent.unwrap();
    assert!(be_rent < input.monthly_rent);
    let at_break_even = CashFlowInput {
        monthly_rent: be_rent,
        ..input
    };
    assert!(monthly_cash_flow(&at_break_even, &rates).abs() < dec!(0.01));
}

#[test]
fn test_losing_deal_has_no_break_evens() {
    let result = run_stress_test(&losing(), &ExpenseRates::default(), &StressTestConfig::default());
    assert!(result.base_cash_flow < Decimal::ZERO);
    assert_eq!(result.break_even_rate, None);
    assert_eq!(result.break_even_vacancy, None);
    assert_eq!(result.break_even_rent, None);
    assert_eq!(result.risk_rating, RiskRating::High);
    assert!(!result.survives_moderate);
    assert!(!result.survives_severe);
}

// ===========================================================================
// Shock ordering
// ===========================================================================

#[test]
fn test_shocks_are_ordered() {
    let result = run_stress_test(&profitable(), &ExpenseRates::default(), &StressTestConfig::default());
    assert!(result.rate_plus_1 < result.base_cash_flow);
    assert!(result.rate_plus_2 < result.rate_plus_1);
    assert!(result.vacancy_10 < result.base_cash_flow);
    assert!(result.vacancy_15 < result.vacancy_10);
    assert!(result.rent_minus_5 < result.base_cash_flow);
    assert!(result.severe_stress < result.moderate_stress);
    assert!(result.moderate_stress < result.base_cash_flow);
}

#[test]
fn test_stress_envelope_warns_on_losing_deal() {
    let result = stress_test(&losing(), &ExpenseRates::default(), &StressTestConfig::default()).unwrap();
    assert!(result.warnings.iter().any(|w| w.contains("break-even analysis skipped")));
}

#[test]
fn test_config_deserialises_partially() {
    let json = r#"{"risk_policy": {"comfortable_cash_flow": "1000"}}"#;
    let config: StressTestConfig = serde_json::from_str(json).unwrap();
    assert_eq!(config.risk_policy.comfortable_cash_flow, dec!(1000));
    assert_eq!(config.risk_policy.severe_stress_floor, dec!(-500));
    assert_eq!(config.break_even.iterations, 20);

    let result = run_stress_test(&profitable(), &ExpenseRates::default(), &config);
    assert_eq!(result.risk_rating, RiskRating::Medium);
}

// ===========================================================================
// Full deal analysis
// ===========================================================================

fn deal(offer_price: Decimal) -> DealInput {
    DealInput {
        property: PropertyInput {
            list_price: dec!(200000),
            estimated_monthly_rent: Some(dec!(2400)),
        },
        financing: FinancingInput {
            down_payment_pct: dec!(0.25),
            annual_interest_rate: dec!(0.06),
            loan_term_years: 30,
        },
        offer_price: Some(offer_price),
        base_score: Some(dec!(60)),
        assumptions: Assumptions::default(),
    }
}

#[test]
fn test_analysis_combines_every_stage() {
    let result = analyze_deal(&deal(dec!(180000))).unwrap();
    let out = &result.result;
    assert_eq!(out.discount_to_list, dec!(0.1));
    // 60 + 0.1 * 50
    assert_eq!(out.financials.deal_score, Some(dec!(65)));
    assert_eq!(out.cash_flow_band, CashFlowBand::Strong);
    assert_eq!(out.sensitivity.risk_rating, RiskRating::Low);
    assert!(out.sensitivity.break_even_rate.is_some());
}

#[test]
fn test_lower_offer_improves_cash_flow() {
    let at_list = analyze_deal(&deal(dec!(200000))).unwrap();
    let discounted = analyze_deal(&deal(dec!(160000))).unwrap();
    assert!(
        discounted.result.financials.monthly_cash_flow
            > at_list.result.financials.monthly_cash_flow
    );
    assert!(discounted.result.financials.cap_rate > at_list.result.financials.cap_rate);
}

#[test]
fn test_low_offer_is_flagged_not_rejected() {
    let result = analyze_deal(&deal(dec!(100000))).unwrap();
    assert!(result.warnings.iter().any(|w| w.contains("below 70%")));
}

// ===========================================================================
// Extreme financing terms
// ===========================================================================

#[test]
fn test_stress_test_survives_long_term_at_high_rate() {
    let mut input = losing();
    input.financing.annual_interest_rate = dec!(0.5);
    input.financing.loan_term_years = 135;

    let result = stress_test(&input, &ExpenseRates::default(), &StressTestConfig::default()).unwrap();
    // Payment is effectively interest-only on the $240k loan
    assert!(result.result.base_cash_flow < dec!(-9000));
    assert_eq!(result.result.break_even_rate, None);
    assert_eq!(result.result.risk_rating, RiskRating::High);
}

#[test]
fn test_profitable_deal_survives_every_rate_shock_near_decimal_limit() {
    let mut input = profitable();
    input.financing.annual_interest_rate = dec!(0.99);
    input.financing.loan_term_years = 69;
    input.monthly_rent = dec!(1000000);

    let out = run_stress_test(&input, &ExpenseRates::default(), &StressTestConfig::default());
    assert!(out.base_cash_flow > Decimal::ZERO);
    assert!(out.break_even_rate.is_some());
}
