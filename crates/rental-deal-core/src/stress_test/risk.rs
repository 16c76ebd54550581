use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// Qualitative resilience of a deal under stress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskRating {
    Low,
    Medium,
    High,
}

/// Monthly cash-flow thresholds behind the risk rating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskPolicy {
    /// Severe-stress cash flow below this is high risk
    pub severe_stress_floor: Money,
    /// Base cash flow below this is at best medium risk
    pub comfortable_cash_flow: Money,
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            severe_stress_floor: dec!(-500),
            comfortable_cash_flow: dec!(200),
        }
    }
}

/// Map base and stressed monthly cash flows to a rating.
///
/// High when the baseline already loses money or severe stress loses more
/// than the floor; medium when moderate stress turns negative or the
/// baseline is thin; low otherwise.
pub fn classify_risk(
    base_cash_flow: Money,
    moderate_stress: Money,
    severe_stress: Money,
    policy: &RiskPolicy,
) -> RiskRating {
    if severe_stress < policy.severe_stress_floor || base_cash_flow < Decimal::ZERO {
        RiskRating::High
    } else if moderate_stress < Decimal::ZERO || base_cash_flow < policy.comfortable_cash_flow {
        RiskRating::Medium
    } else {
        RiskRating::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_negative_base_is_high() {
        let policy = RiskPolicy::default();
        assert_eq!(classify_risk(dec!(-1), dec!(500), dec!(500), &policy), RiskRating::High);
    }

    #[test]
    fn test_deep_severe_loss_is_high() {
        let policy = RiskPolicy::default();
        assert_eq!(classify_risk(dec!(800), dec!(300), dec!(-500.01), &policy), RiskRating::High);
        // Exactly at the floor is not below it
        assert_eq!(classify_risk(dec!(800), dec!(300), dec!(-500), &policy), RiskRating::Low);
    }

    #[test]
    fn test_moderate_loss_is_medium() {
        let policy = RiskPolicy::default();
        assert_eq!(classify_risk(dec!(400), dec!(-10), dec!(-300), &policy), RiskRating::Medium);
    }

    #[test]
    fn test_thin_base_is_medium() {
        let policy = RiskPolicy::default();
        assert_eq!(classify_risk(dec!(150), dec!(50), dec!(-100), &policy), RiskRating::Medium);
    }

    #[test]
    fn test_resilient_deal_is_low() {
        let policy = RiskPolicy::default();
        assert_eq!(classify_risk(dec!(650), dec!(320), dec!(-40), &policy), RiskRating::Low);
    }

    #[test]
    fn test_custom_policy() {
        let policy = RiskPolicy {
            severe_stress_floor: Decimal::ZERO,
            comfortable_cash_flow: dec!(500),
        };
        assert_eq!(classify_risk(dec!(650), dec!(320), dec!(-40), &policy), RiskRating::High);
        assert_eq!(classify_risk(dec!(450), dec!(320), dec!(10), &policy), RiskRating::Medium);
    }

    #[test]
    fn test_rating_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&RiskRating::Medium).unwrap(), "\"medium\"");
    }
}
