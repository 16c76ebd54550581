use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::underwriting::validation;
use crate::DealResult;

/// Score points awarded per unit of discount to list price.
pub const DISCOUNT_SCORE_WEIGHT: Decimal = dec!(50);

/// Highest score an adjustment can produce.
pub const MAX_DEAL_SCORE: Decimal = dec!(100);

/// Fraction below list price the offer represents. Negative for offers
/// above asking; zero when the list price is zero or too small to divide by.
pub fn discount_fraction(list_price: Money, offer_price: Money) -> Rate {
    if list_price.is_zero() {
        return Decimal::ZERO;
    }
    (list_price - offer_price)
        .checked_div(list_price)
        .unwrap_or(Decimal::ZERO)
}

/// Rescale an externally supplied 0-100 score by the offer's discount.
///
/// `min(100, round(base + discount * 50))`, rounding halves upwards. There is
/// no lower clamp: an offer far enough above asking yields a negative score.
pub fn adjust_deal_score(base_score: Decimal, list_price: Money, offer_price: Money) -> Decimal {
    let raw = discount_fraction(list_price, offer_price)
        .checked_mul(DISCOUNT_SCORE_WEIGHT)
        .and_then(|adjustment| adjustment.checked_add(base_score + dec!(0.5)))
        // Only an offer vastly above a near-zero list price overflows
        .unwrap_or(Decimal::MIN);
    let rounded = raw.floor();
    rounded.min(MAX_DEAL_SCORE)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealScoreInput {
    pub base_score: Decimal,
    pub list_price: Money,
    pub offer_price: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealScoreOutput {
    pub base_score: Decimal,
    pub discount_to_list: Rate,
    pub deal_score: Decimal,
}

/// Validated score adjustment wrapped in the standard output envelope.
pub fn score_offer(input: &DealScoreInput) -> DealResult<ComputationOutput<DealScoreOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validation::validate_base_score(input.base_score)?;
    validation::validate_offer(input.list_price, input.offer_price, &mut warnings)?;

    let deal_score = adjust_deal_score(input.base_score, input.list_price, input.offer_price);
    if deal_score < Decimal::ZERO {
        warnings.push(format!(
            "Adjusted deal score {deal_score} is negative — above-asking offers are not floored at 0"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deal Score Adjustment (Base + Discount x 50, capped at 100)",
        input,
        warnings,
        elapsed,
        DealScoreOutput {
            base_score: input.base_score,
            discount_to_list: discount_fraction(input.list_price, input.offer_price),
            deal_score,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_offer_at_list_keeps_score() {
        assert_eq!(adjust_deal_score(dec!(72), dec!(400000), dec!(400000)), dec!(72));
    }

    #[test]
    fn test_discount_raises_score() {
        // 10% below list => +5 points
        assert_eq!(adjust_deal_score(dec!(60), dec!(300000), dec!(270000)), dec!(65));
    }

    #[test]
    fn test_clamped_at_100() {
        // 30% discount => +15, capped
        assert_eq!(adjust_deal_score(dec!(95), dec!(300000), dec!(210000)), dec!(100));
    }

    #[test]
    fn test_rounds_half_up() {
        // 1% discount => +0.5
        assert_eq!(adjust_deal_score(dec!(70), dec!(100000), dec!(99000)), dec!(71));
        // 1% premium => -0.5 rounds up to the higher integer
        assert_eq!(adjust_deal_score(dec!(70), dec!(100000), dec!(101000)), dec!(70));
    }

    #[test]
    fn test_above_asking_can_go_negative() {
        // Offer at 2x list: discount -1.0 => -50 points. No lower clamp.
        assert_eq!(adjust_deal_score(dec!(10), dec!(200000), dec!(400000)), dec!(-40));
    }

    #[test]
    fn test_zero_list_price_is_guarded() {
        assert_eq!(discount_fraction(Decimal::ZERO, dec!(100000)), Decimal::ZERO);
        assert_eq!(adjust_deal_score(dec!(55), Decimal::ZERO, dec!(100000)), dec!(55));
    }

    #[test]
    fn test_sub_cent_list_price_is_guarded() {
        let list = dec!(0.0000000000000000000000000001);
        assert_eq!(discount_fraction(list, dec!(300000)), Decimal::ZERO);
        assert_eq!(adjust_deal_score(dec!(60), list, dec!(300000)), dec!(60));
    }

    #[test]
    fn test_score_offer_envelope() {
        let input = DealScoreInput {
            base_score: dec!(62),
            list_price: dec!(250000),
            offer_price: dec!(225000),
        };
        let out = score_offer(&input).unwrap();
        assert_eq!(out.result.discount_to_list, dec!(0.1));
        assert_eq!(out.result.deal_score, dec!(67));
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_score_offer_rejects_out_of_range_base() {
        let input = DealScoreInput {
            base_score: dec!(101),
            list_price: dec!(250000),
            offer_price: dec!(225000),
        };
        assert!(score_offer(&input).is_err());
    }
}
