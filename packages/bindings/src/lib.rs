use napi::Result as NapiResult;
use napi_derive::napi;
use serde::Deserialize;

use rental_deal_core::deal_analysis::Assumptions;
use rental_deal_core::underwriting::cash_flow::CashFlowInput;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// A single offer plus optional assumption overrides, as sent by the UI.
#[derive(Deserialize)]
struct OfferRequest {
    #[serde(flatten)]
    input: CashFlowInput,
    #[serde(default)]
    assumptions: Assumptions,
}

#[derive(Deserialize)]
struct SnapshotRequest {
    name: String,
    #[serde(flatten)]
    offer: OfferRequest,
}

// ---------------------------------------------------------------------------
// Underwriting
// ---------------------------------------------------------------------------

#[napi]
pub fn mortgage_payment(input_json: String) -> NapiResult<String> {
    let input: rental_deal_core::underwriting::mortgage::MortgageInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rental_deal_core::underwriting::mortgage::mortgage_summary(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn cash_flow(input_json: String) -> NapiResult<String> {
    let request: OfferRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rental_deal_core::underwriting::cash_flow::cash_flow_analysis(
        &request.input,
        &request.assumptions.expense_rates,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn adjust_deal_score(input_json: String) -> NapiResult<String> {
    let input: rental_deal_core::underwriting::deal_score::DealScoreInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rental_deal_core::underwriting::deal_score::score_offer(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Stress testing
// ---------------------------------------------------------------------------

#[napi]
pub fn stress_test(input_json: String) -> NapiResult<String> {
    let request: OfferRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rental_deal_core::stress_test::sensitivity::stress_test(
        &request.input,
        &request.assumptions.expense_rates,
        &request.assumptions.stress_test,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn analyze_deal(input_json: String) -> NapiResult<String> {
    let input: rental_deal_core::deal_analysis::DealInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rental_deal_core::deal_analysis::analyze_deal(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn offer_grid(input_json: String) -> NapiResult<String> {
    let input: rental_deal_core::scenarios::offer_grid::OfferGridInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rental_deal_core::scenarios::offer_grid::evaluate_offer_grid(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Returns the snapshot in the standard envelope; pass `result` on to
/// `compare_scenarios`.
#[napi]
pub fn capture_scenario(input_json: String) -> NapiResult<String> {
    let request: SnapshotRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rental_deal_core::scenarios::saved::capture_scenario(
        &request.name,
        &request.offer.input,
        &request.offer.assumptions.expense_rates,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn compare_scenarios(input_json: String) -> NapiResult<String> {
    let scenarios: Vec<rental_deal_core::scenarios::saved::SavedScenario> =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        rental_deal_core::scenarios::saved::compare_scenarios(&scenarios).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
