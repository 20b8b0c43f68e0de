use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use agrifin_core::amortization::{AmortizationInput, AmortizationSchedule};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_decimal(value: &str) -> NapiResult<Decimal> {
    Decimal::from_str(value.trim()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Amortization
// ---------------------------------------------------------------------------

#[derive(serde::Deserialize)]
struct PaymentBindingInput {
    principal: Decimal,
    annual_interest_rate_percent: Decimal,
    term_months: u32,
}

/// Unrounded monthly payment as a decimal string.
#[napi]
pub fn compute_monthly_payment(input_json: String) -> NapiResult<String> {
    let input: PaymentBindingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let payment = agrifin_core::amortization::compute_monthly_payment(
        input.principal,
        input.annual_interest_rate_percent,
        input.term_months,
    )
    .map_err(to_napi_error)?;
    Ok(payment.to_string())
}

#[napi]
pub fn quote_payment(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = agrifin_core::amortization::quote_payment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Bare schedule (no envelope), for charting the balance curve.
#[napi]
pub fn generate_schedule(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let term_months = input.terms.term_months().map_err(to_napi_error)?;
    let schedule = agrifin_core::amortization::generate_schedule_with(
        input.terms.principal,
        input.terms.annual_interest_rate_percent,
        term_months,
        input.rounding,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&schedule).map_err(to_napi_error)
}

/// Totals of a schedule previously returned by `generateSchedule`.
#[napi]
pub fn derive_totals(schedule_json: String) -> NapiResult<String> {
    let schedule: AmortizationSchedule =
        serde_json::from_str(&schedule_json).map_err(to_napi_error)?;
    let totals = agrifin_core::amortization::derive_totals(&schedule).map_err(to_napi_error)?;
    serde_json::to_string(&totals).map_err(to_napi_error)
}

#[napi]
pub fn amortize(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = agrifin_core::amortization::amortize(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn amortize_product(input_json: String) -> NapiResult<String> {
    let input: agrifin_core::amortization::ProductAmortizationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = agrifin_core::amortization::amortize_product(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Repayment
// ---------------------------------------------------------------------------

#[napi]
pub fn build_installments(input_json: String) -> NapiResult<String> {
    let input: agrifin_core::repayment::InstallmentPlanInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = agrifin_core::repayment::build_installments(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn summarize_loan(input_json: String) -> NapiResult<String> {
    let input: agrifin_core::repayment::LoanSummaryInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = agrifin_core::repayment::analyze_loan(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn borrower_analytics(input_json: String) -> NapiResult<String> {
    let input: agrifin_core::analytics::AnalyticsInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = agrifin_core::analytics::borrower_analytics(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

#[napi]
pub fn format_currency(amount: String, symbol: Option<String>) -> NapiResult<String> {
    let amount = parse_decimal(&amount)?;
    Ok(agrifin_core::money::format_currency(
        amount,
        symbol.as_deref().unwrap_or("$"),
    ))
}

#[napi]
pub fn format_percent(value: String) -> NapiResult<String> {
    Ok(agrifin_core::money::format_percent(parse_decimal(&value)?))
}
