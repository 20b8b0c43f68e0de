//! Level-payment loan amortization.
//!
//! One implementation of the monthly payment formula and the schedule built
//! from it, shared by every consumer that previews, summarises or charts a
//! loan. All math in `rust_decimal::Decimal`.

pub mod payment;
pub mod schedule;

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::money::round_to_cents;
use crate::terms::{LoanProduct, LoanTerms, TermUnit};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::AgriFinResult;

pub use payment::compute_monthly_payment;
pub use schedule::{
    derive_totals, generate_schedule, generate_schedule_with, AmortizationSchedule, LoanTotals,
    RoundingMode, ScheduleEntry,
};

/// Terms longer than this draw a warning.
const LONG_TERM_MONTHS: u32 = 360;

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

/// Loan terms plus the rounding mode to amortize them with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    #[serde(default)]
    pub rounding: RoundingMode,
}

/// A catalog loan product to amortize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAmortizationInput {
    pub product: LoanProduct,
    #[serde(default)]
    pub rounding: RoundingMode,
}

/// Monthly payment preview for a loan application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentQuote {
    pub term_months: u32,
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    pub monthly_payment_rounded: Money,
}

/// Full amortization of a loan: payment, totals and schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    pub term_months: u32,
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    pub final_payment: Money,
    #[serde(flatten)]
    pub totals: LoanTotals,
    pub schedule: Vec<ScheduleEntry>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Quote the fixed monthly payment for a set of loan terms.
pub fn quote_payment(input: &AmortizationInput) -> AgriFinResult<ComputationOutput<PaymentQuote>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    input.terms.validate()?;
    let term_months = input.terms.term_months()?;
    term_warnings(&input.terms, term_months, &mut warnings);

    let monthly_payment = compute_monthly_payment(
        input.terms.principal,
        input.terms.annual_interest_rate_percent,
        term_months,
    )?;

    let quote = PaymentQuote {
        term_months,
        monthly_rate: input.terms.monthly_rate(),
        monthly_payment,
        monthly_payment_rounded: round_to_cents(monthly_payment),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment annuity (monthly compounding)",
        input,
        warnings,
        elapsed,
        quote,
    ))
}

/// Amortize a set of loan terms into a schedule with totals.
pub fn amortize(input: &AmortizationInput) -> AgriFinResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    input.terms.validate()?;
    let term_months = input.terms.term_months()?;
    term_warnings(&input.terms, term_months, &mut warnings);

    let output = build_output(&input.terms, term_months, input.rounding, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology(input.rounding),
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Amortize a loan product from the backend catalog.
pub fn amortize_product(
    input: &ProductAmortizationInput,
) -> AgriFinResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    if input.product.interest.is_none() {
        warnings.push("Product carries no interest rate; amortized interest-free".into());
    }
    if input.product.term.is_none() {
        warnings.push("Product carries no term; defaulted to 12 months".into());
    }

    let terms = input.product.to_terms()?;
    let term_months = terms.term_months()?;
    term_warnings(&terms, term_months, &mut warnings);

    let output = build_output(&terms, term_months, input.rounding, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology(input.rounding),
        input,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn build_output(
    terms: &LoanTerms,
    term_months: u32,
    rounding: RoundingMode,
    warnings: &mut Vec<String>,
) -> AgriFinResult<AmortizationOutput> {
    let schedule = generate_schedule_with(
        terms.principal,
        terms.annual_interest_rate_percent,
        term_months,
        rounding,
    )?;
    let totals = derive_totals(&schedule)?;
    let final_payment = schedule.final_payment();

    if rounding == RoundingMode::MinorUnits && final_payment != schedule.monthly_payment {
        warnings.push(format!(
            "Final payment adjusted to {final_payment} to close the balance (regular payment {})",
            schedule.monthly_payment
        ));
    }

    Ok(AmortizationOutput {
        term_months,
        monthly_rate: schedule.monthly_rate,
        monthly_payment: schedule.monthly_payment,
        final_payment,
        totals,
        schedule: schedule.entries,
    })
}

fn term_warnings(terms: &LoanTerms, term_months: u32, warnings: &mut Vec<String>) {
    if terms.term_unit == TermUnit::Years {
        warnings.push(format!(
            "Term of {} years amortized as {term_months} monthly periods",
            terms.term_count
        ));
    }
    if term_months > LONG_TERM_MONTHS {
        warnings.push(format!(
            "Term of {term_months} months exceeds {LONG_TERM_MONTHS}; check the term unit"
        ));
    }
}

fn methodology(rounding: RoundingMode) -> &'static str {
    match rounding {
        RoundingMode::Exact => "Level-payment amortization (full decimal precision)",
        RoundingMode::MinorUnits => "Level-payment amortization (integer minor units)",
    }
}
