use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::amortization::{derive_totals, generate_schedule_with, RoundingMode};
use crate::error::AgriFinError;
use crate::terms::LoanTerms;
use crate::types::{with_metadata, ComputationOutput, Money};
use crate::AgriFinResult;

use super::tracking::{PaymentRecord, PaymentStatus};

/// Loan terms and the date the loan was booked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPlanInput {
    #[serde(flatten)]
    pub terms: LoanTerms,
    pub origination_date: NaiveDate,
}

/// A billed monthly installment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub number: u32,
    pub due_date: NaiveDate,
    pub amount: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub status: PaymentStatus,
}

/// Dated installments for a newly booked loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPlan {
    pub term_months: u32,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_repayment: Money,
    pub first_due_date: NaiveDate,
    pub final_due_date: NaiveDate,
    pub installments: Vec<Installment>,
}

impl InstallmentPlan {
    /// Payment records for the plan, ids derived from the loan id.
    pub fn payment_records(&self, loan_id: &str) -> Vec<PaymentRecord> {
        self.installments
            .iter()
            .map(|i| PaymentRecord {
                id: format!("{loan_id}-{}", i.number),
                amount: i.amount,
                due_date: i.due_date,
                paid_date: None,
                status: i.status,
            })
            .collect()
    }
}

/// Due date of installment `number` (1-based).
///
/// The first installment falls one month after origination (clamped to the
/// end of a shorter month) and each later one is counted in whole months from
/// that first date, so a Jan 31 loan is due Feb 28, Mar 28, Apr 28.
pub fn due_date(origination_date: NaiveDate, number: u32) -> AgriFinResult<NaiveDate> {
    let out_of_range = || {
        AgriFinError::DateError(format!(
            "installment {number} after {origination_date} is out of calendar range"
        ))
    };
    let offset = number.checked_sub(1).ok_or_else(|| {
        AgriFinError::DateError("installment numbers start at 1".into())
    })?;

    origination_date
        .checked_add_months(Months::new(1))
        .and_then(|first| first.checked_add_months(Months::new(offset)))
        .ok_or_else(out_of_range)
}

/// Build the monthly installments for a loan booked on `origination_date`.
///
/// Installments are billed in whole cents; the last one absorbs the rounding
/// residual so the plan repays exactly principal plus interest.
pub fn build_installments(
    input: &InstallmentPlanInput,
) -> AgriFinResult<ComputationOutput<InstallmentPlan>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.terms.validate()?;
    let term_months = input.terms.term_months()?;

    let schedule = generate_schedule_with(
        input.terms.principal,
        input.terms.annual_interest_rate_percent,
        term_months,
        RoundingMode::MinorUnits,
    )?;
    let totals = derive_totals(&schedule)?;

    let installments = schedule
        .entries
        .iter()
        .map(|entry| {
            Ok(Installment {
                number: entry.period,
                due_date: due_date(input.origination_date, entry.period)?,
                amount: entry.payment,
                principal_portion: entry.principal_portion,
                interest_portion: entry.interest_portion,
                status: PaymentStatus::Pending,
            })
        })
        .collect::<AgriFinResult<Vec<_>>>()?;

    let (first_due_date, final_due_date) = match (installments.first(), installments.last()) {
        (Some(first), Some(last)) => (first.due_date, last.due_date),
        _ => {
            return Err(AgriFinError::invalid(
                "term",
                "Term must be at least one period",
            ))
        }
    };

    if input.origination_date.day0() >= 28 {
        warnings.push(format!(
            "Origination on day {} of the month; due dates follow the first installment's day",
            input.origination_date.day0() + 1
        ));
    }

    debug!(term_months, %final_due_date, "built installment plan");

    let plan = InstallmentPlan {
        term_months,
        monthly_payment: schedule.monthly_payment,
        total_interest: totals.total_interest,
        total_repayment: totals.total_repayment,
        first_due_date,
        final_due_date,
        installments,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Monthly installment plan (integer minor units)",
        input,
        warnings,
        elapsed,
        plan,
    ))
}
