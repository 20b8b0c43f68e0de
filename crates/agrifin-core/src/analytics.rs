//! Borrower loan analytics: the dashboard figures over all of a borrower's
//! loans (amounts borrowed and repaid, interest paid, upcoming payment,
//! per-loan breakdown, recent payment activity and status distribution).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::time::Instant;
use tracing::debug;

use crate::error::AgriFinError;
use crate::money::checked_total;
use crate::repayment::tracking::{loan_warnings, summarize_loan};
use crate::repayment::{LoanRecord, LoanStatus, NextPayment, PaymentStatus};
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::AgriFinResult;

/// Number of payments shown in the recent-activity list by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

// ---------------------------------------------------------------------------
// Input / output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsInput {
    pub loans: Vec<LoanRecord>,
    pub as_of: NaiveDate,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanBreakdown {
    pub loan_id: String,
    pub amount: Money,
    pub scheduled_interest: Money,
    pub status: LoanStatus,
    pub repaid_amount: Money,
    pub remaining_amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentHistoryEntry {
    pub payment_id: String,
    pub loan_id: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusDistribution {
    pub status: LoanStatus,
    pub count: u32,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanAnalytics {
    pub total_loans: u32,
    pub active_loans: u32,
    pub total_amount_borrowed: Money,
    pub total_amount_repaid: Money,
    pub total_interest_paid: Money,
    pub outstanding_balance: Money,
    pub repayment_progress_percent: Percent,
    pub average_loan_amount: Money,
    pub overdue_payments: u32,
    pub next_payment: Option<NextPayment>,
    pub loan_breakdown: Vec<LoanBreakdown>,
    pub payment_history: Vec<PaymentHistoryEntry>,
    pub status_distribution: Vec<StatusDistribution>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the borrower dashboard over a set of loans.
pub fn borrower_analytics(
    input: &AnalyticsInput,
) -> AgriFinResult<ComputationOutput<LoanAnalytics>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut total_amount_borrowed = Decimal::ZERO;
    let mut total_amount_repaid = Decimal::ZERO;
    let mut total_interest_paid = Decimal::ZERO;
    let mut overdue_payments = 0u32;
    let mut loan_breakdown = Vec::with_capacity(input.loans.len());

    for loan in &input.loans {
        let summary = summarize_loan(loan, input.as_of)?;
        warnings.extend(loan_warnings(loan, &summary));

        total_amount_borrowed = add(total_amount_borrowed, summary.principal, "amount borrowed")?;
        total_amount_repaid = add(total_amount_repaid, summary.repaid_amount, "amount repaid")?;
        total_interest_paid = add(total_interest_paid, summary.interest_paid, "interest paid")?;
        overdue_payments += summary.overdue_count;

        loan_breakdown.push(LoanBreakdown {
            loan_id: summary.loan_id,
            amount: summary.principal,
            scheduled_interest: summary.scheduled_interest,
            status: summary.status,
            repaid_amount: summary.repaid_amount,
            remaining_amount: summary.remaining_amount,
        });
    }

    let total_loans = input.loans.len() as u32;
    let active_loans = count_with_status(&input.loans, LoanStatus::Approved);

    let repayment_progress_percent = if total_amount_borrowed.is_zero() {
        Decimal::ZERO
    } else {
        total_amount_repaid
            .checked_div(total_amount_borrowed)
            .and_then(|share| share.checked_mul(dec!(100)))
            .ok_or_else(|| AgriFinError::overflow("portfolio repayment progress"))?
    };
    let average_loan_amount = if total_loans == 0 {
        Decimal::ZERO
    } else {
        total_amount_borrowed / Decimal::from(total_loans)
    };

    let next_payment = input
        .loans
        .iter()
        .filter_map(|l| l.next_payment())
        .min_by_key(|p| p.due_date);

    if input.loans.is_empty() {
        warnings.push("No loans supplied; all figures are zero".into());
    }

    debug!(total_loans, active_loans, %total_amount_borrowed, %total_amount_repaid, "computed borrower analytics");

    let analytics = LoanAnalytics {
        total_loans,
        active_loans,
        total_amount_borrowed,
        total_amount_repaid,
        total_interest_paid,
        outstanding_balance: total_amount_borrowed - total_amount_repaid,
        repayment_progress_percent,
        average_loan_amount,
        overdue_payments,
        next_payment,
        loan_breakdown,
        payment_history: payment_history(&input.loans, input.as_of, input.history_limit),
        status_distribution: status_distribution(&input.loans)?,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Borrower loan analytics",
        &serde_json::json!({
            "loans": input.loans.len(),
            "as_of": input.as_of,
            "history_limit": input.history_limit,
        }),
        warnings,
        elapsed,
        analytics,
    ))
}

/// Most recent payment activity, newest first, at most `limit` entries.
pub fn payment_history(
    loans: &[LoanRecord],
    as_of: NaiveDate,
    limit: usize,
) -> Vec<PaymentHistoryEntry> {
    let mut entries: Vec<(NaiveDate, PaymentHistoryEntry)> = loans
        .iter()
        .flat_map(|loan| {
            loan.payments.iter().map(move |p| {
                (
                    p.activity_date(),
                    PaymentHistoryEntry {
                        payment_id: p.id.clone(),
                        loan_id: loan.id.clone(),
                        amount: p.amount,
                        due_date: p.due_date,
                        paid_date: p.paid_date,
                        status: p.effective_status(as_of),
                    },
                )
            })
        })
        .collect();

    entries.sort_by_key(|(date, _)| Reverse(*date));
    entries.into_iter().take(limit).map(|(_, e)| e).collect()
}

/// Loan count and principal per status, in [`LoanStatus::ALL`] order.
pub fn status_distribution(loans: &[LoanRecord]) -> AgriFinResult<Vec<StatusDistribution>> {
    LoanStatus::ALL
        .iter()
        .map(|&status| {
            let matching = loans.iter().filter(|l| l.status == status);
            Ok(StatusDistribution {
                status,
                count: matching.clone().count() as u32,
                amount: checked_total(matching.map(|l| l.principal()), "status distribution")?,
            })
        })
        .collect()
}

fn add(total: Money, amount: Money, context: &str) -> AgriFinResult<Money> {
    total
        .checked_add(amount)
        .ok_or_else(|| AgriFinError::overflow(format!("portfolio {context}")))
}

fn count_with_status(loans: &[LoanRecord], status: LoanStatus) -> u32 {
    loans.iter().filter(|l| l.status == status).count() as u32
}
