use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::error::AgriFinError;
use crate::terms::LoanProduct;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::AgriFinResult;

/// Review state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Pending,
        LoanStatus::Approved,
        LoanStatus::Rejected,
        LoanStatus::Paid,
    ];
}

/// State of a single installment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Overdue,
}

/// A scheduled payment on a loan, as recorded by the lender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: String,
    pub amount: Money,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paid_date: Option<NaiveDate>,
    pub status: PaymentStatus,
}

impl PaymentRecord {
    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }

    /// Status as of `as_of`: an unpaid installment past its due date is overdue.
    pub fn effective_status(&self, as_of: NaiveDate) -> PaymentStatus {
        match self.status {
            PaymentStatus::Paid => PaymentStatus::Paid,
            PaymentStatus::Overdue => PaymentStatus::Overdue,
            PaymentStatus::Pending if self.due_date < as_of => PaymentStatus::Overdue,
            PaymentStatus::Pending => PaymentStatus::Pending,
        }
    }

    /// Date used to order payment history: when it was paid, else when it is due.
    pub fn activity_date(&self) -> NaiveDate {
        self.paid_date.unwrap_or(self.due_date)
    }
}

/// A loan with its product details and payment records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: String,
    pub status: LoanStatus,
    pub details: LoanProduct,
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
}

impl LoanRecord {
    pub fn principal(&self) -> Money {
        self.details.amount
    }

    /// Earliest unpaid payment by due date.
    pub fn next_payment(&self) -> Option<NextPayment> {
        self.payments
            .iter()
            .filter(|p| !p.is_paid())
            .min_by_key(|p| p.due_date)
            .map(|p| NextPayment {
                loan_id: self.id.clone(),
                payment_id: p.id.clone(),
                due_date: p.due_date,
                amount: p.amount,
            })
    }
}

/// The next installment a borrower owes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextPayment {
    pub loan_id: String,
    pub payment_id: String,
    pub due_date: NaiveDate,
    pub amount: Money,
}

/// Repayment position of a single loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRepaymentSummary {
    pub loan_id: String,
    pub status: LoanStatus,
    pub principal: Money,
    pub repaid_amount: Money,
    pub remaining_amount: Money,
    /// Paid amounts beyond the principal, floored at zero.
    pub interest_paid: Money,
    /// All scheduled amounts beyond the principal, floored at zero.
    pub scheduled_interest: Money,
    pub paid_count: u32,
    pub pending_count: u32,
    pub overdue_count: u32,
    pub repayment_progress_percent: Percent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_payment: Option<NextPayment>,
}

/// Loan to summarise and the date to judge due dates against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummaryInput {
    pub loan: LoanRecord,
    pub as_of: NaiveDate,
}

/// Summarise how far a loan has been repaid as of `as_of`.
pub fn summarize_loan(loan: &LoanRecord, as_of: NaiveDate) -> AgriFinResult<LoanRepaymentSummary> {
    validate_loan(loan)?;

    let mut repaid_amount = Decimal::ZERO;
    let mut remaining_amount = Decimal::ZERO;
    let (mut paid_count, mut pending_count, mut overdue_count) = (0u32, 0u32, 0u32);

    for payment in &loan.payments {
        let (total, count) = match payment.effective_status(as_of) {
            PaymentStatus::Paid => (&mut repaid_amount, &mut paid_count),
            PaymentStatus::Pending => (&mut remaining_amount, &mut pending_count),
            PaymentStatus::Overdue => (&mut remaining_amount, &mut overdue_count),
        };
        *total = total.checked_add(payment.amount).ok_or_else(|| {
            AgriFinError::overflow(format!("payment totals of loan {}", loan.id))
        })?;
        *count += 1;
    }

    let principal = loan.principal();
    let scheduled = repaid_amount
        .checked_add(remaining_amount)
        .ok_or_else(|| AgriFinError::overflow(format!("scheduled total of loan {}", loan.id)))?;
    let repayment_progress_percent = if scheduled.is_zero() {
        Decimal::ZERO
    } else {
        repaid_amount / scheduled * dec!(100)
    };

    debug!(loan_id = %loan.id, %repaid_amount, %remaining_amount, overdue_count, "summarized loan");

    Ok(LoanRepaymentSummary {
        loan_id: loan.id.clone(),
        status: loan.status,
        principal,
        repaid_amount,
        remaining_amount,
        interest_paid: (repaid_amount - principal).max(Decimal::ZERO),
        scheduled_interest: (scheduled - principal).max(Decimal::ZERO),
        paid_count,
        pending_count,
        overdue_count,
        repayment_progress_percent,
        next_payment: loan.next_payment(),
    })
}

/// Summarise a loan inside the standard computation envelope.
pub fn analyze_loan(
    input: &LoanSummaryInput,
) -> AgriFinResult<ComputationOutput<LoanRepaymentSummary>> {
    let start = Instant::now();
    let summary = summarize_loan(&input.loan, input.as_of)?;
    let warnings = loan_warnings(&input.loan, &summary);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan repayment tracking",
        &serde_json::json!({
            "loan_id": input.loan.id,
            "as_of": input.as_of,
            "payments": input.loan.payments.len(),
        }),
        warnings,
        elapsed,
        summary,
    ))
}

pub(crate) fn validate_loan(loan: &LoanRecord) -> AgriFinResult<()> {
    if loan.details.amount <= Decimal::ZERO {
        return Err(AgriFinError::invalid(
            "details.amount",
            format!("Loan {} must have a positive amount", loan.id),
        ));
    }
    if let Some(p) = loan.payments.iter().find(|p| p.amount < Decimal::ZERO) {
        return Err(AgriFinError::invalid(
            "payments.amount",
            format!("Payment {} on loan {} has a negative amount", p.id, loan.id),
        ));
    }
    Ok(())
}

pub(crate) fn loan_warnings(loan: &LoanRecord, summary: &LoanRepaymentSummary) -> Vec<String> {
    let mut warnings = Vec::new();
    if loan.status == LoanStatus::Paid && !summary.remaining_amount.is_zero() {
        warnings.push(format!(
            "Loan {} is marked PAID but {} remains unpaid",
            loan.id, summary.remaining_amount
        ));
    }
    if loan.payments.iter().any(|p| p.is_paid() && p.paid_date.is_none()) {
        warnings.push(format!(
            "Loan {} has PAID payments without a paid date",
            loan.id
        ));
    }
    warnings
}
