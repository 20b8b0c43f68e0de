//! Installment plans and repayment tracking for booked loans.

pub mod plan;
pub mod tracking;

pub use plan::{build_installments, due_date, Installment, InstallmentPlan, InstallmentPlanInput};
pub use tracking::{
    analyze_loan, summarize_loan, LoanRecord, LoanRepaymentSummary, LoanStatus, LoanSummaryInput,
    NextPayment, PaymentRecord, PaymentStatus,
};
