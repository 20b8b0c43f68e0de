use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AgriFinError;
use crate::money::{checked_total, is_whole_cents, MinorUnits};
use crate::terms::{monthly_rate, validate_inputs};
use crate::types::{Money, Percent, Rate};
use crate::AgriFinResult;

use super::payment::level_payment;

/// Largest residual the final period may absorb before the schedule is
/// rejected as drifted.
const DRIFT_TOLERANCE: Decimal = dec!(0.01);

const HUNDRED: Decimal = dec!(100);

/// How schedule amounts are carried between periods.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Full decimal precision; round only for display.
    #[default]
    Exact,
    /// Payment and per-period interest rounded to cents, balances in integer cents.
    MinorUnits,
}

/// One period of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub period: u32,
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

/// Period-by-period repayment of a level-payment loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub monthly_payment: Money,
    pub rounding: RoundingMode,
    pub entries: Vec<ScheduleEntry>,
}

impl AmortizationSchedule {
    pub fn term_months(&self) -> u32 {
        self.entries.len() as u32
    }

    /// Remaining balance after each period, starting with the principal.
    pub fn balance_curve(&self) -> Vec<Money> {
        std::iter::once(self.principal)
            .chain(self.entries.iter().map(|e| e.remaining_balance))
            .collect()
    }

    /// Amount of the last payment, which absorbs any rounding residual.
    pub fn final_payment(&self) -> Money {
        self.entries
            .last()
            .map(|e| e.payment)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Interest and repayment totals of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTotals {
    pub principal: Money,
    pub total_interest: Money,
    pub total_repayment: Money,
    pub principal_share_percent: Percent,
    pub interest_share_percent: Percent,
}

/// Build a full-precision schedule.
pub fn generate_schedule(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> AgriFinResult<AmortizationSchedule> {
    generate_schedule_with(principal, annual_rate_percent, term_months, RoundingMode::Exact)
}

/// Build a schedule using the given rounding mode.
pub fn generate_schedule_with(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
    rounding: RoundingMode,
) -> AgriFinResult<AmortizationSchedule> {
    validate_inputs(principal, annual_rate_percent, term_months)?;
    let rate = monthly_rate(annual_rate_percent);
    let payment = level_payment(principal, rate, term_months)?;
    debug!(%principal, %rate, %payment, term_months, ?rounding, "generating amortization schedule");

    let (monthly_payment, entries) = match rounding {
        RoundingMode::Exact => (payment, exact_entries(principal, rate, payment, term_months)?),
        RoundingMode::MinorUnits => {
            let payment = MinorUnits::from_money(payment)?;
            let entries = minor_unit_entries(principal, rate, payment, term_months)?;
            (payment.to_money(), entries)
        }
    };

    Ok(AmortizationSchedule {
        principal,
        monthly_rate: rate,
        monthly_payment,
        rounding,
        entries,
    })
}

/// Sum interest over the schedule and split the total repayment.
pub fn derive_totals(schedule: &AmortizationSchedule) -> AgriFinResult<LoanTotals> {
    let total_interest = checked_total(
        schedule.entries.iter().map(|e| e.interest_portion),
        "total interest",
    )?;
    let total_repayment = schedule
        .principal
        .checked_add(total_interest)
        .ok_or_else(|| AgriFinError::overflow("total repayment"))?;

    let principal_share_percent = if total_repayment.is_zero() {
        Decimal::ZERO
    } else {
        schedule.principal / total_repayment * HUNDRED
    };

    Ok(LoanTotals {
        principal: schedule.principal,
        total_interest,
        total_repayment,
        principal_share_percent,
        interest_share_percent: HUNDRED - principal_share_percent,
    })
}

// ---------------------------------------------------------------------------
// Period iteration
// ---------------------------------------------------------------------------

fn exact_entries(
    principal: Money,
    rate: Rate,
    payment: Money,
    periods: u32,
) -> AgriFinResult<Vec<ScheduleEntry>> {
    let mut entries = Vec::with_capacity(periods as usize);
    let mut balance = principal;

    for period in 1..=periods {
        let interest = balance
            .checked_mul(rate)
            .ok_or_else(|| AgriFinError::overflow(format!("interest for period {period}")))?;
        let mut principal_portion = (payment - interest).max(Decimal::ZERO);

        if period == periods {
            let residual = principal_portion - balance;
            if residual.abs() > DRIFT_TOLERANCE {
                warn!(%residual, period, "schedule drifted past one cent");
                return Err(AgriFinError::PrecisionDrift {
                    context: format!("final period {period} of {periods}"),
                    residual,
                });
            }
            principal_portion = balance;
        } else if principal_portion > balance {
            principal_portion = balance;
        }

        balance -= principal_portion;
        let period_payment = interest
            .checked_add(principal_portion)
            .ok_or_else(|| AgriFinError::overflow(format!("payment for period {period}")))?;
        entries.push(ScheduleEntry {
            period,
            payment: period_payment,
            interest_portion: interest,
            principal_portion,
            remaining_balance: balance,
        });
    }

    Ok(entries)
}

fn minor_unit_entries(
    principal: Money,
    rate: Rate,
    payment: MinorUnits,
    periods: u32,
) -> AgriFinResult<Vec<ScheduleEntry>> {
    if !is_whole_cents(principal) {
        return Err(AgriFinError::invalid(
            "principal",
            "Principal must be a whole number of cents for minor-unit rounding",
        ));
    }

    let mut entries = Vec::with_capacity(periods as usize);
    let mut balance = MinorUnits::from_money(principal)?;

    for period in 1..=periods {
        let accrued = balance
            .to_money()
            .checked_mul(rate)
            .ok_or_else(|| AgriFinError::overflow(format!("interest for period {period}")))?;
        let interest = MinorUnits::from_money(accrued)?;
        let scheduled = payment.checked_sub(interest)?.max(MinorUnits::ZERO);
        let principal_portion = if period == periods || scheduled > balance {
            balance
        } else {
            scheduled
        };

        balance = balance.checked_sub(principal_portion)?;
        entries.push(ScheduleEntry {
            period,
            payment: interest.checked_add(principal_portion)?.to_money(),
            interest_portion: interest.to_money(),
            principal_portion: principal_portion.to_money(),
            remaining_balance: balance.to_money(),
        });
    }

    Ok(entries)
}
