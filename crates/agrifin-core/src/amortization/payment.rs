use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;

use crate::error::AgriFinError;
use crate::terms::{monthly_rate, validate_inputs};
use crate::types::{Money, Percent, Rate};
use crate::AgriFinResult;

/// Fixed monthly payment that repays `principal` over `term_months` periods.
///
/// `annual_rate_percent` is the nominal annual rate in percent; it is
/// compounded monthly. The result is unrounded; round with
/// [`crate::money::round_to_cents`] only when displaying it.
pub fn compute_monthly_payment(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> AgriFinResult<Money> {
    validate_inputs(principal, annual_rate_percent, term_months)?;
    level_payment(principal, monthly_rate(annual_rate_percent), term_months)
}

/// Annuity payment for an already-validated principal, monthly rate and term.
pub(crate) fn level_payment(principal: Money, rate: Rate, periods: u32) -> AgriFinResult<Money> {
    let n = Decimal::from(periods);
    if rate.is_zero() {
        return Ok(principal / n);
    }

    let growth = (Decimal::ONE + rate)
        .checked_powi(i64::from(periods))
        .ok_or_else(|| AgriFinError::overflow(format!("compound factor over {periods} periods")))?;
    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        // Rate below decimal resolution over this term.
        return Ok(principal / n);
    }

    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(growth))
        .and_then(|v| v.checked_div(denominator))
        .ok_or_else(|| AgriFinError::overflow("monthly payment"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_rate_is_straight_line() {
        let pmt = compute_monthly_payment(dec!(1200), Decimal::ZERO, 12).unwrap();
        assert_eq!(pmt, dec!(100));
    }

    #[test]
    fn test_single_period_repays_one_period_of_interest() {
        // r = 8.4% / 12 = 0.007
        let pmt = compute_monthly_payment(dec!(5000), dec!(8.4), 1).unwrap();
        assert_eq!(pmt, dec!(5035));
    }

    #[test]
    fn test_known_payment() {
        let pmt = compute_monthly_payment(dec!(10000), dec!(8.4), 8).unwrap();
        assert!((pmt - dec!(1289.6954253654)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_thirty_year_payment() {
        let pmt = compute_monthly_payment(dec!(100000), dec!(6), 360).unwrap();
        assert!((pmt - dec!(599.5505)).abs() < dec!(0.0001));
    }

    #[test]
    fn test_rejects_zero_term() {
        let err = compute_monthly_payment(dec!(1000), dec!(5), 0).unwrap_err();
        assert!(matches!(err, AgriFinError::InvalidInput { .. }));
    }

    #[test]
    fn test_rejects_term_beyond_maximum() {
        let err = compute_monthly_payment(dec!(100), Decimal::ZERO, 4_000_000_000).unwrap_err();
        assert!(matches!(err, AgriFinError::InvalidInput { ref field, .. } if field == "term"));
        assert!(compute_monthly_payment(dec!(100), Decimal::ZERO, 1201).is_err());
    }

    #[test]
    fn test_extreme_rate_overflows_cleanly() {
        let err = compute_monthly_payment(dec!(1000), dec!(1000), 1200).unwrap_err();
        assert!(matches!(err, AgriFinError::Overflow { .. }));
    }
}
