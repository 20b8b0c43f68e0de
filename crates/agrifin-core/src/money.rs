//! Currency precision helpers.
//!
//! Money is carried as `Decimal` everywhere. Rounding to cents happens only
//! where an amount is billed or displayed; `MinorUnits` is the integer-cents
//! form used by schedules that must balance to the cent.

use std::fmt;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AgriFinError;
use crate::types::{Money, Percent};
use crate::AgriFinResult;

/// Decimal places of the minor currency unit.
pub const CURRENCY_DP: u32 = 2;

const CENTS_PER_UNIT: Decimal = dec!(100);

/// Round to currency precision, midpoint away from zero.
pub fn round_to_cents(amount: Money) -> Money {
    amount.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `amount` has no fraction below one cent.
pub fn is_whole_cents(amount: Money) -> bool {
    round_to_cents(amount) == amount
}

/// An amount held as an integer count of minor currency units (cents).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl MinorUnits {
    pub const ZERO: MinorUnits = MinorUnits(0);

    pub fn new(cents: i64) -> Self {
        MinorUnits(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Convert a decimal amount, rounding to the nearest cent.
    pub fn from_money(amount: Money) -> AgriFinResult<Self> {
        round_to_cents(amount)
            .checked_mul(CENTS_PER_UNIT)
            .and_then(|scaled| scaled.to_i64())
            .map(MinorUnits)
            .ok_or_else(|| AgriFinError::overflow(format!("minor-unit conversion of {amount}")))
    }

    pub fn to_money(self) -> Money {
        Decimal::new(self.0, CURRENCY_DP)
    }

    pub fn checked_add(self, other: MinorUnits) -> AgriFinResult<Self> {
        self.0
            .checked_add(other.0)
            .map(MinorUnits)
            .ok_or_else(|| AgriFinError::overflow("minor-unit addition"))
    }

    pub fn checked_sub(self, other: MinorUnits) -> AgriFinResult<Self> {
        self.0
            .checked_sub(other.0)
            .map(MinorUnits)
            .ok_or_else(|| AgriFinError::overflow("minor-unit subtraction"))
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_money())
    }
}

// ---------------------------------------------------------------------------
// Display formatting
// ---------------------------------------------------------------------------

/// Format an amount as currency with thousands separators, e.g. `$1,289.70`.
pub fn format_currency(amount: Money, symbol: &str) -> String {
    let rounded = round_to_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (whole, frac) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{sign}{symbol}{}.{frac}", group_thousands(whole))
}

/// Format a percentage with a trailing `%`, e.g. `8.4%`.
pub fn format_percent(value: Percent) -> String {
    format!("{}%", value.round_dp(CURRENCY_DP).normalize())
}

/// Sum amounts, failing with `Overflow` instead of panicking past `Decimal` range.
pub fn checked_total<I>(amounts: I, context: &str) -> AgriFinResult<Money>
where
    I: IntoIterator<Item = Money>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, |acc, amount| {
        acc.checked_add(amount)
            .ok_or_else(|| AgriFinError::overflow(context))
    })
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_cents_midpoint() {
        assert_eq!(round_to_cents(dec!(1289.695)), dec!(1289.70));
        assert_eq!(round_to_cents(dec!(-0.005)), dec!(-0.01));
        assert_eq!(round_to_cents(dec!(1289.6954253654)), dec!(1289.70));
    }

    #[test]
    fn test_minor_units_round_trip() {
        let cents = MinorUnits::from_money(dec!(8780.30)).unwrap();
        assert_eq!(cents.cents(), 878_030);
        assert_eq!(cents.to_money(), dec!(8780.30));
    }

    #[test]
    fn test_minor_units_rounds_sub_cent() {
        let cents = MinorUnits::from_money(dec!(70.004)).unwrap();
        assert_eq!(cents, MinorUnits::new(7000));
    }

    #[test]
    fn test_minor_units_overflow() {
        let result = MinorUnits::from_money(Decimal::MAX);
        assert!(matches!(result, Err(AgriFinError::Overflow { .. })));
    }

    #[test]
    fn test_minor_units_checked_sub() {
        let a = MinorUnits::new(128_970);
        let b = MinorUnits::new(7_000);
        assert_eq!(a.checked_sub(b).unwrap(), MinorUnits::new(121_970));
        assert!(MinorUnits::new(i64::MIN).checked_sub(b).is_err());
    }

    #[test]
    fn test_checked_total() {
        assert_eq!(
            checked_total([dec!(1289.70), dec!(1289.66)], "payments").unwrap(),
            dec!(2579.36)
        );
        let err = checked_total([Decimal::MAX, dec!(1)], "payments").unwrap_err();
        assert!(matches!(err, AgriFinError::Overflow { .. }));
    }

    #[test]
    fn test_is_whole_cents() {
        assert!(is_whole_cents(dec!(100.25)));
        assert!(!is_whole_cents(dec!(100.255)));
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(dec!(1289.6954), "$"), "$1,289.70");
        assert_eq!(format_currency(dec!(1234567.891), "$"), "$1,234,567.89");
        assert_eq!(format_currency(dec!(999), "KES "), "KES 999.00");
        assert_eq!(format_currency(dec!(-2500.5), "$"), "-$2,500.50");
        assert_eq!(format_currency(dec!(-0.001), "$"), "$0.00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(8.4)), "8.4%");
        assert_eq!(format_percent(dec!(12.00)), "12%");
        assert_eq!(format_percent(dec!(33.3333)), "33.33%");
    }
}
