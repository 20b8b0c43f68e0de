//! Loan terms: the immutable input to every calculation, and the loan-product
//! shape the lending backend publishes in its catalog.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AgriFinError;
use crate::types::{Money, Percent, Rate};
use crate::AgriFinResult;

/// Term used by the backend when a loan request carries none.
pub const DEFAULT_TERM_MONTHS: u32 = 12;

/// Longest term accepted, one hundred years of monthly periods.
pub const MAX_TERM_MONTHS: u32 = 1200;

const MONTHS_PER_YEAR: u32 = 12;
const MONTHS_PER_YEAR_DEC: Decimal = dec!(12);
const PERCENT: Decimal = dec!(100);

/// Unit of a loan's `term_count`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermUnit {
    #[default]
    Months,
    Years,
}

/// Principal, rate and term of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// Annual nominal rate in percent (8.5 = 8.5% per year).
    pub annual_interest_rate_percent: Percent,
    pub term_count: u32,
    #[serde(default)]
    pub term_unit: TermUnit,
}

impl LoanTerms {
    pub fn monthly(principal: Money, annual_interest_rate_percent: Percent, months: u32) -> Self {
        LoanTerms {
            principal,
            annual_interest_rate_percent,
            term_count: months,
            term_unit: TermUnit::Months,
        }
    }

    pub fn validate(&self) -> AgriFinResult<()> {
        validate_inputs(
            self.principal,
            self.annual_interest_rate_percent,
            self.term_months()?,
        )
    }

    /// Number of monthly periods. Years are converted at twelve months each.
    pub fn term_months(&self) -> AgriFinResult<u32> {
        match self.term_unit {
            TermUnit::Months => Ok(self.term_count),
            TermUnit::Years => self
                .term_count
                .checked_mul(MONTHS_PER_YEAR)
                .ok_or_else(|| AgriFinError::overflow("term conversion from years")),
        }
    }

    pub fn monthly_rate(&self) -> Rate {
        monthly_rate(self.annual_interest_rate_percent)
    }
}

/// Convert an annual percentage rate to a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR_DEC
}

/// Shared input checks for every amortization entry point.
pub fn validate_inputs(
    principal: Money,
    annual_rate_percent: Percent,
    term_months: u32,
) -> AgriFinResult<()> {
    if principal <= Decimal::ZERO {
        return Err(AgriFinError::invalid(
            "principal",
            "Principal must be positive",
        ));
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(AgriFinError::invalid(
            "annual_interest_rate_percent",
            "Interest rate cannot be negative",
        ));
    }
    if term_months == 0 {
        return Err(AgriFinError::invalid(
            "term",
            "Term must be at least one period",
        ));
    }
    if term_months > MAX_TERM_MONTHS {
        return Err(AgriFinError::invalid(
            "term",
            format!("Term of {term_months} months exceeds the {MAX_TERM_MONTHS}-month maximum"),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Loan product (backend catalog shape)
// ---------------------------------------------------------------------------

/// A loan product as published by the lending backend.
///
/// `term` arrives as a plain JSON number and `interest` may be omitted on
/// older products; both are checked when converting to [`LoanTerms`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest: Option<Percent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term: Option<Decimal>,
    #[serde(default, alias = "termType")]
    pub term_type: TermUnit,
}

impl LoanProduct {
    /// Convert to validated loan terms.
    ///
    /// Missing interest is treated as an interest-free product and a missing
    /// term falls back to twelve months, matching how loan requests are
    /// booked.
    pub fn to_terms(&self) -> AgriFinResult<LoanTerms> {
        let (term_count, term_unit) = match self.term {
            Some(term) => (whole_term(term)?, self.term_type),
            None => (DEFAULT_TERM_MONTHS, TermUnit::Months),
        };

        let terms = LoanTerms {
            principal: self.amount,
            annual_interest_rate_percent: self.interest.unwrap_or(Decimal::ZERO),
            term_count,
            term_unit,
        };
        terms.validate()?;
        Ok(terms)
    }
}

fn whole_term(term: Decimal) -> AgriFinResult<u32> {
    if !term.fract().is_zero() {
        return Err(AgriFinError::invalid(
            "term",
            format!("Term must be a whole number of periods, got {term}"),
        ));
    }
    if term <= Decimal::ZERO {
        return Err(AgriFinError::invalid(
            "term",
            "Term must be at least one period",
        ));
    }
    term.to_u32()
        .ok_or_else(|| AgriFinError::invalid("term", format!("Term {term} is out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(term: Option<Decimal>, term_type: TermUnit) -> LoanProduct {
        LoanProduct {
            id: Some("prod-1".into()),
            name: Some("Seasonal input loan".into()),
            description: None,
            amount: dec!(10000),
            interest: Some(dec!(8.4)),
            term,
            term_type,
        }
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(8.4)), dec!(0.007));
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_years_convert_to_months() {
        let terms = LoanTerms {
            principal: dec!(5000),
            annual_interest_rate_percent: dec!(10),
            term_count: 2,
            term_unit: TermUnit::Years,
        };
        assert_eq!(terms.term_months().unwrap(), 24);
    }

    #[test]
    fn test_months_pass_through() {
        let terms = LoanTerms::monthly(dec!(5000), dec!(10), 18);
        assert_eq!(terms.term_months().unwrap(), 18);
    }

    #[test]
    fn test_validate_rejects_bad_inputs() {
        assert!(LoanTerms::monthly(Decimal::ZERO, dec!(5), 12)
            .validate()
            .is_err());
        assert!(LoanTerms::monthly(dec!(100), dec!(-1), 12)
            .validate()
            .is_err());
        assert!(LoanTerms::monthly(dec!(100), dec!(5), 0)
            .validate()
            .is_err());
        assert!(LoanTerms::monthly(dec!(100), Decimal::ZERO, 1)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_caps_term() {
        assert!(LoanTerms::monthly(dec!(100), Decimal::ZERO, MAX_TERM_MONTHS)
            .validate()
            .is_ok());
        let err = LoanTerms::monthly(dec!(100), Decimal::ZERO, 4_000_000_000)
            .validate()
            .unwrap_err();
        assert!(matches!(err, AgriFinError::InvalidInput { ref field, .. } if field == "term"));

        let years = LoanTerms {
            principal: dec!(100),
            annual_interest_rate_percent: Decimal::ZERO,
            term_count: 101,
            term_unit: TermUnit::Years,
        };
        assert!(years.validate().is_err());
    }

    #[test]
    fn test_product_to_terms() {
        let terms = product(Some(dec!(2)), TermUnit::Years).to_terms().unwrap();
        assert_eq!(terms.term_count, 2);
        assert_eq!(terms.term_unit, TermUnit::Years);
        assert_eq!(terms.term_months().unwrap(), 24);
    }

    #[test]
    fn test_product_defaults() {
        let mut p = product(None, TermUnit::Years);
        p.interest = None;
        let terms = p.to_terms().unwrap();
        assert_eq!(terms.term_count, DEFAULT_TERM_MONTHS);
        assert_eq!(terms.term_unit, TermUnit::Months);
        assert_eq!(terms.annual_interest_rate_percent, Decimal::ZERO);
    }

    #[test]
    fn test_product_rejects_fractional_term() {
        let err = product(Some(dec!(6.5)), TermUnit::Months)
            .to_terms()
            .unwrap_err();
        assert!(matches!(err, AgriFinError::InvalidInput { ref field, .. } if field == "term"));
    }

    #[test]
    fn test_product_accepts_integral_decimal_term() {
        let terms = product(Some(dec!(12.0)), TermUnit::Months)
            .to_terms()
            .unwrap();
        assert_eq!(terms.term_count, 12);
    }

    #[test]
    fn test_product_deserializes_backend_shape() {
        let json = r#"{
            "id": "p-7",
            "name": "Dairy expansion",
            "amount": "25000",
            "interest": "9.5",
            "term": "3",
            "termType": "YEARS"
        }"#;
        let p: LoanProduct = serde_json::from_str(json).unwrap();
        assert_eq!(p.term_type, TermUnit::Years);
        assert_eq!(p.to_terms().unwrap().term_months().unwrap(), 36);
    }
}
