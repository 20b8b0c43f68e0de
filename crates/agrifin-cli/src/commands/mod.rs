pub mod amortization;
pub mod analytics;
pub mod product;
pub mod repayment;

use clap::ValueEnum;

use agrifin_core::amortization::RoundingMode;
use agrifin_core::terms::TermUnit;

/// Unit of the `--term` flag
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TermUnitArg {
    Months,
    Years,
}

impl From<TermUnitArg> for TermUnit {
    fn from(arg: TermUnitArg) -> Self {
        match arg {
            TermUnitArg::Months => TermUnit::Months,
            TermUnitArg::Years => TermUnit::Years,
        }
    }
}

/// How schedule amounts are rounded between periods
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RoundingArg {
    /// Full decimal precision, rounded only for display
    Exact,
    /// Whole cents every period; final payment absorbs the residual
    #[value(alias = "cents")]
    MinorUnits,
}

impl From<RoundingArg> for RoundingMode {
    fn from(arg: RoundingArg) -> Self {
        match arg {
            RoundingArg::Exact => RoundingMode::Exact,
            RoundingArg::MinorUnits => RoundingMode::MinorUnits,
        }
    }
}
