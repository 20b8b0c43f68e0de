use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use agrifin_core::amortization::{self, AmortizationInput, RoundingMode};
use agrifin_core::terms::LoanTerms;

use super::{RoundingArg, TermUnitArg};
use crate::input;

/// Arguments shared by the payment, schedule and totals commands
#[derive(Args)]
pub struct AmortizeArgs {
    /// Loan principal (e.g. 10000)
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.4 for 8.4%)
    #[arg(long, alias = "interest")]
    pub rate: Option<Decimal>,

    /// Term length, in --term-unit
    #[arg(long)]
    pub term: Option<u32>,

    /// Unit of --term
    #[arg(long, value_enum, default_value = "months")]
    pub term_unit: TermUnitArg,

    /// Rounding applied between schedule periods
    #[arg(long, value_enum)]
    pub rounding: Option<RoundingArg>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_payment(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_input(args)?;
    let result = amortization::quote_payment(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_input(args)?;
    let result = amortization::amortize(&input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_totals(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let input = load_input(args)?;
    let result = amortization::amortize(&input)?.map(|out| out.totals);
    Ok(serde_json::to_value(result)?)
}

fn load_input(args: AmortizeArgs) -> Result<AmortizationInput, Box<dyn std::error::Error>> {
    if let Some(data) = input::load_value(args.input.as_deref())? {
        let mut parsed: AmortizationInput = serde_json::from_value(data)?;
        if let Some(rounding) = args.rounding {
            parsed.rounding = rounding.into();
        }
        return Ok(parsed);
    }

    Ok(AmortizationInput {
        terms: LoanTerms {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_interest_rate_percent: args
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            term_count: args.term.ok_or("--term is required (or provide --input)")?,
            term_unit: args.term_unit.into(),
        },
        rounding: args.rounding.map(RoundingMode::from).unwrap_or_default(),
    })
}
