use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use agrifin_core::repayment::{self, InstallmentPlanInput, LoanSummaryInput};
use agrifin_core::terms::LoanTerms;

use super::TermUnitArg;
use crate::input;

/// Arguments for the installments command
#[derive(Args)]
pub struct InstallmentsArgs {
    /// Loan principal
    #[arg(long, alias = "amount")]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent
    #[arg(long, alias = "interest")]
    pub rate: Option<Decimal>,

    /// Term length, in --term-unit
    #[arg(long)]
    pub term: Option<u32>,

    /// Unit of --term
    #[arg(long, value_enum, default_value = "months")]
    pub term_unit: TermUnitArg,

    /// Date the loan was booked (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub origination: Option<NaiveDate>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the loan-summary command
#[derive(Args)]
pub struct LoanSummaryArgs {
    /// Path to a JSON/YAML loan record, or `{ loan, as_of }`
    #[arg(long)]
    pub input: Option<String>,

    /// Date to judge due dates against (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_installments(args: InstallmentsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input = match input::load_value(args.input.as_deref())? {
        Some(mut data) => {
            if let Value::Object(map) = &mut data {
                match args.origination {
                    Some(date) => {
                        map.insert("origination_date".into(), serde_json::to_value(date)?);
                    }
                    None if !map.contains_key("origination_date") => {
                        map.insert("origination_date".into(), serde_json::to_value(today())?);
                    }
                    None => {}
                }
            }
            serde_json::from_value(data)?
        }
        None => InstallmentPlanInput {
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
            origination_date: args.origination.unwrap_or_else(today),
        },
    };

    let result = repayment::build_installments(&plan_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_loan_summary(args: LoanSummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::require::<Value>(args.input.as_deref(), "loan-summary")?;
    let summary_input: LoanSummaryInput = serde_json::from_value(with_as_of(data, args.as_of)?)?;
    let result = repayment::analyze_loan(&summary_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Accept either a bare loan record or `{ loan, as_of }`; the flag wins over
/// a date in the document, and today fills in when neither is given.
fn with_as_of(data: Value, as_of: Option<NaiveDate>) -> Result<Value, Box<dyn std::error::Error>> {
    let mut doc = match data {
        Value::Object(map) if map.contains_key("loan") => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("loan".into(), other);
            map
        }
    };
    match as_of {
        Some(date) => {
            doc.insert("as_of".into(), serde_json::to_value(date)?);
        }
        None if !doc.contains_key("as_of") => {
            doc.insert("as_of".into(), serde_json::to_value(today())?);
        }
        None => {}
    }
    Ok(Value::Object(doc))
}

pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_loan_is_wrapped() {
        let date = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        let doc = with_as_of(json!({ "id": "L-1" }), Some(date)).unwrap();
        assert_eq!(doc["loan"]["id"], "L-1");
        assert_eq!(doc["as_of"], "2025-05-01");
    }

    #[test]
    fn test_document_date_kept_without_flag() {
        let doc = with_as_of(json!({ "loan": {}, "as_of": "2024-12-31" }), None).unwrap();
        assert_eq!(doc["as_of"], "2024-12-31");
    }
}
