use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use agrifin_core::analytics::{self, AnalyticsInput};

use super::repayment::today;
use crate::input;

/// Arguments for the borrower dashboard
#[derive(Args)]
pub struct AnalyticsArgs {
    /// Path to JSON/YAML input: a list of loans, or `{ loans, as_of, history_limit }`
    #[arg(long)]
    pub input: Option<String>,

    /// Date to judge due dates against (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Number of recent payments to list
    #[arg(long)]
    pub history_limit: Option<usize>,
}

pub fn run_analytics(args: AnalyticsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::require::<Value>(args.input.as_deref(), "analytics")?;

    let mut doc = match data {
        Value::Array(loans) => {
            let mut map = serde_json::Map::new();
            map.insert("loans".into(), Value::Array(loans));
            map
        }
        Value::Object(map) => map,
        _ => return Err("analytics input must be a list of loans or an object".into()),
    };
    if let Some(date) = args.as_of {
        doc.insert("as_of".into(), serde_json::to_value(date)?);
    } else if !doc.contains_key("as_of") {
        doc.insert("as_of".into(), serde_json::to_value(today())?);
    }
    if let Some(limit) = args.history_limit {
        doc.insert("history_limit".into(), Value::from(limit));
    }

    let analytics_input: AnalyticsInput = serde_json::from_value(Value::Object(doc))?;
    let result = analytics::borrower_analytics(&analytics_input)?;
    Ok(serde_json::to_value(result)?)
}
