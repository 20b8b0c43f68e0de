pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

use agrifin_core::money::{format_currency, format_percent};

use crate::OutputFormat;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value, currency: &str) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value, currency),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value, currency),
    }
}

/// Array fields that carry the per-period or per-loan rows of a result.
pub(crate) const ROW_FIELDS: [&str; 5] = [
    "schedule",
    "installments",
    "loan_breakdown",
    "payment_history",
    "status_distribution",
];

const MONEY_SUFFIXES: [&str; 8] = [
    "payment",
    "amount",
    "balance",
    "portion",
    "interest",
    "repayment",
    "principal",
    "repaid",
];

pub(crate) fn is_money_field(key: &str) -> bool {
    !key.ends_with("_percent") && MONEY_SUFFIXES.iter().any(|s| key.ends_with(s))
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => Decimal::from_str(s).ok(),
        Value::Number(n) => Decimal::from_str(&n.to_string()).ok(),
        _ => None,
    }
}

/// Human-readable rendering of a result field: money as currency, shares as
/// percentages, everything else as-is.
pub(crate) fn display_value(key: &str, value: &Value, currency: &str) -> String {
    if key.ends_with("_percent") {
        if let Some(d) = as_decimal(value) {
            return format_percent(d);
        }
    } else if is_money_field(key) {
        if let Some(d) = as_decimal(value) {
            return format_currency(d, currency);
        }
    }
    plain_value(value)
}

pub(crate) fn plain_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
