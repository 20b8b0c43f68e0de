use serde_json::Value;

use super::{display_value, plain_value};

/// Headline figure of each command, in priority order.
const PRIORITY_KEYS: [&str; 6] = [
    "monthly_payment_rounded",
    "monthly_payment",
    "total_repayment",
    "remaining_amount",
    "outstanding_balance",
    "total_amount_borrowed",
];

/// Print just the headline figure of a result.
pub fn print_minimal(value: &Value, currency: &str) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", display_value(key, val, currency));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{key}: {}", display_value(key, val, currency));
            return;
        }
    }

    println!("{}", plain_value(result_obj));
}
