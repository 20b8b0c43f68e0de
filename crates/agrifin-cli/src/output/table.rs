use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{display_value, ROW_FIELDS};

/// Format output as tables using the tabled crate.
///
/// Scalar fields of the result go in one Field/Value table; each row field
/// (schedule, installments, ...) gets a table of its own.
pub fn print_table(value: &Value, currency: &str) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => {
                print_result(result, currency);
                print_envelope_notes(map);
            }
            _ => print_fields(map, currency),
        },
        Value::Array(arr) => print_rows(arr, currency),
        _ => println!("{value}"),
    }
}

fn print_result(result: &Map<String, Value>, currency: &str) {
    let scalars: Map<String, Value> = result
        .iter()
        .filter(|(key, _)| !ROW_FIELDS.contains(&key.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    print_fields(&scalars, currency);

    for field in ROW_FIELDS {
        if let Some(Value::Array(rows)) = result.get(field) {
            println!("\n{}:", title(field));
            print_rows(rows, currency);
        }
    }
}

fn print_fields(map: &Map<String, Value>, currency: &str) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    push_fields(&mut builder, "", map, currency);
    println!("{}", Table::from(builder));
}

/// Nested objects (e.g. `next_payment`) are flattened to dotted keys.
fn push_fields(builder: &mut Builder, prefix: &str, map: &Map<String, Value>, currency: &str) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => push_fields(builder, &name, inner, currency),
            _ => builder.push_record([name, display_value(key, val, currency)]),
        }
    }
}

fn print_rows(rows: &[Value], currency: &str) {
    let Some(Value::Object(first)) = rows.first() else {
        println!("(empty)");
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.iter().map(|h| title(h)));

    for item in rows {
        if let Value::Object(map) = item {
            builder.push_record(headers.iter().map(|h| {
                map.get(h.as_str())
                    .map(|v| display_value(h, v, currency))
                    .unwrap_or_default()
            }));
        }
    }

    println!("{}", Table::from(builder));
}

fn print_envelope_notes(envelope: &Map<String, Value>) {
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {w}");
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {meth}");
    }
}

fn title(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(c) => c.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title() {
        assert_eq!(title("remaining_balance"), "Remaining Balance");
        assert_eq!(title("period"), "Period");
    }
}
