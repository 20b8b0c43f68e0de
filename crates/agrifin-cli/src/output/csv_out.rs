use serde_json::{Map, Value};
use std::io;

use super::{plain_value, ROW_FIELDS};

/// Write output as CSV to stdout.
///
/// Results with per-period rows (schedules, installments, breakdowns) are
/// written one row per entry; anything else as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match result {
        Value::Object(map) => match primary_rows(map) {
            Some(rows) => write_rows(&mut wtr, rows),
            None => {
                let _ = wtr.write_record(["field", "value"]);
                for (key, val) in map {
                    let _ = wtr.write_record([key.as_str(), &plain_value(val)]);
                }
            }
        },
        Value::Array(arr) => write_rows(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&plain_value(result)]);
        }
    }

    let _ = wtr.flush();
}

fn primary_rows(map: &Map<String, Value>) -> Option<&[Value]> {
    ROW_FIELDS
        .iter()
        .find_map(|field| map.get(*field).and_then(Value::as_array))
        .map(Vec::as_slice)
}

fn write_rows<W: io::Write>(wtr: &mut csv::Writer<W>, rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        for item in rows {
            let _ = wtr.write_record([&plain_value(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(String::as_str).collect();
    let _ = wtr.write_record(&headers);
    for item in rows {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(plain_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}
