use serde_json::Value;
use std::io::{self, Read};
use tracing::debug;

/// Read a piped input document. JSON is tried first, then YAML.
///
/// Returns `None` when stdin is a terminal or nothing was piped.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    debug!(bytes = buffer.len(), "read piped input");
    parse_document(&buffer)
}

fn parse_document(raw: &str) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(trimmed) {
        Ok(value) => Ok(Some(value)),
        Err(json_err) => match serde_yaml::from_str::<Value>(trimmed) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(format!("stdin is neither JSON nor YAML: {json_err}").into()),
        },
    }
}
