pub mod file;
pub mod stdin;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Load a command's input document from `--input` or piped stdin.
///
/// Returns `None` when neither is supplied so the caller can fall back to
/// individual flags.
pub fn load_value(path: Option<&str>) -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        return Ok(Some(file::read_value(path)?));
    }
    stdin::read_stdin()
}

/// Like [`load_value`], but the document is required.
pub fn require<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    match load_value(path)? {
        Some(value) => Ok(serde_json::from_value(value)?),
        None => Err(format!("--input <file.json|file.yaml> or stdin required for {what}").into()),
    }
}
