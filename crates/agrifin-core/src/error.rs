use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgriFinError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Precision drift in {context}: residual of {residual} exceeds one cent")]
    PrecisionDrift { context: String, residual: Decimal },

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl AgriFinError {
    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        AgriFinError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn overflow(context: impl Into<String>) -> Self {
        AgriFinError::Overflow {
            context: context.into(),
        }
    }
}

impl From<serde_json::Error> for AgriFinError {
    fn from(e: serde_json::Error) -> Self {
        AgriFinError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invalid_input_message() {
        let err = AgriFinError::invalid("principal", "Principal must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid input: principal — Principal must be positive"
        );
    }

    #[test]
    fn test_precision_drift_message() {
        let err = AgriFinError::PrecisionDrift {
            context: "final period".into(),
            residual: dec!(0.02),
        };
        assert!(err.to_string().contains("0.02"));
    }

    #[test]
    fn test_from_serde_json() {
        let parse: Result<u32, _> = serde_json::from_str("not json");
        let err: AgriFinError = parse.unwrap_err().into();
        assert!(matches!(err, AgriFinError::SerializationError(_)));
    }
}
