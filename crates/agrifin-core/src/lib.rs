pub mod error;
pub mod money;
pub mod terms;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "repayment")]
pub mod repayment;

#[cfg(feature = "analytics")]
pub mod analytics;

pub use error::AgriFinError;
pub use types::*;

/// Standard result type for all agrifin operations
pub type AgriFinResult<T> = Result<T, AgriFinError>;
