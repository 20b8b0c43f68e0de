use clap::Args;
use serde_json::Value;

use agrifin_core::amortization::{self, ProductAmortizationInput, RoundingMode};
use agrifin_core::terms::LoanProduct;

use super::RoundingArg;
use crate::input;

/// Arguments for amortizing a catalog loan product
#[derive(Args)]
pub struct ProductArgs {
    /// Path to a JSON/YAML loan product (amount, interest, term, termType)
    #[arg(long)]
    pub input: Option<String>,

    /// Rounding applied between schedule periods
    #[arg(long, value_enum)]
    pub rounding: Option<RoundingArg>,
}

pub fn run_product(args: ProductArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let product: LoanProduct = input::require(args.input.as_deref(), "product amortization")?;
    let result = amortization::amortize_product(&ProductAmortizationInput {
        product,
        rounding: args.rounding.map(RoundingMode::from).unwrap_or_default(),
    })?;
    Ok(serde_json::to_value(result)?)
}
