pub mod edit;
pub mod equalize;
pub mod monthly;
pub mod term;

use lease_cashflow_core::error::LeaseCashflowError;
use lease_cashflow_core::scenario::lenient;
use lease_cashflow_core::types::Rate;

/// Parse a `--discount-rate` flag: `0.08`, `8%` and `"8 %"` are equivalent.
pub fn parse_rate(raw: &str) -> Result<Rate, LeaseCashflowError> {
    lenient::parse_decimal(raw).ok_or_else(|| LeaseCashflowError::InvalidInput {
        field: "discount-rate".into(),
        reason: format!("'{raw}' is not a number"),
    })
}
