pub mod calendar;
pub mod config;
pub mod engine;
pub mod error;
pub mod limits;
pub mod opex;
pub mod rollup;
pub mod scenario;
pub mod schedule;
pub mod time_value;
pub mod types;

#[cfg(feature = "equalization")]
pub mod equalization;

pub use config::EngineConfig;
pub use engine::run_monthly_engine;
pub use error::LeaseCashflowError;
pub use scenario::Scenario;
pub use types::*;

#[cfg(feature = "equalization")]
pub use equalization::compute_equalized_comparison;

/// Standard result type for the fallible edges of the crate (decoding, config)
pub type LeaseCashflowResult<T> = Result<T, LeaseCashflowError>;
