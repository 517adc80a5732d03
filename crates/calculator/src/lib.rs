//! # Calculation Engine
//!
//! Pure functions behind the investment and mining calculators.
//!
//! - **Stateless:** every function maps its inputs to a fresh result record. Nothing is
//!   cached or mutated, so identical inputs always produce identical outputs.
//! - **Eager rejection:** zero denominators, unknown units or currencies and non-finite
//!   inputs are reported as `CalcError::InvalidArgument` instead of leaking NaN or
//!   infinity into a result.
//!
//! The `worker` module offers the same operations behind an async boundary for callers
//! that must not block: one request in, one response out.

pub mod error;
pub mod format;
pub mod hashrate;
pub mod investment;
pub mod mining;
pub mod worker;

pub use error::CalcError;
pub use format::{BTC_DECIMALS, DEFAULT_DECIMALS, format_currency, format_currency_str};
pub use hashrate::{convert_hash_rate, convert_hash_rate_str, humanize_hash_rate};
pub use investment::{
    DEFAULT_COMPOUNDS_PER_YEAR, compound_interest, compound_interest_series, total_return_pct,
};
pub use mining::{daily_btc_reward, mining_profitability};
pub use worker::{CalculationRequest, CalculationResponse, CalculationWorker, WorkerHandle};
