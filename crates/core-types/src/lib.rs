pub mod enums;
pub mod error;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::{CalculationKind, Currency, HashRateUnit};
pub use error::CoreError;
pub use structs::{
    BreakEven, CalculationRecord, ChartPoint, CompoundInterestResult, CostBreakdown,
    InvestmentRecord, MiningProfitability, MiningRecord, NetworkInfo, PeriodBreakdown,
    SavedCalculation, ValuePair,
};
