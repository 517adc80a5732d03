use crate::enums::{CalculationKind, Currency, HashRateUnit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A point-in-time snapshot of the Bitcoin network, as supplied by the market-data client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    /// Spot price in USD.
    pub price: f64,
    /// Aggregate network hash rate in TH/s.
    pub hashrate: f64,
    /// Block subsidy in BTC.
    pub block_reward: f64,
    /// Average block interval in seconds.
    pub block_time: f64,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub total_volume: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<f64>,
}

impl NetworkInfo {
    /// Creates a snapshot holding only the fields the profitability math needs.
    pub fn new(price: f64, hashrate: f64, block_reward: f64, block_time: f64) -> Self {
        Self {
            price,
            hashrate,
            block_reward,
            block_time,
            market_cap: None,
            total_volume: None,
            difficulty: None,
        }
    }
}

/// The outcome of a compound-interest projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompoundInterestResult {
    pub principal: f64,
    pub final_amount: f64,
    pub interest_earned: f64,
    pub growth_rate: f64,
}

/// A single `(years elapsed, value)` sample of a projection curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

/// An amount expressed both in BTC and in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuePair {
    pub btc: f64,
    pub usd: f64,
}

/// A figure broken down over the daily, monthly and yearly horizons.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodBreakdown<T> {
    pub daily: T,
    pub monthly: T,
    pub yearly: T,
}

/// Electricity costs in USD.
pub type CostBreakdown = PeriodBreakdown<f64>;

/// Days until cumulative profit turns non-negative: `0` when the rig is profitable
/// from day one, `+inf` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BreakEven {
    #[serde(with = "unbounded_days")]
    pub days: f64,
}

impl BreakEven {
    pub fn is_reachable(&self) -> bool {
        self.days.is_finite()
    }
}

/// Mining revenue, cost and profit projections for one hardware setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MiningProfitability {
    pub rewards: PeriodBreakdown<ValuePair>,
    pub costs: CostBreakdown,
    pub profits: PeriodBreakdown<ValuePair>,
    pub break_even: BreakEven,
}

/// Inputs and outputs of a saved investment projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub coin: String,
    pub coin_name: String,
    pub currency: Currency,
    pub initial_investment: f64,
    pub interest_rate: f64,
    pub years: f64,
    pub compound_frequency: u32,
    pub final_amount: f64,
    pub interest_earned: f64,
    pub total_return_pct: f64,
}

/// Inputs and outputs of a saved mining estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MiningRecord {
    pub hash_rate: f64,
    pub hash_rate_unit: HashRateUnit,
    pub power_watts: f64,
    pub electricity_cost_per_kwh: f64,
    pub pool_fee: f64,
    pub profitability: MiningProfitability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CalculationRecord {
    Investment(InvestmentRecord),
    Mining(MiningRecord),
}

impl CalculationRecord {
    pub fn kind(&self) -> CalculationKind {
        match self {
            CalculationRecord::Investment(_) => CalculationKind::Investment,
            CalculationRecord::Mining(_) => CalculationKind::Mining,
        }
    }

    /// The figure reports rank and filter on: interest earned for investments,
    /// monthly USD profit for mining.
    pub fn profit(&self) -> f64 {
        match self {
            CalculationRecord::Investment(record) => record.interest_earned,
            CalculationRecord::Mining(record) => record.profitability.profits.monthly.usd,
        }
    }
}

/// An entry of the recent-calculations history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub record: CalculationRecord,
}

impl SavedCalculation {
    /// Stamps a record with a fresh id and the given timestamp.
    pub fn new(record: CalculationRecord, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
            record,
        }
    }

    pub fn kind(&self) -> CalculationKind {
        self.record.kind()
    }

    pub fn profit(&self) -> f64 {
        self.record.profit()
    }
}

/// JSON has no infinity, so an unreachable break-even is stored as `null`.
mod unbounded_days {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(days: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if days.is_finite() {
            serializer.serialize_some(days)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
