use core_types::{Currency, HashRateUnit};
use serde::{Deserialize, Serialize};

/// The keys user preferences are stored under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Currency,
    InvestmentSettings,
    MiningSettings,
    ReportFilters,
}

impl PreferenceKey {
    pub const ALL: [PreferenceKey; 4] = [
        PreferenceKey::Currency,
        PreferenceKey::InvestmentSettings,
        PreferenceKey::MiningSettings,
        PreferenceKey::ReportFilters,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::Currency => "currency",
            PreferenceKey::InvestmentSettings => "investment_settings",
            PreferenceKey::MiningSettings => "mining_settings",
            PreferenceKey::ReportFilters => "report_filters",
        }
    }
}

/// The last inputs of the investment calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestmentSettings {
    pub initial_investment: f64,
    pub interest_rate: f64,
    pub years: f64,
    pub compound_frequency: u32,
    pub currency: Currency,
    pub coin: String,
}

impl Default for InvestmentSettings {
    fn default() -> Self {
        Self {
            initial_investment: 1000.0,
            interest_rate: 0.05,
            years: 5.0,
            compound_frequency: 12,
            currency: Currency::Usd,
            coin: "bitcoin".to_string(),
        }
    }
}

/// The last inputs of the mining calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningSettings {
    pub hash_rate: f64,
    pub hash_rate_unit: HashRateUnit,
    pub power_watts: f64,
    pub electricity_cost_per_kwh: f64,
    pub pool_fee: f64,
    /// `Usd` or `Btc`: which side of the value pairs to show first.
    pub display_currency: Currency,
}

impl Default for MiningSettings {
    fn default() -> Self {
        Self {
            hash_rate: 100.0,
            hash_rate_unit: HashRateUnit::THs,
            power_watts: 3500.0,
            electricity_cost_per_kwh: 0.12,
            pool_fee: 0.01,
            display_currency: Currency::Usd,
        }
    }
}
