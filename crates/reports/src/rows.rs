use crate::error::ReportError;
use calculator::{DEFAULT_DECIMALS, format_currency};
use core_types::{CalculationRecord, Currency, SavedCalculation};
use serde::Serialize;

/// A saved calculation flattened into display strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub date: String,
    pub kind: String,
    pub asset: String,
    pub currency: String,
    /// Principal for investments, hash rate for mining.
    pub initial_value: String,
    /// Final amount for investments, monthly revenue for mining.
    pub final_value: String,
    pub profit: String,
}

impl ReportRow {
    pub fn from_saved(item: &SavedCalculation) -> Result<Self, ReportError> {
        let date = item.timestamp.format("%Y-%m-%d %H:%M").to_string();

        let row = match &item.record {
            CalculationRecord::Investment(record) => {
                let asset = if record.coin_name.is_empty() { record.coin.clone() } else { record.coin_name.clone() };
                ReportRow {
                    date,
                    kind: "Investment".to_string(),
                    asset,
                    currency: record.currency.code().to_ascii_uppercase(),
                    initial_value: format_currency(record.initial_investment, record.currency, DEFAULT_DECIMALS)?,
                    final_value: format_currency(record.final_amount, record.currency, DEFAULT_DECIMALS)?,
                    profit: format_currency(record.interest_earned, record.currency, DEFAULT_DECIMALS)?,
                }
            }
            CalculationRecord::Mining(record) => {
                let monthly = &record.profitability;
                ReportRow {
                    date,
                    kind: "Mining".to_string(),
                    asset: "Bitcoin".to_string(),
                    currency: "USD".to_string(),
                    initial_value: format!("{} {}", record.hash_rate, record.hash_rate_unit),
                    final_value: format_currency(monthly.rewards.monthly.usd, Currency::Usd, DEFAULT_DECIMALS)?,
                    profit: format_currency(monthly.profits.monthly.usd, Currency::Usd, DEFAULT_DECIMALS)?,
                }
            }
        };
        Ok(row)
    }
}
