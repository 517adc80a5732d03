use crate::error::ReportError;
use chrono::{DateTime, Duration, Utc};
use core_types::{CalculationKind, CalculationRecord, Currency, SavedCalculation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The window of history a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DateRange {
    Day,
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    All,
    Custom {
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    },
}

impl DateRange {
    /// Resolves the range against `now` into inclusive `(start, end)` bounds.
    /// `None` leaves that side open.
    pub fn bounds(&self, now: DateTime<Utc>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
        let lookback = |duration: Duration| (Some(now - duration), None);
        match *self {
            DateRange::Day => lookback(Duration::hours(24)),
            DateRange::Week => lookback(Duration::days(7)),
            DateRange::Month => lookback(Duration::days(30)),
            DateRange::Quarter => lookback(Duration::days(90)),
            DateRange::Year => lookback(Duration::days(365)),
            DateRange::All => (None, None),
            DateRange::Custom { start, end } => (start, end),
        }
    }
}

impl FromStr for DateRange {
    type Err = ReportError;

    /// Parses the preset names; custom ranges are built from explicit dates instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" | "24h" => Ok(DateRange::Day),
            "week" | "7d" => Ok(DateRange::Week),
            "month" | "30d" => Ok(DateRange::Month),
            "quarter" | "90d" => Ok(DateRange::Quarter),
            "year" | "365d" => Ok(DateRange::Year),
            "all" => Ok(DateRange::All),
            other => Err(ReportError::InvalidFilter(format!("unknown date range '{}'", other))),
        }
    }
}

/// Which kinds of calculation a report includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    #[default]
    All,
    Investment,
    Mining,
}

impl ReportType {
    pub fn includes(&self, kind: CalculationKind) -> bool {
        match self {
            ReportType::All => true,
            ReportType::Investment => kind == CalculationKind::Investment,
            ReportType::Mining => kind == CalculationKind::Mining,
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ReportType::All => "all",
            ReportType::Investment => "investment",
            ReportType::Mining => "mining",
        };
        f.write_str(label)
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ReportType::All),
            "investment" => Ok(ReportType::Investment),
            "mining" => Ok(ReportType::Mining),
            other => Err(ReportError::InvalidFilter(format!("unknown report type '{}'", other))),
        }
    }
}

/// The criteria a report applies to the saved history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFilters {
    pub date_range: DateRange,
    pub report_type: ReportType,
    /// `None` matches every currency.
    pub currency: Option<Currency>,
    /// A coin id such as `bitcoin`; `None` matches every coin.
    pub cryptocurrency: Option<String>,
    pub min_profit: f64,
    /// `None` leaves the profit range unbounded above.
    pub max_profit: Option<f64>,
}

impl Default for ReportFilters {
    fn default() -> Self {
        Self {
            date_range: DateRange::Month,
            report_type: ReportType::All,
            currency: None,
            cryptocurrency: None,
            min_profit: 0.0,
            max_profit: None,
        }
    }
}

impl ReportFilters {
    /// Rejects filters that can never match anything.
    pub fn validate(&self) -> Result<(), ReportError> {
        if self.min_profit.is_nan() || self.max_profit.is_some_and(f64::is_nan) {
            return Err(ReportError::InvalidFilter("profit bounds must be numbers".to_string()));
        }
        if let Some(max) = self.max_profit {
            if max < self.min_profit {
                return Err(ReportError::InvalidFilter(format!(
                    "max_profit ({}) is below min_profit ({})",
                    max, self.min_profit
                )));
            }
        }
        if let DateRange::Custom { start: Some(start), end: Some(end) } = self.date_range {
            if end < start {
                return Err(ReportError::InvalidFilter("custom range ends before it starts".to_string()));
            }
        }
        Ok(())
    }

    /// Whether a single saved calculation passes every criterion.
    pub fn matches(&self, item: &SavedCalculation, now: DateTime<Utc>) -> bool {
        let (start, end) = self.date_range.bounds(now);
        if start.is_some_and(|start| item.timestamp < start) || end.is_some_and(|end| item.timestamp > end) {
            return false;
        }

        if !self.report_type.includes(item.kind()) {
            return false;
        }

        // Mining estimates carry no currency or coin, so those filters only narrow investments.
        if let CalculationRecord::Investment(record) = &item.record {
            if self.currency.is_some_and(|currency| currency != record.currency) {
                return false;
            }
            if let Some(coin) = &self.cryptocurrency {
                if !coin.eq_ignore_ascii_case(&record.coin) {
                    return false;
                }
            }
        }

        let profit = item.profit();
        profit >= self.min_profit && self.max_profit.is_none_or(|max| profit <= max)
    }

    /// Keeps the matching calculations, preserving their order.
    pub fn apply<'a>(&self, items: &'a [SavedCalculation], now: DateTime<Utc>) -> Vec<&'a SavedCalculation> {
        let selected: Vec<_> = items.iter().filter(|item| self.matches(item, now)).collect();
        tracing::debug!(total = items.len(), selected = selected.len(), "Applied report filters.");
        selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    #[test]
    fn presets_look_back_from_now() {
        let (start, end) = DateRange::Week.bounds(now());
        assert_eq!(start, Some(Utc.with_ymd_and_hms(2024, 6, 23, 12, 0, 0).unwrap()));
        assert_eq!(end, None);
        assert_eq!(DateRange::All.bounds(now()), (None, None));
        assert_eq!(DateRange::Day.bounds(now()).0, Some(now() - Duration::hours(24)));
    }

    #[test]
    fn parses_range_and_type_names() {
        assert_eq!("Quarter".parse::<DateRange>().unwrap(), DateRange::Quarter);
        assert_eq!("30d".parse::<DateRange>().unwrap(), DateRange::Month);
        assert!("fortnight".parse::<DateRange>().is_err());
        assert_eq!("MINING".parse::<ReportType>().unwrap(), ReportType::Mining);
        assert!("trading".parse::<ReportType>().is_err());
    }

    #[test]
    fn validation_rejects_inverted_bounds() {
        let mut filters = ReportFilters { max_profit: Some(-1.0), ..Default::default() };
        assert!(filters.validate().is_err());

        filters.max_profit = None;
        filters.date_range = DateRange::Custom { start: Some(now()), end: Some(now() - Duration::days(1)) };
        assert!(filters.validate().is_err());

        assert!(ReportFilters::default().validate().is_ok());
    }

    #[test]
    fn filters_round_trip_through_json_with_open_upper_bound() {
        let filters = ReportFilters {
            date_range: DateRange::Custom { start: Some(now()), end: None },
            currency: Some(Currency::Eur),
            ..Default::default()
        };
        let json = serde_json::to_string(&filters).unwrap();
        assert!(json.contains("\"max_profit\":null"));
        assert_eq!(serde_json::from_str::<ReportFilters>(&json).unwrap(), filters);
        assert_eq!(serde_json::from_str::<ReportFilters>("{}").unwrap(), ReportFilters::default());
    }
}
