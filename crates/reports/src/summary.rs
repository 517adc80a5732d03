use chrono::{DateTime, Utc};
use core_types::{CalculationKind, SavedCalculation};
use serde::Serialize;
use std::borrow::Borrow;

/// Number of rows on one report page.
pub const PAGE_SIZE: usize = 10;

/// One page of a report. Pages are numbered from 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// Slices `items` into the requested page. A page past the end (or page 0) is empty.
pub fn paginate<T: Clone>(items: &[T], page: usize) -> Page<T> {
    let total_pages = items.len().div_ceil(PAGE_SIZE);
    let slice = match page.checked_sub(1) {
        Some(index) if index < total_pages => {
            let start = index * PAGE_SIZE;
            let end = (start + PAGE_SIZE).min(items.len());
            items[start..end].to_vec()
        }
        _ => Vec::new(),
    };

    Page {
        items: slice,
        page,
        total_pages,
        total_items: items.len(),
    }
}

/// Aggregate figures over a set of saved calculations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub investment_count: usize,
    pub mining_count: usize,
    pub total_profit: f64,
    /// Zero for an empty report.
    pub average_profit: f64,
    pub best_profit: Option<f64>,
    pub worst_profit: Option<f64>,
}

pub fn summarize<I>(items: I) -> ReportSummary
where
    I: IntoIterator,
    I::Item: Borrow<SavedCalculation>,
{
    let mut summary = ReportSummary::default();
    for item in items {
        let item = item.borrow();
        let profit = item.profit();

        summary.total += 1;
        match item.kind() {
            CalculationKind::Investment => summary.investment_count += 1,
            CalculationKind::Mining => summary.mining_count += 1,
        }
        summary.total_profit += profit;
        summary.best_profit = Some(summary.best_profit.map_or(profit, |best| best.max(profit)));
        summary.worst_profit = Some(summary.worst_profit.map_or(profit, |worst| worst.min(profit)));
    }

    if summary.total > 0 {
        summary.average_profit = summary.total_profit / summary.total as f64;
    }
    summary
}

/// `(timestamp, profit)` samples in chronological order, for charting.
pub fn profit_series<I>(items: I) -> Vec<(DateTime<Utc>, f64)>
where
    I: IntoIterator,
    I::Item: Borrow<SavedCalculation>,
{
    let mut series: Vec<_> = items
        .into_iter()
        .map(|item| {
            let item = item.borrow();
            (item.timestamp, item.profit())
        })
        .collect();
    series.sort_by_key(|(timestamp, _)| *timestamp);
    series
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_are_one_based_and_partial_at_the_end() {
        let items: Vec<u32> = (1..=23).collect();

        let first = paginate(&items, 1);
        assert_eq!(first.items, (1..=10).collect::<Vec<_>>());
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.total_items, 23);

        assert_eq!(paginate(&items, 3).items, vec![21, 22, 23]);
    }

    #[test]
    fn out_of_range_pages_are_empty() {
        let items: Vec<u32> = (1..=5).collect();
        assert!(paginate(&items, 0).items.is_empty());
        assert!(paginate(&items, 2).items.is_empty());

        let empty: Vec<u32> = Vec::new();
        let page = paginate(&empty, 1);
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn empty_summary_has_no_extremes() {
        let summary = summarize(Vec::<SavedCalculation>::new());
        assert_eq!(summary.total, 0);
        assert_eq!(summary.average_profit, 0.0);
        assert_eq!(summary.best_profit, None);
        assert_eq!(summary.worst_profit, None);
    }
}
