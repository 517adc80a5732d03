//! # Reports
//!
//! Filters, pages and summarizes the saved calculation history.
//! Every function here is pure; the history itself is loaded by the `database` crate.

use chrono::{DateTime, Utc};
use core_types::SavedCalculation;

pub mod error;
pub mod filters;
pub mod rows;
pub mod summary;

// --- Public API ---
pub use error::ReportError;
pub use filters::{DateRange, ReportFilters, ReportType};
pub use rows::ReportRow;
pub use summary::{PAGE_SIZE, Page, ReportSummary, paginate, profit_series, summarize};

/// A filtered, paged view over the history, ready for display.
#[derive(Debug, Clone)]
pub struct Report {
    pub filters: ReportFilters,
    pub summary: ReportSummary,
    pub page: Page<ReportRow>,
    pub profit_series: Vec<(DateTime<Utc>, f64)>,
}

/// Applies `filters` to `history` and renders the requested page.
///
/// The summary and the profit series cover every matching calculation, not only the
/// rows on the page.
pub fn build_report(
    history: &[SavedCalculation],
    filters: &ReportFilters,
    page: usize,
    now: DateTime<Utc>,
) -> Result<Report, ReportError> {
    filters.validate()?;

    let selected = filters.apply(history, now);
    let rows = selected
        .iter()
        .map(|item| ReportRow::from_saved(item))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Report {
        filters: filters.clone(),
        summary: summarize(selected.iter().copied()),
        page: paginate(&rows, page),
        profit_series: profit_series(selected.iter().copied()),
    })
}
