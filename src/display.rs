use anyhow::Result;
use calculator::{BTC_DECIMALS, DEFAULT_DECIMALS, format_currency, humanize_hash_rate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use core_types::{ChartPoint, CompoundInterestResult, Currency, MiningProfitability, NetworkInfo, ValuePair};
use indicatif::{ProgressBar, ProgressStyle};
use reports::{Report, ReportRow};
use std::time::Duration;

fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// A spinner on stderr while a network request is in flight.
pub fn spinner(message: &str) -> Result<ProgressBar> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}

pub fn investment_table(result: &CompoundInterestResult, currency: Currency, total_return_pct: Option<f64>) -> Result<Table> {
    let mut table = table(vec!["Metric", "Value"]);
    table.add_row(vec!["Initial investment".to_string(), format_currency(result.principal, currency, DEFAULT_DECIMALS)?]);
    table.add_row(vec!["Final amount".to_string(), format_currency(result.final_amount, currency, DEFAULT_DECIMALS)?]);
    table.add_row(vec!["Interest earned".to_string(), format_currency(result.interest_earned, currency, DEFAULT_DECIMALS)?]);
    table.add_row(vec!["Annual rate".to_string(), format!("{:.2}%", result.growth_rate * 100.0)]);
    let total_return = total_return_pct.map_or_else(|| "n/a".to_string(), |pct| format!("{:.2}%", pct));
    table.add_row(vec!["Total return".to_string(), total_return]);
    Ok(table)
}

/// One row per whole year of the projection, plus the final point when the term is fractional.
pub fn growth_table(points: &[ChartPoint], currency: Currency) -> Result<Table> {
    let mut table = table(vec!["Years", "Balance"]);
    let last = points.len().saturating_sub(1);
    for (index, point) in points.iter().enumerate() {
        if index % 12 == 0 || index == last {
            table.add_row(vec![format!("{:.2}", point.x), format_currency(point.y, currency, DEFAULT_DECIMALS)?]);
        }
    }
    Ok(table)
}

fn pair(value: &ValuePair, display: Currency) -> Result<String> {
    Ok(match display {
        Currency::Btc => format_currency(value.btc, Currency::Btc, BTC_DECIMALS)?,
        _ => format_currency(value.usd, Currency::Usd, DEFAULT_DECIMALS)?,
    })
}

pub fn mining_table(result: &MiningProfitability, display: Currency) -> Result<Table> {
    let mut table = table(vec!["Period", "Rewards", "Electricity", "Profit"]);
    let periods = [
        ("Daily", &result.rewards.daily, result.costs.daily, &result.profits.daily),
        ("Monthly", &result.rewards.monthly, result.costs.monthly, &result.profits.monthly),
        ("Yearly", &result.rewards.yearly, result.costs.yearly, &result.profits.yearly),
    ];
    for (label, rewards, cost, profit) in periods {
        table.add_row(vec![
            label.to_string(),
            pair(rewards, display)?,
            format_currency(cost, Currency::Usd, DEFAULT_DECIMALS)?,
            pair(profit, display)?,
        ]);
    }
    Ok(table)
}

pub fn break_even_label(result: &MiningProfitability) -> &'static str {
    if result.break_even.is_reachable() {
        "Profitable from day one"
    } else {
        "Never: electricity costs exceed rewards"
    }
}

pub fn network_table(info: &NetworkInfo) -> Result<Table> {
    let (hashrate, unit) = humanize_hash_rate(info.hashrate * calculator::mining::NETWORK_HASHRATE_TO_HS);
    let optional = |value: Option<f64>| -> Result<String> {
        value.map_or_else(|| Ok("n/a".to_string()), |v| Ok(format_currency(v, Currency::Usd, 0)?))
    };

    let mut table = table(vec!["Metric", "Value"]);
    table.add_row(vec!["Bitcoin price".to_string(), format_currency(info.price, Currency::Usd, DEFAULT_DECIMALS)?]);
    table.add_row(vec!["Network hash rate".to_string(), format!("{:.2} {}", hashrate, unit)]);
    table.add_row(vec!["Block reward".to_string(), format!("{} BTC", info.block_reward)]);
    table.add_row(vec!["Block time".to_string(), format!("{} s", info.block_time)]);
    table.add_row(vec!["Market cap".to_string(), optional(info.market_cap)?]);
    table.add_row(vec!["24h volume".to_string(), optional(info.total_volume)?]);
    let difficulty = info.difficulty.map_or_else(|| "n/a".to_string(), |d| format!("{:.3e}", d));
    table.add_row(vec!["Difficulty".to_string(), difficulty]);
    Ok(table)
}

pub fn rows_table(rows: &[ReportRow]) -> Table {
    let mut table = table(vec!["Date", "Type", "Asset", "Currency", "Initial", "Final / Monthly", "Profit"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(&row.date),
            Cell::new(&row.kind),
            Cell::new(&row.asset),
            Cell::new(&row.currency),
            Cell::new(&row.initial_value),
            Cell::new(&row.final_value),
            Cell::new(&row.profit),
        ]);
    }
    table
}

/// Profits of mixed currencies are summed as plain numbers, so the summary shows no symbol.
pub fn summary_table(report: &Report) -> Table {
    let summary = &report.summary;
    let number = |value: Option<f64>| value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));

    let mut table = table(vec!["Calculations", "Investment", "Mining", "Total profit", "Average", "Best", "Worst"]);
    table.add_row(vec![
        summary.total.to_string(),
        summary.investment_count.to_string(),
        summary.mining_count.to_string(),
        format!("{:.2}", summary.total_profit),
        format!("{:.2}", summary.average_profit),
        number(summary.best_profit),
        number(summary.worst_profit),
    ]);
    table
}
