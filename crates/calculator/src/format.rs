use crate::error::{CalcError, ensure_finite};
use core_types::Currency;

/// Fractional digits used for fiat amounts unless the caller asks otherwise.
pub const DEFAULT_DECIMALS: usize = 2;
/// BTC amounts are always shown down to the satoshi.
pub const BTC_DECIMALS: usize = 8;
const MAX_DECIMALS: usize = 20;

/// Renders an amount for display.
///
/// BTC is written with exactly eight fractional digits and a `" BTC"` suffix, without
/// grouping. Fiat currencies follow en-US currency style: symbol prefix, comma
/// thousands separators and exactly `decimals` fractional digits (`-$1,234.50`).
pub fn format_currency(value: f64, currency: Currency, decimals: usize) -> Result<String, CalcError> {
    ensure_finite("value", value)?;
    if decimals > MAX_DECIMALS {
        return Err(CalcError::invalid(
            "decimals",
            format!("at most {} fractional digits are supported, got {}", MAX_DECIMALS, decimals),
        ));
    }

    match currency.symbol() {
        None => Ok(format!("{:.*} BTC", BTC_DECIMALS, normalize_zero(value))),
        Some(symbol) => {
            let sign = if value < 0.0 { "-" } else { "" };
            Ok(format!("{}{}{}", sign, symbol, group_thousands(value.abs(), decimals)))
        }
    }
}

/// Like [`format_currency`], for a currency code typed by a user (`"usd"`, `"BTC"`, ...).
pub fn format_currency_str(value: f64, currency: &str, decimals: usize) -> Result<String, CalcError> {
    let currency: Currency = currency.parse()?;
    format_currency(value, currency, decimals)
}

/// Prints `-0.0` as `0.0`.
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}

fn group_thousands(magnitude: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, magnitude);
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}
