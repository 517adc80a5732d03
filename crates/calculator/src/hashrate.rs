use crate::error::{CalcError, ensure_finite};
use core_types::HashRateUnit;

/// Converts a hash rate between units by way of H/s.
pub fn convert_hash_rate(value: f64, from: HashRateUnit, to: HashRateUnit) -> f64 {
    if from == to {
        return value;
    }
    value * from.multiplier() / to.multiplier()
}

/// Like [`convert_hash_rate`], for unit names typed by a user (`"TH/s"`, `"gh/s"`, ...).
pub fn convert_hash_rate_str(value: f64, from: &str, to: &str) -> Result<f64, CalcError> {
    ensure_finite("hash_rate", value)?;
    let from: HashRateUnit = from.parse()?;
    let to: HashRateUnit = to.parse()?;
    Ok(convert_hash_rate(value, from, to))
}

/// Picks the largest unit in which `hashes_per_second` is at least 1, for display.
pub fn humanize_hash_rate(hashes_per_second: f64) -> (f64, HashRateUnit) {
    let unit = HashRateUnit::ALL
        .into_iter()
        .rev()
        .find(|unit| hashes_per_second.abs() >= unit.multiplier())
        .unwrap_or(HashRateUnit::Hs);
    (convert_hash_rate(hashes_per_second, HashRateUnit::Hs, unit), unit)
}
