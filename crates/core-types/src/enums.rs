use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Units a hash rate can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashRateUnit {
    #[serde(rename = "H/s")]
    Hs,
    #[serde(rename = "KH/s")]
    KHs,
    #[serde(rename = "MH/s")]
    MHs,
    #[serde(rename = "GH/s")]
    GHs,
    #[serde(rename = "TH/s")]
    THs,
    #[serde(rename = "PH/s")]
    PHs,
}

impl HashRateUnit {
    pub const ALL: [HashRateUnit; 6] = [
        HashRateUnit::Hs,
        HashRateUnit::KHs,
        HashRateUnit::MHs,
        HashRateUnit::GHs,
        HashRateUnit::THs,
        HashRateUnit::PHs,
    ];

    /// Number of hashes per second represented by one of this unit.
    pub fn multiplier(&self) -> f64 {
        match self {
            HashRateUnit::Hs => 1.0,
            HashRateUnit::KHs => 1e3,
            HashRateUnit::MHs => 1e6,
            HashRateUnit::GHs => 1e9,
            HashRateUnit::THs => 1e12,
            HashRateUnit::PHs => 1e15,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HashRateUnit::Hs => "H/s",
            HashRateUnit::KHs => "KH/s",
            HashRateUnit::MHs => "MH/s",
            HashRateUnit::GHs => "GH/s",
            HashRateUnit::THs => "TH/s",
            HashRateUnit::PHs => "PH/s",
        }
    }
}

impl fmt::Display for HashRateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashRateUnit {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        HashRateUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::invalid("hash rate unit", format!("unknown unit '{}'", s)))
    }
}

/// Currencies the calculators can price and format amounts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cny,
    Btc,
}

impl Currency {
    pub const ALL: [Currency; 6] = [
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Cny,
        Currency::Btc,
    ];

    /// The lowercase code used by the market-data API (`vs_currency`).
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
            Currency::Cny => "cny",
            Currency::Btc => "btc",
        }
    }

    /// The en-US display symbol. BTC amounts are suffixed instead, so it has none.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            Currency::Usd => Some("$"),
            Currency::Eur => Some("€"),
            Currency::Gbp => Some("£"),
            Currency::Jpy => Some("¥"),
            Currency::Cny => Some("CN¥"),
            Currency::Btc => None,
        }
    }

    pub fn is_fiat(&self) -> bool {
        !matches!(self, Currency::Btc)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Currency::ALL
            .into_iter()
            .find(|currency| currency.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| CoreError::invalid("currency", format!("unrecognized currency code '{}'", s)))
    }
}

/// The calculator a saved calculation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalculationKind {
    Investment,
    Mining,
}

impl CalculationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CalculationKind::Investment => "investment",
            CalculationKind::Mining => "mining",
        }
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "investment" => Ok(CalculationKind::Investment),
            "mining" => Ok(CalculationKind::Mining),
            other => Err(CoreError::invalid("calculation kind", format!("unknown kind '{}'", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_rate_units_parse_case_insensitively() {
        assert_eq!("th/s".parse::<HashRateUnit>().unwrap(), HashRateUnit::THs);
        assert_eq!(" PH/s ".parse::<HashRateUnit>().unwrap(), HashRateUnit::PHs);
        assert_eq!("H/s".parse::<HashRateUnit>().unwrap(), HashRateUnit::Hs);
    }

    #[test]
    fn unknown_hash_rate_unit_is_rejected() {
        let err = "EH/s".parse::<HashRateUnit>().unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(field, _) if field == "hash rate unit"));
    }

    #[test]
    fn unit_display_round_trips_through_parse() {
        for unit in HashRateUnit::ALL {
            assert_eq!(unit.to_string().parse::<HashRateUnit>().unwrap(), unit);
        }
    }

    #[test]
    fn currency_codes_parse() {
        assert_eq!("USD".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!("btc".parse::<Currency>().unwrap(), Currency::Btc);
        assert!("xyz".parse::<Currency>().is_err());
        assert!("".parse::<Currency>().is_err());
    }

    #[test]
    fn currency_serializes_as_lowercase_code() {
        let json = serde_json::to_string(&Currency::Eur).unwrap();
        assert_eq!(json, "\"eur\"");
        let unit = serde_json::to_string(&HashRateUnit::GHs).unwrap();
        assert_eq!(unit, "\"GH/s\"");
    }
}
