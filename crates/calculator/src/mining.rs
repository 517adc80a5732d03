use crate::error::{CalcError, ensure_non_negative, ensure_positive};
use core_types::{
    BreakEven, MiningProfitability, NetworkInfo, PeriodBreakdown, ValuePair,
};

pub const SECONDS_PER_DAY: f64 = 86_400.0;
/// Average month length; not calendar-exact.
pub const DAYS_PER_MONTH: f64 = 30.44;
/// Average year length, leap years included.
pub const DAYS_PER_YEAR: f64 = 365.25;
/// The network hash rate is quoted in TH/s.
pub const NETWORK_HASHRATE_TO_HS: f64 = 1e12;

/// Estimates the earnings of a miner contributing `hash_rate_hs` to the network
/// described by `network`.
///
/// Rewards are reported after the pool fee. Break-even is a same-day indicator:
/// `0` days when the daily USD profit is positive, otherwise unreachable.
///
/// # Arguments
///
/// * `hash_rate_hs` - The miner's hash rate in H/s.
/// * `power_watts` - Power draw of the hardware.
/// * `electricity_cost_per_kwh` - Electricity price in USD per kWh.
/// * `pool_fee_fraction` - Share of rewards kept by the pool, in `[0, 1]`.
/// * `network` - The current network snapshot (hash rate in TH/s).
pub fn mining_profitability(
    hash_rate_hs: f64,
    power_watts: f64,
    electricity_cost_per_kwh: f64,
    pool_fee_fraction: f64,
    network: &NetworkInfo,
) -> Result<MiningProfitability, CalcError> {
    ensure_non_negative("hash_rate", hash_rate_hs)?;
    ensure_non_negative("power_watts", power_watts)?;
    ensure_non_negative("electricity_cost_per_kwh", electricity_cost_per_kwh)?;
    ensure_non_negative("pool_fee", pool_fee_fraction)?;
    if pool_fee_fraction > 1.0 {
        return Err(CalcError::invalid(
            "pool_fee",
            format!("must be a fraction between 0 and 1, got {}", pool_fee_fraction),
        ));
    }
    validate_network(network)?;

    let blocks_per_day = SECONDS_PER_DAY / network.block_time;
    let network_hashrate_hs = network.hashrate * NETWORK_HASHRATE_TO_HS;
    let daily_btc_reward =
        (hash_rate_hs / network_hashrate_hs) * network.block_reward * blocks_per_day;
    let daily_btc_after_fee = daily_btc_reward * (1.0 - pool_fee_fraction);

    let daily_kwh = (power_watts / 1000.0) * 24.0;
    let daily_cost_usd = daily_kwh * electricity_cost_per_kwh;

    let daily_profit_usd = daily_btc_after_fee * network.price - daily_cost_usd;
    let daily_profit_btc = daily_btc_after_fee - daily_cost_usd / network.price;

    let rewards = scale(ValuePair {
        btc: daily_btc_after_fee,
        usd: daily_btc_after_fee * network.price,
    });
    let profits = scale(ValuePair {
        btc: daily_profit_btc,
        usd: daily_profit_usd,
    });
    let costs = PeriodBreakdown {
        daily: daily_cost_usd,
        monthly: daily_cost_usd * DAYS_PER_MONTH,
        yearly: daily_cost_usd * DAYS_PER_YEAR,
    };

    let break_even = BreakEven {
        days: if daily_profit_usd > 0.0 { 0.0 } else { f64::INFINITY },
    };

    tracing::debug!(
        hash_rate_hs,
        daily_btc_reward,
        daily_profit_usd,
        "Computed mining profitability."
    );

    Ok(MiningProfitability {
        rewards,
        costs,
        profits,
        break_even,
    })
}

/// Expected BTC per day before the pool fee.
pub fn daily_btc_reward(hash_rate_hs: f64, network: &NetworkInfo) -> Result<f64, CalcError> {
    ensure_non_negative("hash_rate", hash_rate_hs)?;
    validate_network(network)?;
    let blocks_per_day = SECONDS_PER_DAY / network.block_time;
    Ok((hash_rate_hs / (network.hashrate * NETWORK_HASHRATE_TO_HS))
        * network.block_reward
        * blocks_per_day)
}

fn validate_network(network: &NetworkInfo) -> Result<(), CalcError> {
    ensure_positive("network.hashrate", network.hashrate)?;
    ensure_positive("network.block_time", network.block_time)?;
    ensure_non_negative("network.block_reward", network.block_reward)?;
    // The BTC-denominated profit divides by the price.
    ensure_positive("network.price", network.price)?;
    Ok(())
}

fn scale(daily: ValuePair) -> PeriodBreakdown<ValuePair> {
    PeriodBreakdown {
        daily,
        monthly: ValuePair {
            btc: daily.btc * DAYS_PER_MONTH,
            usd: daily.usd * DAYS_PER_MONTH,
        },
        yearly: ValuePair {
            btc: daily.btc * DAYS_PER_YEAR,
            usd: daily.usd * DAYS_PER_YEAR,
        },
    }
}
