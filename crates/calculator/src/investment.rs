use crate::error::{CalcError, ensure_finite, ensure_non_negative};
use core_types::{ChartPoint, CompoundInterestResult};

/// Monthly compounding, the calculator's default.
pub const DEFAULT_COMPOUNDS_PER_YEAR: u32 = 12;

/// Chart series are sampled once per month.
pub const SAMPLES_PER_YEAR: u32 = 12;

/// Projects `principal` forward with periodic compounding:
/// `A = P * (1 + r/n)^(n*t)`.
///
/// A negative `annual_rate` models depreciation and is accepted. Zero frequency,
/// negative time or principal, non-finite values and rates below `-compounds_per_year`
/// are rejected.
pub fn compound_interest(
    principal: f64,
    annual_rate: f64,
    years: f64,
    compounds_per_year: u32,
) -> Result<CompoundInterestResult, CalcError> {
    ensure_non_negative("principal", principal)?;
    ensure_finite("annual_rate", annual_rate)?;
    ensure_non_negative("years", years)?;
    if compounds_per_year == 0 {
        return Err(CalcError::invalid(
            "compounds_per_year",
            "must be a positive integer",
        ));
    }

    let n = f64::from(compounds_per_year);
    let base = 1.0 + annual_rate / n;
    if base < 0.0 {
        return Err(CalcError::invalid(
            "annual_rate",
            format!(
                "a rate of {} loses more than the whole balance each period",
                annual_rate
            ),
        ));
    }

    let final_amount = principal * base.powf(n * years);
    if !final_amount.is_finite() {
        return Err(CalcError::invalid(
            "annual_rate",
            format!(
                "rate {} compounded {} times a year for {} years has no finite value",
                annual_rate, compounds_per_year, years
            ),
        ));
    }

    Ok(CompoundInterestResult {
        principal,
        final_amount,
        interest_earned: final_amount - principal,
        growth_rate: annual_rate,
    })
}

/// Samples the projection once per whole month from `t = 0` through `t = years`.
///
/// For whole-year horizons this yields `years * 12 + 1` points; a fractional horizon
/// stops at the last whole month.
pub fn compound_interest_series(
    principal: f64,
    annual_rate: f64,
    years: f64,
    compounds_per_year: u32,
) -> Result<Vec<ChartPoint>, CalcError> {
    // Validates every input once, including the end of the horizon.
    compound_interest(principal, annual_rate, years, compounds_per_year)?;

    let months = (years * f64::from(SAMPLES_PER_YEAR)).floor() as u64;
    (0..=months)
        .map(|month| {
            let elapsed = month as f64 / f64::from(SAMPLES_PER_YEAR);
            let result = compound_interest(principal, annual_rate, elapsed, compounds_per_year)?;
            Ok(ChartPoint {
                x: elapsed,
                y: result.final_amount,
            })
        })
        .collect()
}

/// Total return of a projection as a percentage of the principal.
///
/// Returns `None` for a zero principal, where the ratio is undefined.
pub fn total_return_pct(result: &CompoundInterestResult) -> Option<f64> {
    if result.principal > 0.0 {
        Some((result.final_amount / result.principal - 1.0) * 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let scale = expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() / scale < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn matches_the_closed_form() {
        for &(p, r, t, n) in &[
            (1000.0, 0.05, 5.0, 12),
            (250.0, 0.12, 1.5, 4),
            (0.0, 0.3, 10.0, 365),
            (5000.0, -0.1, 3.0, 1),
        ] {
            let result = compound_interest(p, r, t, n).unwrap();
            let nf = f64::from(n);
            assert_close(result.final_amount, p * (1.0 + r / nf).powf(nf * t));
            assert_close(result.interest_earned, result.final_amount - p);
            assert_eq!(result.growth_rate, r);
        }
    }

    #[test]
    fn zero_rate_means_no_growth() {
        let result = compound_interest(1234.56, 0.0, 7.0, 12).unwrap();
        assert_eq!(result.final_amount, 1234.56);
        assert_eq!(result.interest_earned, 0.0);
    }

    #[test]
    fn zero_years_returns_the_principal() {
        let result = compound_interest(800.0, 0.08, 0.0, 12).unwrap();
        assert_eq!(result.final_amount, 800.0);
    }

    #[test]
    fn known_monthly_projection() {
        let result = compound_interest(1000.0, 0.05, 5.0, DEFAULT_COMPOUNDS_PER_YEAR).unwrap();
        assert!((result.final_amount - 1283.36).abs() < 0.01);
        assert!((result.interest_earned - 283.36).abs() < 0.01);
    }

    #[test]
    fn negative_rate_depreciates() {
        let result = compound_interest(1000.0, -0.2, 2.0, 12).unwrap();
        assert!(result.final_amount < 1000.0);
        assert!(result.interest_earned < 0.0);
    }

    #[test]
    fn rejects_invalid_inputs() {
        assert!(matches!(
            compound_interest(1000.0, 0.05, 5.0, 0),
            Err(CalcError::InvalidArgument(field, _)) if field == "compounds_per_year"
        ));
        assert!(compound_interest(-1.0, 0.05, 5.0, 12).is_err());
        assert!(compound_interest(1000.0, 0.05, -1.0, 12).is_err());
        assert!(compound_interest(f64::NAN, 0.05, 5.0, 12).is_err());
        assert!(compound_interest(1000.0, f64::INFINITY, 5.0, 12).is_err());
        // 1 + r/n < 0 would flip the sign of the balance every period.
        assert!(compound_interest(1000.0, -30.0, 0.5, 12).is_err());
        // ...while r = -n wipes it out exactly.
        assert_eq!(compound_interest(1000.0, -12.0, 1.0, 12).unwrap().final_amount, 0.0);
    }

    #[test]
    fn series_shape() {
        let series = compound_interest_series(1000.0, 0.05, 5.0, 12).unwrap();
        assert_eq!(series.len(), 61);
        assert_eq!(series[0], ChartPoint { x: 0.0, y: 1000.0 });

        let last = series.last().unwrap();
        let expected = compound_interest(1000.0, 0.05, 5.0, 12).unwrap();
        assert_eq!(last.x, 5.0);
        assert_eq!(last.y, expected.final_amount);
    }

    #[test]
    fn series_is_deterministic() {
        let a = compound_interest_series(2500.0, 0.07, 3.0, 4).unwrap();
        let b = compound_interest_series(2500.0, 0.07, 3.0, 4).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fractional_horizon_stops_at_last_whole_month() {
        let series = compound_interest_series(100.0, 0.05, 1.3, 12).unwrap();
        // 1.3 years = 15.6 months -> months 0..=15
        assert_eq!(series.len(), 16);
    }

    #[test]
    fn zero_year_series_is_a_single_point() {
        let series = compound_interest_series(100.0, 0.05, 0.0, 12).unwrap();
        assert_eq!(series, vec![ChartPoint { x: 0.0, y: 100.0 }]);
    }

    #[test]
    fn total_return_is_relative_to_principal() {
        let result = compound_interest(1000.0, 0.1, 1.0, 1).unwrap();
        assert_close(total_return_pct(&result).unwrap(), 10.0);
        let empty = compound_interest(0.0, 0.1, 1.0, 1).unwrap();
        assert_eq!(total_return_pct(&empty), None);
    }
}
