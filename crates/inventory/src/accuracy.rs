use millboard_core::{MaterialForecastRecord, clamp_percent, round_to, safe_divide};

/// Implied vs historical daily demand, two decimals.
///
/// A zero historical average short-circuits to `0.0` before the guarded division.
pub fn deviation_ratio(record: &MaterialForecastRecord) -> f64 {
    if record.historical_daily_avg == 0.0 {
        return 0.0;
    }
    round_to(
        safe_divide(record.implied_daily_avg, record.historical_daily_avg),
        2,
    )
}

/// Mean deviation ratio across materials, two decimals; `0.0` for no materials.
pub fn average_deviation_ratio(records: &[MaterialForecastRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    round_to(
        records.iter().map(deviation_ratio).sum::<f64>() / records.len() as f64,
        2,
    )
}

/// Mean absolute percentage error, as a percentage with two decimals.
///
/// Indices with a zero actual are skipped. Returns `0.0` when the series are
/// empty, differ in length, or every actual is zero.
pub fn mape(actual: &[f64], forecast: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != forecast.len() {
        return 0.0;
    }

    let mut n = 0usize;
    let mut error_sum = 0.0;
    for (a, f) in actual.iter().zip(forecast) {
        if *a == 0.0 {
            continue;
        }
        error_sum += (a - f).abs() / a.abs();
        n += 1;
    }

    if n == 0 {
        return 0.0;
    }
    round_to(error_sum / n as f64 * 100.0, 2)
}

/// Demand forecast accuracy shown on the executive overview:
/// `100 − MAPE(historical, implied)`, clamped to `[0, 100]`.
pub fn demand_forecast_accuracy(records: &[MaterialForecastRecord]) -> f64 {
    let actual: Vec<f64> = records.iter().map(|r| r.historical_daily_avg).collect();
    let forecast: Vec<f64> = records.iter().map(|r| r.implied_daily_avg).collect();
    clamp_percent(100.0 - mape(&actual, &forecast))
}
