use millboard_core::{MaterialForecastRecord, round_to, safe_divide};

/// Days the current stock lasts at the 7-day forecast burn rate.
///
/// A material with no forecasted demand reports `0.0`, not infinite coverage.
pub fn days_coverage(record: &MaterialForecastRecord) -> f64 {
    let daily_demand = safe_divide(record.forecast_7d_kg, 7.0);
    if daily_demand <= 0.0 {
        return 0.0;
    }
    safe_divide(record.current_stock_kg, daily_demand)
}

/// Mean coverage across materials, one decimal; `0.0` for no materials.
pub fn average_days_coverage(records: &[MaterialForecastRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(days_coverage).sum();
    round_to(sum / records.len() as f64, 1)
}
