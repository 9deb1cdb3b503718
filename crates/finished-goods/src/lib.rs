//! Finished-goods forecasting KPIs.
//!
//! Deterministic functions over borrowed sales history, production plans,
//! inventory positions and forecast snapshots. Date windows are always passed
//! in explicitly; nothing here reads the clock.

pub mod accuracy;
pub mod coverage;
pub mod production;
pub mod service;
pub mod surge;

pub use accuracy::{
    AccuracyFilter, SeriesPoint, actual_vs_forecast_series, forecast_accuracy, recent_totals,
};
pub use coverage::{
    average_coverage_days, average_inventory_coverage, coverage_days, critical_skus, days_coverage,
};
pub use production::production_variance;
pub use service::{
    DEFAULT_PRICE_SAR, LostSalesScope, average_fill_rate, fill_rate, lost_sales_sar, lost_units,
};
pub use surge::{SeasonCalendar, demand_surge_index};
