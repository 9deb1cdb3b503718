//! Raw-materials risk calculators.
//!
//! This crate contains the inventory risk KPIs, implemented purely as
//! deterministic functions over borrowed [`MaterialForecastRecord`]s (no IO,
//! no clock reads).
//!
//! [`MaterialForecastRecord`]: millboard_core::MaterialForecastRecord

pub mod accuracy;
pub mod coverage;
pub mod risk;
pub mod stockout;

pub use accuracy::{average_deviation_ratio, demand_forecast_accuracy, deviation_ratio, mape};
pub use coverage::{average_days_coverage, days_coverage};
pub use risk::{
    HealthBucket, HealthBucketLabel, HighRiskMaterials, StockoutRiskIndex, health_distribution,
    high_risk_materials, risk_score, stockout_risk_index,
};
pub use stockout::{PredictedStockout, predicted_stockout, predicted_stockouts, soonest_stockouts};
