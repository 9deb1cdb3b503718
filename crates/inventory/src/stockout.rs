use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use millboard_core::calendar::add_whole_days;
use millboard_core::{MaterialForecastRecord, round_to, safe_divide};

use crate::coverage::days_coverage;

/// Predicted stockout for one material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedStockout {
    pub id: String,
    pub name: String,
    /// Coverage days (one decimal); `None` when the material has no forecasted demand.
    pub days_to_stockout: Option<f64>,
    /// Anchor date plus the whole days of coverage; `None` when there is no
    /// demand or the anchor date is unparseable.
    pub predicted_stockout_date: Option<NaiveDate>,
}

pub fn predicted_stockout(record: &MaterialForecastRecord) -> PredictedStockout {
    let mut out = PredictedStockout {
        id: record.id.clone(),
        name: record.name.clone(),
        days_to_stockout: None,
        predicted_stockout_date: None,
    };

    if safe_divide(record.forecast_7d_kg, 7.0) <= 0.0 {
        return out;
    }

    let days = days_coverage(record);
    out.days_to_stockout = Some(round_to(days, 1));
    out.predicted_stockout_date = record
        .anchor_date()
        .and_then(|anchor| add_whole_days(anchor, days));
    out
}

pub fn predicted_stockouts(records: &[MaterialForecastRecord]) -> Vec<PredictedStockout> {
    records.iter().map(predicted_stockout).collect()
}

/// Dated predictions ordered soonest first, truncated to `limit`.
pub fn soonest_stockouts(records: &[MaterialForecastRecord], limit: usize) -> Vec<PredictedStockout> {
    let mut dated: Vec<PredictedStockout> = predicted_stockouts(records)
        .into_iter()
        .filter(|p| p.predicted_stockout_date.is_some())
        .collect();
    dated.sort_by_key(|p| p.predicted_stockout_date);
    dated.truncate(limit);
    dated
}
