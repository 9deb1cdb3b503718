//! Typed input records.
//!
//! Records are created once per normalization call and never mutated; the
//! calculators borrow slices of them and return freshly computed values.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar::parse_calendar_date;
use crate::value_object::ValueObject;

/// Raw-material forecast snapshot row (kilograms).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaterialForecastRecord {
    pub id: String,
    pub name: String,
    pub material_id: Option<String>,
    /// Current on-hand inventory.
    pub current_stock_kg: f64,
    /// Total forecasted demand over the next 7 days.
    pub forecast_7d_kg: f64,
    pub forecast_14d_kg: f64,
    pub forecast_30d_kg: f64,
    /// Stock minus cumulative demand after 7 days (may be negative).
    pub balance_7d: f64,
    pub balance_14d: f64,
    /// Weight of the material in the stockout risk index (> 0).
    pub weight: f64,
    pub implied_daily_avg: f64,
    pub historical_daily_avg: f64,
    /// Anchor date of the snapshot: ISO `YYYY-MM-DD` when the source was
    /// parseable, the verbatim source text otherwise.
    pub date: String,
    pub status: Option<String>,
}

impl MaterialForecastRecord {
    /// Weight used when the source carries none: the larger horizon volume, at least 1.
    pub fn default_weight(forecast_30d_kg: f64, forecast_14d_kg: f64) -> f64 {
        forecast_30d_kg.max(forecast_14d_kg).max(1.0)
    }

    /// Parsed anchor date, `None` when the stored text is not a calendar date.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

/// Finished-goods forecast for one SKU (units).
///
/// `balance_*` values come from the upstream forecasting job and are never
/// recomputed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedGoodsForecast {
    pub sku_id: String,
    pub current_stock: f64,
    pub forecast_7d: f64,
    pub forecast_14d: f64,
    pub forecast_30d: f64,
    pub supply_30d: f64,
    pub balance_7d: f64,
    pub balance_14d: f64,
    pub balance_30d: f64,
    pub status: String,
    /// Sales region, when the snapshot provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl Default for FinishedGoodsForecast {
    fn default() -> Self {
        Self {
            sku_id: String::new(),
            current_stock: 0.0,
            forecast_7d: 0.0,
            forecast_14d: 0.0,
            forecast_30d: 0.0,
            supply_30d: 0.0,
            balance_7d: 0.0,
            balance_14d: 0.0,
            balance_30d: 0.0,
            status: "OK".to_string(),
            region: None,
        }
    }
}

/// One sales transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesHistoryRecord {
    pub sales_id: String,
    pub date: NaiveDate,
    pub sku_id: String,
    pub region: String,
    pub distributor_id: String,
    pub quantity_sold: f64,
    pub price_per_unit: f64,
    pub promotion_flag: bool,
}

/// One weekly production plan line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionPlanRecord {
    pub plan_id: String,
    pub sku_id: String,
    /// First day of the 7-day plan.
    pub planned_date: NaiveDate,
    /// Quantity planned for the whole week.
    pub planned_quantity: f64,
    pub actual_produced_quantity: f64,
    pub machine_id: String,
}

/// Finished-goods stock position for one SKU.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FinishedGoodsInventoryRecord {
    pub sku_id: String,
    pub sku_name: String,
    pub category: String,
    pub current_stock_units: f64,
    pub production_batch_id: String,
    pub last_produced_date: String,
}

impl ValueObject for MaterialForecastRecord {}
impl ValueObject for FinishedGoodsForecast {}
impl ValueObject for SalesHistoryRecord {}
impl ValueObject for ProductionPlanRecord {}
impl ValueObject for FinishedGoodsInventoryRecord {}
