use std::collections::BTreeMap;

use chrono::NaiveDate;

use millboard_core::{
    FinishedGoodsForecast, FinishedGoodsInventoryRecord, SalesHistoryRecord, round_to, safe_divide,
};

/// Days the SKU's stock lasts at the 7-day forecast burn rate; `0.0` without demand.
pub fn days_coverage(record: &FinishedGoodsForecast) -> f64 {
    let daily_demand = safe_divide(record.forecast_7d, 7.0);
    if daily_demand <= 0.0 {
        return 0.0;
    }
    safe_divide(record.current_stock, daily_demand)
}

/// SKUs with a negative 7-day balance or less than 7 days of coverage.
pub fn critical_skus(records: &[FinishedGoodsForecast]) -> Vec<&FinishedGoodsForecast> {
    records
        .iter()
        .filter(|r| r.balance_7d < 0.0 || days_coverage(r) < 7.0)
        .collect()
}

/// Mean forecast coverage across SKUs, one decimal.
pub fn average_coverage_days(records: &[FinishedGoodsForecast]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let sum: f64 = records.iter().map(days_coverage).sum();
    round_to(sum / records.len() as f64, 1)
}

/// Inventory coverage = stock / mean daily units sold, one decimal.
///
/// The mean runs over the distinct dates on which `sku_id` sold. `0.0` when the
/// SKU has no sales rows or sold nothing.
pub fn coverage_days(
    inventory: &FinishedGoodsInventoryRecord,
    sales: &[SalesHistoryRecord],
    sku_id: &str,
) -> f64 {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for sale in sales.iter().filter(|s| s.sku_id == sku_id) {
        *daily.entry(sale.date).or_default() += sale.quantity_sold;
    }
    if daily.is_empty() {
        return 0.0;
    }

    let avg_daily_demand = daily.values().sum::<f64>() / daily.len() as f64;
    if avg_daily_demand == 0.0 {
        return 0.0;
    }
    round_to(safe_divide(inventory.current_stock_units, avg_daily_demand), 1)
}

/// Mean of the positive per-SKU inventory coverages, one decimal.
pub fn average_inventory_coverage(
    inventory: &[FinishedGoodsInventoryRecord],
    sales: &[SalesHistoryRecord],
) -> f64 {
    let coverages: Vec<f64> = inventory
        .iter()
        .map(|inv| coverage_days(inv, sales, &inv.sku_id))
        .filter(|c| *c > 0.0)
        .collect();
    if coverages.is_empty() {
        return 0.0;
    }
    round_to(coverages.iter().sum::<f64>() / coverages.len() as f64, 1)
}
