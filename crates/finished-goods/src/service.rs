//! Service-level KPIs: fill rate and the cost of lost sales.

use serde::{Deserialize, Serialize};

use millboard_core::{FinishedGoodsForecast, SalesHistoryRecord, clamp_percent, round_to, safe_divide};

/// Unit price used when there are no sales to derive a weighted price from.
pub const DEFAULT_PRICE_SAR: f64 = 21.44;

/// Which forecasts count toward lost units in [`fill_rate`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LostSalesScope {
    /// Every forecast's deficit, whatever region is requested.
    #[default]
    AllForecasts,
    /// Only forecasts tagged with the requested region.
    Region,
}

/// Units of unmet demand: `Σ|balance_7d|` over forecasts with a negative 7-day balance.
pub fn lost_units<'a>(forecasts: impl IntoIterator<Item = &'a FinishedGoodsForecast>) -> f64 {
    forecasts
        .into_iter()
        .filter(|f| f.balance_7d < 0.0)
        .map(|f| f.balance_7d.abs())
        .sum()
}

/// Fill rate % = `actual / (actual + lost) × 100` for `region`, one decimal, clamped.
///
/// `100.0` when there is neither demand served nor demand lost.
pub fn fill_rate(
    sales: &[SalesHistoryRecord],
    forecasts: &[FinishedGoodsForecast],
    region: &str,
    scope: LostSalesScope,
) -> f64 {
    let actual: f64 = sales
        .iter()
        .filter(|s| s.region == region)
        .map(|s| s.quantity_sold)
        .sum();

    let lost = match scope {
        LostSalesScope::AllForecasts => lost_units(forecasts),
        LostSalesScope::Region => {
            lost_units(forecasts.iter().filter(|f| f.region.as_deref() == Some(region)))
        }
    };

    let denominator = actual + lost;
    if denominator == 0.0 {
        return 100.0;
    }
    clamp_percent(round_to(actual / denominator * 100.0, 1))
}

/// Mean per-SKU supply fill: `min(100, (stock + supply_30d) / forecast_7d × 100)`.
///
/// A SKU with no forecast demand counts as fully served; one decimal.
pub fn average_fill_rate(forecasts: &[FinishedGoodsForecast]) -> f64 {
    if forecasts.is_empty() {
        return 0.0;
    }
    let sum: f64 = forecasts
        .iter()
        .map(|f| {
            if f.forecast_7d <= 0.0 {
                100.0
            } else {
                (safe_divide(f.current_stock + f.supply_30d, f.forecast_7d) * 100.0).min(100.0)
            }
        })
        .sum();
    round_to(sum / forecasts.len() as f64, 1)
}

/// Lost sales in millions of SAR: lost units priced at the quantity-weighted
/// average sale price, one decimal.
///
/// `region` narrows the sales used for pricing only.
pub fn lost_sales_sar(
    sales: &[SalesHistoryRecord],
    forecasts: &[FinishedGoodsForecast],
    region: Option<&str>,
) -> f64 {
    let (revenue, quantity) = sales
        .iter()
        .filter(|s| region.is_none_or(|r| s.region == r))
        .fold((0.0, 0.0), |(rev, qty), s| {
            (rev + s.quantity_sold * s.price_per_unit, qty + s.quantity_sold)
        });

    let price = if quantity > 0.0 {
        revenue / quantity
    } else {
        DEFAULT_PRICE_SAR
    };
    round_to(lost_units(forecasts) * price / 1_000_000.0, 1)
}
