use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use millboard_core::{ProductionPlanRecord, SalesHistoryRecord, clamp_percent, round_to};

/// Days a weekly production plan is spread over.
const PLAN_DAYS: i64 = 7;

/// Optional narrowing of [`forecast_accuracy`].
///
/// `sku` narrows both sales and plans; `region` narrows sales only, since plan
/// lines carry no region.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AccuracyFilter<'a> {
    pub sku: Option<&'a str>,
    pub region: Option<&'a str>,
}

impl<'a> AccuracyFilter<'a> {
    pub fn sku(sku: &'a str) -> Self {
        Self {
            sku: Some(sku),
            region: None,
        }
    }

    pub fn with_region(mut self, region: &'a str) -> Self {
        self.region = Some(region);
        self
    }

    fn keeps_sale(&self, sale: &SalesHistoryRecord) -> bool {
        self.sku.is_none_or(|s| sale.sku_id == s) && self.region.is_none_or(|r| sale.region == r)
    }

    fn keeps_plan(&self, plan: &ProductionPlanRecord) -> bool {
        self.sku.is_none_or(|s| plan.sku_id == s)
    }
}

/// Spread each weekly plan evenly across the 7 days starting at `planned_date`
/// and hand every `(date, plan, daily quantity)` to `sink`.
fn for_each_planned_day<'p>(
    plans: impl IntoIterator<Item = &'p ProductionPlanRecord>,
    mut sink: impl FnMut(NaiveDate, &'p ProductionPlanRecord, f64),
) {
    for plan in plans {
        let daily = plan.planned_quantity / PLAN_DAYS as f64;
        for offset in 0..PLAN_DAYS {
            if let Some(date) = plan.planned_date.checked_add_signed(Duration::days(offset)) {
                sink(date, plan, daily);
            }
        }
    }
}

/// Forecast accuracy % = `1 − Σ|actual − forecast| / Σactual`, per (date, SKU).
///
/// Sums run over the (date, SKU) keys that have actual sales. The result is
/// rounded to one decimal and clamped to `[0, 100]`; `0.0` when total actual is 0.
pub fn forecast_accuracy(
    sales: &[SalesHistoryRecord],
    plans: &[ProductionPlanRecord],
    filter: AccuracyFilter<'_>,
) -> f64 {
    let mut actual: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for sale in sales.iter().filter(|s| filter.keeps_sale(s)) {
        *actual.entry((sale.date, sale.sku_id.as_str())).or_default() += sale.quantity_sold;
    }

    let mut forecast: BTreeMap<(NaiveDate, &str), f64> = BTreeMap::new();
    for_each_planned_day(plans.iter().filter(|p| filter.keeps_plan(p)), |date, plan, daily| {
        *forecast.entry((date, plan.sku_id.as_str())).or_default() += daily;
    });

    let mut total_actual = 0.0;
    let mut total_error = 0.0;
    for (key, a) in &actual {
        let f = forecast.get(key).copied().unwrap_or(0.0);
        total_actual += a;
        total_error += (a - f).abs();
    }

    if total_actual == 0.0 {
        return 0.0;
    }
    clamp_percent(round_to((1.0 - total_error / total_actual) * 100.0, 1))
}

/// One day of the actual-vs-forecast chart.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub forecast: f64,
}

/// Daily actual sales for `region` merged with the daily spread of every plan,
/// ascending by date. Each date present on either side appears exactly once.
pub fn actual_vs_forecast_series(
    sales: &[SalesHistoryRecord],
    plans: &[ProductionPlanRecord],
    region: &str,
) -> Vec<SeriesPoint> {
    let mut by_date: BTreeMap<NaiveDate, (f64, f64)> = BTreeMap::new();

    for sale in sales.iter().filter(|s| s.region == region) {
        by_date.entry(sale.date).or_default().0 += sale.quantity_sold;
    }
    for_each_planned_day(plans, |date, _, daily| {
        by_date.entry(date).or_default().1 += daily;
    });

    by_date
        .into_iter()
        .map(|(date, (actual, forecast))| SeriesPoint {
            date,
            actual,
            forecast,
        })
        .collect()
}

/// Sum of actual and forecast over the trailing `days` points of a series.
pub fn recent_totals(series: &[SeriesPoint], days: usize) -> (f64, f64) {
    let start = series.len().saturating_sub(days);
    series[start..]
        .iter()
        .fold((0.0, 0.0), |(a, f), p| (a + p.actual, f + p.forecast))
}
