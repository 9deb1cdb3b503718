//! Seasonal demand surge.

use serde::{Deserialize, Serialize};

use millboard_core::{DateWindow, SalesHistoryRecord, round_to};

/// Average daily quantity sold inside `window`.
fn window_daily_average(sales: &[SalesHistoryRecord], window: &DateWindow) -> f64 {
    let total: f64 = sales
        .iter()
        .filter(|s| window.contains(s.date))
        .map(|s| s.quantity_sold)
        .sum();
    total / window.averaging_days() as f64
}

/// Surge % = `(season daily average / baseline daily average − 1) × 100`, one decimal.
///
/// `0.0` when nothing sold during the baseline.
pub fn demand_surge_index(
    sales: &[SalesHistoryRecord],
    season: DateWindow,
    baseline: DateWindow,
) -> f64 {
    let baseline_avg = window_daily_average(sales, &baseline);
    if baseline_avg == 0.0 {
        return 0.0;
    }
    let season_avg = window_daily_average(sales, &season);
    round_to((season_avg / baseline_avg - 1.0) * 100.0, 1)
}

/// Approximate seasonal windows for one year, used as default surge windows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonCalendar {
    pub year: i32,
    pub ramadan: DateWindow,
    pub hajj: DateWindow,
    pub eid_al_fitr: DateWindow,
    pub eid_al_adha: DateWindow,
    /// Off-season reference period, Jan 1 to Feb 28.
    pub baseline: DateWindow,
}

impl SeasonCalendar {
    /// `None` only for years chrono cannot represent.
    pub fn for_year(year: i32) -> Option<Self> {
        Some(Self {
            year,
            ramadan: DateWindow::from_ymd((year, 3, 22), (year, 4, 21))?,
            hajj: DateWindow::from_ymd((year, 6, 26), (year, 7, 1))?,
            eid_al_fitr: DateWindow::from_ymd((year, 4, 21), (year, 4, 23))?,
            eid_al_adha: DateWindow::from_ymd((year, 6, 28), (year, 6, 30))?,
            baseline: DateWindow::from_ymd((year, 1, 1), (year, 2, 28))?,
        })
    }
}
