//! View models for the three dashboard pages, assembled from a dataset cache.

use serde::Serialize;
use tracing::{debug, warn};

use millboard_core::{DateWindow, MaterialForecastRecord, round_to};
use millboard_finished_goods::{
    AccuracyFilter, SeasonCalendar, SeriesPoint, actual_vs_forecast_series, average_coverage_days,
    average_fill_rate, average_inventory_coverage, critical_skus, demand_surge_index, fill_rate,
    forecast_accuracy, lost_sales_sar, production_variance, recent_totals,
};
use millboard_ingest::{DatasetCache, DatasetSource};
use millboard_inventory::{
    HealthBucket, PredictedStockout, StockoutRiskIndex, average_days_coverage,
    average_deviation_ratio, days_coverage, demand_forecast_accuracy, health_distribution,
    high_risk_materials, predicted_stockouts, soonest_stockouts, stockout_risk_index,
};
use millboard_presentation::{
    Region, RegionalForecast, SkuServiceRow, extract_sku_name, format_count, format_days,
    format_percent, format_sar_millions, format_signed_percent, regional_forecast,
    sku_service_rows,
};

use crate::config::DashboardConfig;

/// Trailing days summed for the regional actual-vs-forecast chart.
const RECENT_DAYS: usize = 7;

/// One headline number with its display string.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiTile {
    pub label: &'static str,
    pub value: f64,
    pub display: String,
}

impl KpiTile {
    fn new(label: &'static str, value: f64, format: fn(f64) -> String) -> Self {
        Self {
            label,
            value,
            display: format(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutiveOverview {
    pub stockout_risk: StockoutRiskIndex,
    pub average_days_coverage: f64,
    pub demand_forecast_accuracy: f64,
    pub average_deviation_ratio: f64,
    pub materials_at_risk_7d: usize,
    pub materials_at_risk_14d: usize,
    pub tiles: Vec<KpiTile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialRiskRow {
    pub id: String,
    pub name: String,
    pub days_coverage: f64,
    pub balance_7d: f64,
    pub balance_14d: f64,
    pub status: Option<String>,
}

impl From<&MaterialForecastRecord> for MaterialRiskRow {
    fn from(record: &MaterialForecastRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            days_coverage: round_to(days_coverage(record), 1),
            balance_7d: record.balance_7d,
            balance_14d: record.balance_14d,
            status: record.status.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawMaterialsView {
    pub at_risk_7d: Vec<MaterialRiskRow>,
    pub at_risk_14d: Vec<MaterialRiskRow>,
    pub health: [HealthBucket; 4],
    pub soonest_stockouts: Vec<PredictedStockout>,
    pub predicted_stockouts: Vec<PredictedStockout>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalFillRate {
    pub region: Region,
    pub fill_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalActualVsForecast {
    pub region: Region,
    pub actual: f64,
    pub forecast: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalSurge {
    pub ramadan: f64,
    pub hajj: f64,
    pub eid_al_fitr: f64,
    pub eid_al_adha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalSkuRow {
    pub sku_id: String,
    pub name: String,
    pub days_coverage: f64,
    pub balance_7d: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinishedGoodsView {
    pub season_year: i32,
    pub forecast_accuracy: f64,
    pub fill_rates: Vec<RegionalFillRate>,
    /// Mean of the non-zero regional fill rates.
    pub regional_fill_rate: f64,
    pub supply_fill_rate: f64,
    pub demand_surge: SeasonalSurge,
    pub production_variance: f64,
    pub inventory_coverage_days: f64,
    pub forecast_coverage_days: f64,
    pub lost_sales_sar_millions: f64,
    pub critical_skus: Vec<CriticalSkuRow>,
    pub sku_service: Vec<SkuServiceRow>,
    pub regional_forecast: Vec<RegionalForecast>,
    pub actual_vs_forecast: Vec<RegionalActualVsForecast>,
    /// Daily chart for the first region.
    pub series: Vec<SeriesPoint>,
    pub tiles: Vec<KpiTile>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub overview: ExecutiveOverview,
    pub raw_materials: RawMaterialsView,
    pub finished_goods: FinishedGoodsView,
}

pub fn executive_overview(materials: &[MaterialForecastRecord]) -> ExecutiveOverview {
    let stockout_risk = stockout_risk_index(materials);
    let risk = high_risk_materials(materials);
    let average_days_coverage = average_days_coverage(materials);
    let demand_forecast_accuracy = demand_forecast_accuracy(materials);
    let average_deviation_ratio = average_deviation_ratio(materials);

    let tiles = vec![
        KpiTile::new("Stockout risk index", stockout_risk.index, format_percent),
        KpiTile::new("Average coverage", average_days_coverage, format_days),
        KpiTile::new("Demand forecast accuracy", demand_forecast_accuracy, format_percent),
        KpiTile::new("Materials at risk (7d)", risk.within_7d.len() as f64, format_count),
    ];

    ExecutiveOverview {
        stockout_risk,
        average_days_coverage,
        demand_forecast_accuracy,
        average_deviation_ratio,
        materials_at_risk_7d: risk.within_7d.len(),
        materials_at_risk_14d: risk.within_14d.len(),
        tiles,
    }
}

pub fn raw_materials_view(materials: &[MaterialForecastRecord], stockout_limit: usize) -> RawMaterialsView {
    let risk = high_risk_materials(materials);
    RawMaterialsView {
        at_risk_7d: risk.within_7d.into_iter().map(MaterialRiskRow::from).collect(),
        at_risk_14d: risk.within_14d.into_iter().map(MaterialRiskRow::from).collect(),
        health: health_distribution(materials),
        soonest_stockouts: soonest_stockouts(materials, stockout_limit),
        predicted_stockouts: predicted_stockouts(materials),
    }
}

pub fn finished_goods_view<S: DatasetSource>(
    cache: &DatasetCache<S>,
    config: &DashboardConfig,
    season_year: i32,
) -> FinishedGoodsView {
    let sales = cache.sales_history();
    let plans = cache.production_plan();
    let inventory = cache.finished_goods_inventory();
    let forecasts = cache.forecasts();

    let fill_rates: Vec<RegionalFillRate> = Region::ALL
        .into_iter()
        .map(|region| RegionalFillRate {
            region,
            fill_rate: fill_rate(sales, forecasts, region.as_str(), config.lost_sales_scope),
        })
        .collect();
    let positive: Vec<f64> = fill_rates
        .iter()
        .map(|r| r.fill_rate)
        .filter(|r| *r > 0.0)
        .collect();
    let regional_fill_rate = if positive.is_empty() {
        0.0
    } else {
        round_to(positive.iter().sum::<f64>() / positive.len() as f64, 1)
    };

    let demand_surge = match SeasonCalendar::for_year(season_year) {
        Some(calendar) => {
            let surge = |season: DateWindow| demand_surge_index(sales, season, calendar.baseline);
            SeasonalSurge {
                ramadan: surge(calendar.ramadan),
                hajj: surge(calendar.hajj),
                eid_al_fitr: surge(calendar.eid_al_fitr),
                eid_al_adha: surge(calendar.eid_al_adha),
            }
        }
        None => {
            warn!(season_year, "no season calendar for year; surge indices set to 0");
            SeasonalSurge {
                ramadan: 0.0,
                hajj: 0.0,
                eid_al_fitr: 0.0,
                eid_al_adha: 0.0,
            }
        }
    };

    let actual_vs_forecast = Region::ALL
        .into_iter()
        .map(|region| {
            let series = actual_vs_forecast_series(sales, plans, region.as_str());
            let (actual, forecast) = recent_totals(&series, RECENT_DAYS);
            RegionalActualVsForecast {
                region,
                actual: round_to(actual, 0),
                forecast: round_to(forecast, 0),
            }
        })
        .collect();

    let critical = critical_skus(forecasts)
        .into_iter()
        .map(|f| CriticalSkuRow {
            sku_id: f.sku_id.clone(),
            name: extract_sku_name(&f.sku_id),
            days_coverage: round_to(millboard_finished_goods::days_coverage(f), 1),
            balance_7d: f.balance_7d,
            status: f.status.clone(),
        })
        .collect();

    let forecast_accuracy = forecast_accuracy(sales, plans, AccuracyFilter::default());
    let production_variance = production_variance(plans, None);
    let inventory_coverage_days = average_inventory_coverage(inventory, sales);
    let lost_sales = lost_sales_sar(sales, forecasts, None);

    let tiles = vec![
        KpiTile::new("Forecast accuracy", forecast_accuracy, format_percent),
        KpiTile::new("Fill rate", regional_fill_rate, format_percent),
        KpiTile::new("Demand surge index", demand_surge.ramadan, format_signed_percent),
        KpiTile::new("Over / under production", production_variance, format_signed_percent),
        KpiTile::new("FG coverage days", inventory_coverage_days, format_days),
        KpiTile::new("Lost sales", lost_sales, format_sar_millions),
    ];

    FinishedGoodsView {
        season_year,
        forecast_accuracy,
        fill_rates,
        regional_fill_rate,
        supply_fill_rate: average_fill_rate(forecasts),
        demand_surge,
        production_variance,
        inventory_coverage_days,
        forecast_coverage_days: average_coverage_days(forecasts),
        lost_sales_sar_millions: lost_sales,
        critical_skus: critical,
        sku_service: sku_service_rows(sales, forecasts),
        regional_forecast: regional_forecast(forecasts),
        actual_vs_forecast,
        series: actual_vs_forecast_series(sales, plans, Region::ALL[0].as_str()),
        tiles,
    }
}

/// Assemble every dashboard page. `current_year` is only used when neither the
/// configuration nor the sales history names a season year.
pub fn build_snapshot<S: DatasetSource>(
    cache: &DatasetCache<S>,
    config: &DashboardConfig,
    current_year: i32,
) -> DashboardSnapshot {
    let materials = cache.materials();
    let season_year = config.season_year_for(cache.sales_history(), current_year);
    debug!(
        materials = materials.len(),
        forecasts = cache.forecasts().len(),
        season_year,
        "assembling dashboard snapshot"
    );

    DashboardSnapshot {
        overview: executive_overview(materials),
        raw_materials: raw_materials_view(materials, config.stockout_limit),
        finished_goods: finished_goods_view(cache, config, season_year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn material(id: &str, stock: f64, forecast_7d: f64) -> MaterialForecastRecord {
        MaterialForecastRecord {
            id: id.to_string(),
            name: format!("{id} name"),
            current_stock_kg: stock,
            forecast_7d_kg: forecast_7d,
            balance_7d: stock - forecast_7d,
            balance_14d: stock - 2.0 * forecast_7d,
            weight: 1.0,
            date: "2024-03-01".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn overview_tiles_carry_display_strings() {
        let materials = [material("a", 200.0, 700.0), material("b", 14_000.0, 700.0)];
        let overview = executive_overview(&materials);
        assert_eq!(overview.stockout_risk.index, 50.0);
        assert_eq!(overview.materials_at_risk_7d, 1);
        assert_eq!(overview.tiles[0].display, "50.0%");
        assert_eq!(overview.tiles[1].display, "71.0 days");
    }

    #[test]
    fn raw_materials_limit_soonest_stockouts() {
        let materials = [
            material("a", 200.0, 700.0),
            material("b", 500.0, 700.0),
            material("c", 900.0, 700.0),
        ];
        let view = raw_materials_view(&materials, 2);
        let soonest: Vec<&str> = view.soonest_stockouts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(soonest, vec!["a", "b"]);
        assert_eq!(view.predicted_stockouts.len(), 3);
        assert_eq!(view.at_risk_7d[0].days_coverage, 2.0);
    }
}
