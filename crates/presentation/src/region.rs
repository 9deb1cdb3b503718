use core::str::FromStr;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use millboard_core::{FinishedGoodsForecast, SalesHistoryRecord, round_to};
use millboard_finished_goods::{average_fill_rate, lost_sales_sar};

use crate::sku::extract_sku_name;

/// Stock above this multiple of the 30-day forecast counts as overstocked.
const OVERSTOCK_FACTOR: f64 = 1.5;
/// Expected write-off % for an overstocked SKU.
const OVERSTOCK_WRITE_OFF_PCT: f64 = 0.5;
/// Expected write-off % otherwise.
const BASE_WRITE_OFF_PCT: f64 = 0.2;

/// Sales regions shown on the dashboard, in display order.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Region {
    Riyadh,
    Jeddah,
    Dammam,
    South,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Riyadh, Region::Jeddah, Region::Dammam, Region::South];

    pub fn as_str(self) -> &'static str {
        match self {
            Region::Riyadh => "Riyadh",
            Region::Jeddah => "Jeddah",
            Region::Dammam => "Dammam",
            Region::South => "South",
        }
    }
}

impl core::fmt::Display for Region {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown region: {0}")]
pub struct RegionParseError(pub String);

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Region::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| RegionParseError(wanted.to_string()))
    }
}

fn empty_groups<'a, T>() -> BTreeMap<Region, Vec<&'a T>> {
    Region::ALL.into_iter().map(|r| (r, Vec::new())).collect()
}

/// Round-robin records into the four regions by position (`index % 4`).
///
/// Stand-in for data without a region attribute. Every region is present in the
/// result, possibly empty.
pub fn group_by_region<T>(records: &[T]) -> BTreeMap<Region, Vec<&T>> {
    let mut groups = empty_groups();
    for (index, record) in records.iter().enumerate() {
        let region = Region::ALL[index % Region::ALL.len()];
        groups.entry(region).or_default().push(record);
    }
    groups
}

/// Group forecasts by their own `region` tag.
///
/// Untagged forecasts and unknown region names are left out.
pub fn group_by_region_field(
    records: &[FinishedGoodsForecast],
) -> BTreeMap<Region, Vec<&FinishedGoodsForecast>> {
    let mut groups = empty_groups();
    for record in records {
        match record.region.as_deref().map(Region::from_str) {
            Some(Ok(region)) => groups.entry(region).or_default().push(record),
            Some(Err(err)) => {
                debug!(sku_id = %record.sku_id, error = %err, "forecast left out of regional grouping")
            }
            None => {}
        }
    }
    groups
}

/// Total 7-day forecast for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalForecast {
    pub region: Region,
    pub forecast: f64,
}

/// Grouped by the forecasts' own region when any forecast carries one, else
/// round-robin via [`group_by_region`].
fn regional_groups(
    records: &[FinishedGoodsForecast],
) -> BTreeMap<Region, Vec<&FinishedGoodsForecast>> {
    if records.iter().any(|r| r.region.is_some()) {
        group_by_region_field(records)
    } else {
        group_by_region(records)
    }
}

/// Per-region 7-day forecast totals, rounded to whole units, in region order.
pub fn regional_forecast(records: &[FinishedGoodsForecast]) -> Vec<RegionalForecast> {
    regional_groups(records)
        .into_iter()
        .map(|(region, members)| RegionalForecast {
            region,
            forecast: round_to(members.iter().map(|r| r.forecast_7d).sum(), 0),
        })
        .collect()
}

/// Service levels of the lead SKU in one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuServiceRow {
    pub sku: String,
    pub region: Region,
    /// Supply fill %, whole number.
    pub fill: f64,
    /// Lost sales of this SKU in millions of SAR, priced on the region's sales.
    pub lost_sales_sar_millions: f64,
    /// Expected write-off %.
    pub write_off_pct: f64,
}

/// One row per region for the first SKU grouped into it, in region order.
///
/// Regions with no SKUs are left out.
pub fn sku_service_rows(
    sales: &[SalesHistoryRecord],
    forecasts: &[FinishedGoodsForecast],
) -> Vec<SkuServiceRow> {
    regional_groups(forecasts)
        .into_iter()
        .filter_map(|(region, members)| {
            let lead = *members.first()?;
            let write_off_pct = if lead.current_stock > lead.forecast_30d * OVERSTOCK_FACTOR {
                OVERSTOCK_WRITE_OFF_PCT
            } else {
                BASE_WRITE_OFF_PCT
            };
            Some(SkuServiceRow {
                sku: extract_sku_name(&lead.sku_id),
                region,
                fill: round_to(average_fill_rate(core::slice::from_ref(lead)), 0),
                lost_sales_sar_millions: lost_sales_sar(
                    sales,
                    core::slice::from_ref(lead),
                    Some(region.as_str()),
                ),
                write_off_pct,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn forecast(sku: &str, f7: f64, region: Option<&str>) -> FinishedGoodsForecast {
        FinishedGoodsForecast {
            sku_id: sku.to_string(),
            forecast_7d: f7,
            region: region.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("jeddah".parse::<Region>(), Ok(Region::Jeddah));
        assert_eq!(" SOUTH ".parse::<Region>(), Ok(Region::South));
        assert_eq!(
            "Mecca".parse::<Region>(),
            Err(RegionParseError("Mecca".to_string()))
        );
        assert_eq!(Region::Dammam.to_string(), "Dammam");
    }

    #[test]
    fn round_robin_fills_regions_in_order() {
        let records: Vec<u32> = (0..6).collect();
        let groups = group_by_region(&records);
        assert_eq!(groups[&Region::Riyadh], vec![&records[0], &records[4]]);
        assert_eq!(groups[&Region::Jeddah], vec![&records[1], &records[5]]);
        assert_eq!(groups[&Region::Dammam], vec![&records[2]]);
        assert_eq!(groups[&Region::South], vec![&records[3]]);
    }

    #[test]
    fn empty_input_still_lists_every_region() {
        let groups = group_by_region::<FinishedGoodsForecast>(&[]);
        assert_eq!(groups.len(), 4);
        assert!(groups.values().all(Vec::is_empty));
    }

    #[test]
    fn field_grouping_skips_untagged_and_unknown() {
        let records = [
            forecast("a", 1.0, Some("riyadh")),
            forecast("b", 1.0, None),
            forecast("c", 1.0, Some("Atlantis")),
            forecast("d", 1.0, Some("South")),
        ];
        let groups = group_by_region_field(&records);
        assert_eq!(groups[&Region::Riyadh].len(), 1);
        assert_eq!(groups[&Region::South][0].sku_id, "d");
        assert_eq!(groups.values().map(Vec::len).sum::<usize>(), 2);
    }

    #[test]
    fn regional_forecast_prefers_region_tags() {
        let tagged = [
            forecast("a", 100.4, Some("Jeddah")),
            forecast("b", 200.0, Some("Jeddah")),
        ];
        let rows = regional_forecast(&tagged);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[1], RegionalForecast { region: Region::Jeddah, forecast: 300.0 });
        assert_eq!(rows[0].forecast, 0.0);

        let untagged = [forecast("a", 10.0, None), forecast("b", 20.0, None)];
        let rows = regional_forecast(&untagged);
        assert_eq!(rows[0].forecast, 10.0);
        assert_eq!(rows[1].forecast, 20.0);
    }

    #[test]
    fn sku_service_takes_the_lead_sku_per_region() {
        let mut short = forecast("SKU-FLO-25", 700.0, Some("Riyadh"));
        short.current_stock = 350.0;
        short.balance_7d = -100_000.0;
        short.forecast_30d = 3000.0;
        let mut overstocked = forecast("SKU-SEM-10", 100.0, Some("Jeddah"));
        overstocked.current_stock = 5000.0;
        overstocked.forecast_30d = 400.0;
        let trailing = forecast("SKU-BRN-01", 100.0, Some("Riyadh"));

        let rows = sku_service_rows(&[], &[short, trailing, overstocked]);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].region, Region::Riyadh);
        assert_eq!(rows[0].fill, 50.0);
        // 100k units at the default price
        assert_eq!(rows[0].lost_sales_sar_millions, 2.1);
        assert_eq!(rows[0].write_off_pct, 0.2);

        assert_eq!(rows[1].region, Region::Jeddah);
        assert_eq!(rows[1].fill, 100.0);
        assert_eq!(rows[1].lost_sales_sar_millions, 0.0);
        assert_eq!(rows[1].write_off_pct, 0.5);
    }

    #[test]
    fn sku_service_is_empty_without_forecasts() {
        assert!(sku_service_rows(&[], &[]).is_empty());
    }

    #[test]
    fn serializes_region_names() {
        let row = RegionalForecast { region: Region::South, forecast: 5.0 };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["region"], "South");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: record i lands in region i % 4 and nothing is lost.
        #[test]
        fn round_robin_is_index_modulo_four(len in 0usize..200) {
            let records: Vec<usize> = (0..len).collect();
            let groups = group_by_region(&records);
            prop_assert_eq!(groups.values().map(Vec::len).sum::<usize>(), len);
            for (region, members) in &groups {
                for index in members {
                    prop_assert_eq!(Region::ALL[**index % 4], *region);
                }
            }
        }
    }
}
