//! `millboard-presentation`: shapes calculator output for the dashboard views.
//!
//! Grouping, labelling and number formatting. KPI math is delegated to the
//! calculator crates.

pub mod format;
pub mod region;
pub mod sku;

pub use format::{
    format_count, format_days, format_percent, format_sar_millions, format_signed_percent,
};
pub use region::{
    Region, RegionParseError, RegionalForecast, SkuServiceRow, group_by_region,
    group_by_region_field, regional_forecast, sku_service_rows,
};
pub use sku::extract_sku_name;
