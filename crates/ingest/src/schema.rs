//! Strict typed records on top of the normalizer.
//!
//! Policy per field kind:
//! - numeric: missing or malformed -> `0.0`
//! - text: missing -> `""`
//! - boolean: missing or malformed -> `false`
//! - required calendar dates (sales date, planned date): blank or unparseable -> row rejected
//!
//! Rejected rows are logged and skipped; they never abort a dataset.

use chrono::NaiveDate;
use tracing::{debug, warn};

use millboard_core::{
    DomainError, DomainResult, FinishedGoodsInventoryRecord, MaterialForecastRecord,
    ProductionPlanRecord, SalesHistoryRecord, parse_calendar_date,
};

use crate::normalize::{RawRecord, normalize};

/// Conversion from a normalized row into a typed record.
pub trait FromRawRecord: Sized {
    /// Header names that must be present for the dataset to be read at all.
    const COLUMNS: &'static [&'static str];

    /// Human-readable dataset name for logs.
    const KIND: &'static str;

    /// Convert one row. `index` is the 0-based position among data rows.
    fn from_raw(raw: &RawRecord, index: usize) -> DomainResult<Self>;
}

/// Normalize `text` and convert every row, skipping rejected ones.
pub fn parse_records<T: FromRawRecord>(text: &str) -> Vec<T> {
    let rows = normalize(text, T::COLUMNS);
    let mut out = Vec::with_capacity(rows.len());
    for (index, raw) in rows.iter().enumerate() {
        match T::from_raw(raw, index) {
            Ok(record) => out.push(record),
            Err(err) => warn!(kind = T::KIND, row = index, error = %err, "rejecting row"),
        }
    }
    debug!(kind = T::KIND, records = out.len(), "parsed typed records");
    out
}

fn required_date(raw: &RawRecord, column: &str) -> DomainResult<NaiveDate> {
    let text = raw.text(column);
    if text.is_empty() {
        return Err(DomainError::missing_field(column));
    }
    parse_calendar_date(text).ok_or_else(|| DomainError::invalid_date(column, text))
}

fn optional_text(raw: &RawRecord, column: &str) -> Option<String> {
    let text = raw.text(column);
    (!text.is_empty()).then(|| text.to_string())
}

impl FromRawRecord for SalesHistoryRecord {
    const COLUMNS: &'static [&'static str] = &[
        "sales_id",
        "date",
        "sku_id",
        "region",
        "distributor_id",
        "quantity_sold",
        "price_per_unit",
        "promotion_flag",
    ];
    const KIND: &'static str = "sales_history";

    fn from_raw(raw: &RawRecord, _index: usize) -> DomainResult<Self> {
        Ok(Self {
            sales_id: raw.text("sales_id").to_string(),
            date: required_date(raw, "date")?,
            sku_id: raw.text("sku_id").to_string(),
            region: raw.text("region").to_string(),
            distributor_id: raw.text("distributor_id").to_string(),
            quantity_sold: raw.number_or_zero("quantity_sold"),
            price_per_unit: raw.number_or_zero("price_per_unit"),
            promotion_flag: raw.flag("promotion_flag").unwrap_or(false),
        })
    }
}

impl FromRawRecord for ProductionPlanRecord {
    const COLUMNS: &'static [&'static str] = &[
        "plan_id",
        "sku_id",
        "planned_date",
        "planned_quantity",
        "actual_produced_quantity",
        "machine_id",
    ];
    const KIND: &'static str = "production_plan";

    fn from_raw(raw: &RawRecord, _index: usize) -> DomainResult<Self> {
        Ok(Self {
            plan_id: raw.text("plan_id").to_string(),
            sku_id: raw.text("sku_id").to_string(),
            planned_date: required_date(raw, "planned_date")?,
            planned_quantity: raw.number_or_zero("planned_quantity"),
            actual_produced_quantity: raw.number_or_zero("actual_produced_quantity"),
            machine_id: raw.text("machine_id").to_string(),
        })
    }
}

impl FromRawRecord for FinishedGoodsInventoryRecord {
    const COLUMNS: &'static [&'static str] = &[
        "sku_id",
        "sku_name",
        "category",
        "current_stock_units",
        "production_batch_id",
        "last_produced_date",
    ];
    const KIND: &'static str = "finished_goods_inventory";

    fn from_raw(raw: &RawRecord, _index: usize) -> DomainResult<Self> {
        Ok(Self {
            sku_id: raw.text("sku_id").to_string(),
            sku_name: raw.text("sku_name").to_string(),
            category: raw.text("category").to_string(),
            current_stock_units: raw.number_or_zero("current_stock_units"),
            production_batch_id: raw.text("production_batch_id").to_string(),
            last_produced_date: raw.text("last_produced_date").to_string(),
        })
    }
}

impl FromRawRecord for MaterialForecastRecord {
    const COLUMNS: &'static [&'static str] = &[
        "material_id",
        "date",
        "implied_daily_avg",
        "historical_daily_avg",
        "forecast_7d_kg",
        "forecast_14d_kg",
        "forecast_30d_kg",
        "material_name",
        "current_stock_kg",
        "balance_7d",
        "balance_14d",
    ];
    const KIND: &'static str = "material_forecast";

    /// Never rejects: an unparseable anchor date is kept verbatim so that the
    /// stockout prediction can report "no date" while keeping its day count.
    fn from_raw(raw: &RawRecord, index: usize) -> DomainResult<Self> {
        let material_id = optional_text(raw, "material_id");
        let forecast_14d_kg = raw.number_or_zero("forecast_14d_kg");
        let forecast_30d_kg = raw.number_or_zero("forecast_30d_kg");

        let weight = match raw.number("weight") {
            Some(w) if w > 0.0 => w,
            _ => MaterialForecastRecord::default_weight(forecast_30d_kg, forecast_14d_kg),
        };

        let source_date = raw.text("date");
        let date = parse_calendar_date(source_date)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| source_date.to_string());

        Ok(Self {
            id: material_id.clone().unwrap_or_else(|| format!("ROW-{index}")),
            name: raw.text("material_name").to_string(),
            material_id,
            current_stock_kg: raw.number_or_zero("current_stock_kg"),
            forecast_7d_kg: raw.number_or_zero("forecast_7d_kg"),
            forecast_14d_kg,
            forecast_30d_kg,
            balance_7d: raw.number_or_zero("balance_7d"),
            balance_14d: raw.number_or_zero("balance_14d"),
            weight,
            implied_daily_avg: raw.number_or_zero("implied_daily_avg"),
            historical_daily_avg: raw.number_or_zero("historical_daily_avg"),
            date,
            status: optional_text(raw, "status"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATERIALS: &str = "\
material_id,date,implied_daily_avg,historical_daily_avg,deviation_ratio,forecast_7d_kg,forecast_14d_kg,forecast_30d_kg,material_name,current_stock_kg,balance_7d,balance_14d,balance_30d,status
RM-WHEAT,01-03-2024,1000,800,1.25,7000,14000,30000,Hard Wheat,21000,14000,7000,-9000,OK
,bad-date,10,0,0,0,,,Yeast,50,50,50,50,
";

    #[test]
    fn materials_default_ids_weights_and_keep_bad_dates() {
        let rows: Vec<MaterialForecastRecord> = parse_records(MATERIALS);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].id, "RM-WHEAT");
        assert_eq!(rows[0].date, "2024-03-01");
        assert_eq!(rows[0].weight, 30000.0);
        assert_eq!(rows[0].status.as_deref(), Some("OK"));

        assert_eq!(rows[1].id, "ROW-1");
        assert_eq!(rows[1].material_id, None);
        assert_eq!(rows[1].date, "bad-date");
        assert_eq!(rows[1].weight, 1.0);
        assert_eq!(rows[1].forecast_14d_kg, 0.0);
        assert_eq!(rows[1].status, None);
    }

    #[test]
    fn explicit_weight_column_wins_when_positive() {
        let text = "material_id,date,implied_daily_avg,historical_daily_avg,forecast_7d_kg,forecast_14d_kg,forecast_30d_kg,material_name,current_stock_kg,balance_7d,balance_14d,weight\n\
            RM-1,2024-01-01,1,1,7,14,30,Salt,10,3,-4,2.5\n\
            RM-2,2024-01-01,1,1,7,14,30,Salt,10,3,-4,0\n";
        let rows: Vec<MaterialForecastRecord> = parse_records(text);
        assert_eq!(rows[0].weight, 2.5);
        assert_eq!(rows[1].weight, 30.0);
    }

    #[test]
    fn sales_rows_with_bad_dates_are_rejected() {
        let text = "sales_id,date,sku_id,region,distributor_id,quantity_sold,price_per_unit,promotion_flag\n\
            S1,2024-03-01,SKU-FLO-25,Riyadh,D1,40,21.5,False\n\
            S2,someday,SKU-FLO-25,Riyadh,D1,40,21.5,False\n\
            S3,2024-03-02,SKU-FLO-25,Jeddah,D2,oops,,True\n";
        let rows: Vec<SalesHistoryRecord> = parse_records(text);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].sales_id, "S1");
        assert_eq!(rows[1].sales_id, "S3");
        assert_eq!(rows[1].quantity_sold, 0.0);
        assert_eq!(rows[1].price_per_unit, 0.0);
        assert!(rows[1].promotion_flag);
    }

    #[test]
    fn blank_and_unparseable_dates_are_distinguished() {
        let blank = RawRecord::from_pairs([("plan_id", "P1"), ("planned_date", "")]);
        assert_eq!(
            ProductionPlanRecord::from_raw(&blank, 0),
            Err(DomainError::missing_field("planned_date"))
        );
        let garbled = RawRecord::from_pairs([("plan_id", "P1"), ("planned_date", "soon")]);
        assert_eq!(
            ProductionPlanRecord::from_raw(&garbled, 0),
            Err(DomainError::invalid_date("planned_date", "soon"))
        );
    }

    #[test]
    fn production_plan_and_inventory_rows() {
        let plans: Vec<ProductionPlanRecord> = parse_records(
            "plan_id,sku_id,planned_date,planned_quantity,actual_produced_quantity,machine_id\n\
             P1,SKU-FLO-25,2024-03-04,700,650,M-01\n",
        );
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].planned_date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
        assert_eq!(plans[0].planned_quantity, 700.0);

        let inventory: Vec<FinishedGoodsInventoryRecord> = parse_records(
            "sku_id,sku_name,category,current_stock_units,production_batch_id,last_produced_date\n\
             SKU-FLO-25,Flour 25kg,Flour,1200,B-7,2024-03-01\n",
        );
        assert_eq!(inventory[0].current_stock_units, 1200.0);
        assert_eq!(inventory[0].production_batch_id, "B-7");
    }

    #[test]
    fn header_only_and_mismatched_inputs_are_empty() {
        let header_only = format!("{}\n", SalesHistoryRecord::COLUMNS.join(","));
        assert!(parse_records::<SalesHistoryRecord>(&header_only).is_empty());
        assert!(parse_records::<ProductionPlanRecord>("foo,bar\n1,2\n").is_empty());
    }
}
