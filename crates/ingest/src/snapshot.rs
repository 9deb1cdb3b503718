//! Finished-goods forecast snapshot (JSON array written by the forecasting job).

use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use millboard_core::FinishedGoodsForecast;

/// Parse the forecast snapshot, coercing every field.
///
/// Numbers may arrive as JSON numbers or numeric strings; anything else becomes
/// `0.0`. A non-array document (or invalid JSON) yields no forecasts.
pub fn parse_forecast_snapshot(json: &str) -> Vec<FinishedGoodsForecast> {
    let doc: JsonValue = match serde_json::from_str(json) {
        Ok(v) => v,
        Err(err) => {
            warn!(error = %err, "forecast snapshot is not valid JSON; returning no forecasts");
            return Vec::new();
        }
    };

    let Some(items) = doc.as_array() else {
        warn!("forecast snapshot is not a JSON array; returning no forecasts");
        return Vec::new();
    };

    let forecasts: Vec<FinishedGoodsForecast> = items.iter().map(forecast_from_json).collect();
    debug!(forecasts = forecasts.len(), "parsed forecast snapshot");
    forecasts
}

fn forecast_from_json(item: &JsonValue) -> FinishedGoodsForecast {
    let number = |key: &str| coerce_number(item.get(key));
    FinishedGoodsForecast {
        sku_id: coerce_string(item.get("sku_id")).unwrap_or_default(),
        current_stock: number("current_stock"),
        forecast_7d: number("forecast_7d"),
        forecast_14d: number("forecast_14d"),
        forecast_30d: number("forecast_30d"),
        supply_30d: number("supply_30d"),
        balance_7d: number("balance_7d"),
        balance_14d: number("balance_14d"),
        balance_30d: number("balance_30d"),
        status: coerce_string(item.get("status")).unwrap_or_else(|| "OK".to_string()),
        region: coerce_string(item.get("region")),
    }
}

/// Numbers and numeric strings; booleans and every other shape give 0.
fn coerce_number(value: Option<&JsonValue>) -> f64 {
    let n = match value {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Non-empty string form of a scalar; numbers are stringified.
fn coerce_string(value: Option<&JsonValue>) -> Option<String> {
    match value {
        Some(JsonValue::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_fields_and_defaults_status() {
        let json = r#"[
            {"sku_id": "SKU-FLO-25", "current_stock": 500, "forecast_7d": "700",
             "forecast_14d": 1400, "forecast_30d": 3000, "supply_30d": null,
             "balance_7d": -200, "balance_14d": -900, "balance_30d": -2500,
             "status": "CRITICAL", "region": "Jeddah"},
            {"sku_id": 42, "current_stock": "n/a", "status": ""}
        ]"#;

        let forecasts = parse_forecast_snapshot(json);
        assert_eq!(forecasts.len(), 2);

        let a = &forecasts[0];
        assert_eq!(a.sku_id, "SKU-FLO-25");
        assert_eq!(a.forecast_7d, 700.0);
        assert_eq!(a.supply_30d, 0.0);
        assert_eq!(a.balance_7d, -200.0);
        assert_eq!(a.status, "CRITICAL");
        assert_eq!(a.region.as_deref(), Some("Jeddah"));

        let b = &forecasts[1];
        assert_eq!(b.sku_id, "42");
        assert_eq!(b.current_stock, 0.0);
        assert_eq!(b.status, "OK");
        assert_eq!(b.region, None);
    }

    #[test]
    fn booleans_are_not_numbers() {
        let json = r#"[{"sku_id": "SKU-FLO-25", "current_stock": true, "forecast_7d": false}]"#;
        let forecasts = parse_forecast_snapshot(json);
        assert_eq!(forecasts[0].current_stock, 0.0);
        assert_eq!(forecasts[0].forecast_7d, 0.0);
    }

    #[test]
    fn non_array_documents_are_empty() {
        assert!(parse_forecast_snapshot(r#"{"sku_id": "x"}"#).is_empty());
        assert!(parse_forecast_snapshot("not json").is_empty());
        assert!(parse_forecast_snapshot("[]").is_empty());
    }
}
