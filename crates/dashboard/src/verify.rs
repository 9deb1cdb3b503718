//! Integration check over the loaded datasets and the finished-goods KPIs.
//!
//! Reports problems instead of failing: every check yields a row.

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use tracing::info;

use millboard_finished_goods::{
    AccuracyFilter, LostSalesScope, coverage_days, critical_skus, fill_rate, forecast_accuracy,
    lost_sales_sar, production_variance,
};
use millboard_auth::CredentialTable;
use millboard_ingest::{Dataset, DatasetCache, DatasetSource};
use millboard_presentation::{Region, format_percent, format_signed_percent};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    Pass,
    Warning,
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub component: String,
    pub status: VerificationStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "JsonValue::is_null")]
    pub details: JsonValue,
}

impl VerificationResult {
    fn new(component: &str, status: VerificationStatus, message: impl Into<String>) -> Self {
        Self {
            component: component.to_string(),
            status,
            message: message.into(),
            details: JsonValue::Null,
        }
    }

    fn with_details(mut self, details: JsonValue) -> Self {
        self.details = details;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub results: Vec<VerificationResult>,
    pub passed: usize,
    pub warnings: usize,
    pub failed: usize,
}

impl VerificationReport {
    fn from_results(results: Vec<VerificationResult>) -> Self {
        let count = |status: VerificationStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            passed: count(VerificationStatus::Pass),
            warnings: count(VerificationStatus::Warning),
            failed: count(VerificationStatus::Fail),
            results,
        }
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

fn in_percent_range(value: f64) -> VerificationStatus {
    if (0.0..=100.0).contains(&value) {
        VerificationStatus::Pass
    } else {
        VerificationStatus::Warning
    }
}

/// Check that every dataset loaded and every finished-goods KPI computes.
pub fn verify<S: DatasetSource>(cache: &DatasetCache<S>, scope: LostSalesScope) -> VerificationReport {
    use VerificationStatus::{Fail, Pass, Warning};

    let materials = cache.materials();
    let forecasts = cache.forecasts();
    let sales = cache.sales_history();
    let plans = cache.production_plan();
    let inventory = cache.finished_goods_inventory();
    let mut results = Vec::new();

    results.push(if materials.is_empty() {
        VerificationResult::new("Material Forecasts", Warning, "No raw-material forecasts loaded")
            .with_details(json!({ "count": 0 }))
    } else {
        VerificationResult::new(
            "Material Forecasts",
            Pass,
            format!("Loaded {} material records", materials.len()),
        )
        .with_details(json!({ "count": materials.len(), "sample": materials[0] }))
    });

    results.push(if forecasts.is_empty() {
        VerificationResult::new("Backend Forecasts", Fail, "No forecast data loaded")
            .with_details(json!({ "count": 0 }))
    } else {
        VerificationResult::new(
            "Backend Forecasts",
            Pass,
            format!("Loaded {} forecast records", forecasts.len()),
        )
        .with_details(json!({
            "count": forecasts.len(),
            "sample": forecasts[0],
            "critical_skus": critical_skus(forecasts).len(),
        }))
    });

    results.push(if sales.is_empty() {
        VerificationResult::new(
            "Sales History",
            Warning,
            "Sales history is empty - KPIs may not calculate correctly",
        )
        .with_details(json!({ "count": 0 }))
    } else {
        let earliest = sales.iter().map(|s| s.date).min();
        let latest = sales.iter().map(|s| s.date).max();
        VerificationResult::new(
            "Sales History",
            Pass,
            format!("Loaded {} sales records", sales.len()),
        )
        .with_details(json!({
            "count": sales.len(),
            "sample": sales[0],
            "date_range": { "earliest": earliest, "latest": latest },
        }))
    });

    results.push(if plans.is_empty() {
        VerificationResult::new(
            "Production Plan",
            Warning,
            "Production plan is empty - production variance KPI will be 0",
        )
        .with_details(json!({ "count": 0 }))
    } else {
        VerificationResult::new(
            "Production Plan",
            Pass,
            format!("Loaded {} production records", plans.len()),
        )
        .with_details(json!({ "count": plans.len(), "sample": plans[0] }))
    });

    results.push(if inventory.is_empty() {
        VerificationResult::new(
            "Inventory",
            Warning,
            "Inventory is empty - coverage days KPI will be 0",
        )
        .with_details(json!({ "count": 0 }))
    } else {
        let total_stock: f64 = inventory.iter().map(|i| i.current_stock_units).sum();
        VerificationResult::new(
            "Inventory",
            Pass,
            format!("Loaded {} inventory records", inventory.len()),
        )
        .with_details(json!({
            "count": inventory.len(),
            "sample": inventory[0],
            "total_stock": total_stock,
        }))
    });

    results.push(match cache.read_raw(Dataset::Credentials) {
        Ok(text) => {
            let table = CredentialTable::parse(&text);
            if table.is_empty() {
                VerificationResult::new("Login Credentials", Warning, "Credential table has no usable logins")
            } else {
                VerificationResult::new(
                    "Login Credentials",
                    Pass,
                    format!("Loaded {} logins", table.len()),
                )
                .with_details(json!({ "count": table.len() }))
            }
        }
        Err(err) => VerificationResult::new(
            "Login Credentials",
            Warning,
            format!("Credential table unavailable: {err}"),
        ),
    });

    if !sales.is_empty() && !plans.is_empty() {
        let accuracy = forecast_accuracy(sales, plans, AccuracyFilter::default());
        results.push(
            VerificationResult::new(
                "KPI: Forecast Accuracy",
                in_percent_range(accuracy),
                format!("Forecast Accuracy: {}", format_percent(accuracy)),
            )
            .with_details(json!({ "value": accuracy })),
        );
    } else {
        results.push(VerificationResult::new(
            "KPI: Forecast Accuracy",
            Warning,
            "Cannot calculate - missing sales history or production plan data",
        ));
    }

    if !sales.is_empty() && !forecasts.is_empty() {
        let region = Region::Riyadh;
        let rate = fill_rate(sales, forecasts, region.as_str(), scope);
        results.push(
            VerificationResult::new(
                &format!("KPI: Fill Rate ({region})"),
                in_percent_range(rate),
                format!("Fill Rate: {}", format_percent(rate)),
            )
            .with_details(json!({ "value": rate, "scope": scope })),
        );
    }

    if !plans.is_empty() {
        let variance = production_variance(plans, None);
        results.push(
            VerificationResult::new(
                "KPI: Production Variance",
                Pass,
                format!("Production Variance: {}", format_signed_percent(variance)),
            )
            .with_details(json!({ "value": variance })),
        );
    }

    if let Some(first) = inventory.first().filter(|_| !sales.is_empty()) {
        let coverage = coverage_days(first, sales, &first.sku_id);
        results.push(
            VerificationResult::new(
                "KPI: Coverage Days",
                if coverage >= 0.0 { Pass } else { Warning },
                format!("Sample Coverage: {coverage:.1} days"),
            )
            .with_details(json!({ "value": coverage, "sku": first.sku_id })),
        );
    }

    if !sales.is_empty() && !forecasts.is_empty() {
        let lost = lost_sales_sar(sales, forecasts, None);
        results.push(
            VerificationResult::new(
                "KPI: Lost Sales",
                if lost >= 0.0 { Pass } else { Warning },
                format!("Lost Sales: SAR {lost:.1}M"),
            )
            .with_details(json!({ "value": lost })),
        );
    }

    let counts = json!({
        "forecasts": forecasts.len(),
        "sales_history": sales.len(),
        "production_plan": plans.len(),
    });
    results.push(if !forecasts.is_empty() && !sales.is_empty() && !plans.is_empty() {
        VerificationResult::new("Data Connections", Pass, "All data sources connected and ready")
            .with_details(counts)
    } else {
        VerificationResult::new("Data Connections", Warning, "Some data sources are missing")
            .with_details(counts)
    });

    let report = VerificationReport::from_results(results);
    info!(
        passed = report.passed,
        warnings = report.warnings,
        failed = report.failed,
        "integration verification finished"
    );
    report
}
