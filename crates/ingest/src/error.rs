use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Bundled datasets the dashboard knows how to load.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    MaterialForecast,
    SalesHistory,
    ProductionPlan,
    FinishedGoodsInventory,
    ForecastSnapshot,
    Credentials,
}

impl Dataset {
    pub const ALL: [Dataset; 6] = [
        Dataset::MaterialForecast,
        Dataset::SalesHistory,
        Dataset::ProductionPlan,
        Dataset::FinishedGoodsInventory,
        Dataset::ForecastSnapshot,
        Dataset::Credentials,
    ];

    /// File name inside a data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Dataset::MaterialForecast => "inventory-forecast.csv",
            Dataset::SalesHistory => "sales_history.csv",
            Dataset::ProductionPlan => "production_plan.csv",
            Dataset::FinishedGoodsInventory => "finished_goods_inventory.csv",
            Dataset::ForecastSnapshot => "forecast_results.json",
            Dataset::Credentials => "LoginCredentials.csv",
        }
    }
}

impl core::fmt::Display for Dataset {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Dataset::MaterialForecast => "material_forecast",
            Dataset::SalesHistory => "sales_history",
            Dataset::ProductionPlan => "production_plan",
            Dataset::FinishedGoodsInventory => "finished_goods_inventory",
            Dataset::ForecastSnapshot => "forecast_snapshot",
            Dataset::Credentials => "credentials",
        })
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {dataset} from {}: {source}", path.display())]
    Io {
        dataset: Dataset,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {0} is not available from this source")]
    Missing(Dataset),
}
