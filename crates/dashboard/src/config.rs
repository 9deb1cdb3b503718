use std::path::PathBuf;

use chrono::Datelike;
use thiserror::Error;

use millboard_core::SalesHistoryRecord;
use millboard_finished_goods::LostSalesScope;
use millboard_observability::LogFormat;

pub const DATA_DIR_VAR: &str = "MILLBOARD_DATA_DIR";
pub const SEASON_YEAR_VAR: &str = "MILLBOARD_SEASON_YEAR";
pub const LOST_SALES_SCOPE_VAR: &str = "MILLBOARD_LOST_SALES_SCOPE";
pub const LOG_FORMAT_VAR: &str = "MILLBOARD_LOG_FORMAT";
pub const STOCKOUT_LIMIT_VAR: &str = "MILLBOARD_STOCKOUT_LIMIT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}=`{value}`: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Runtime settings of the dashboard binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    /// Year of the season windows; `None` defers to the data (see
    /// [`DashboardConfig::season_year_for`]).
    pub season_year: Option<i32>,
    pub lost_sales_scope: LostSalesScope,
    pub log_format: LogFormat,
    pub stockout_limit: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            season_year: None,
            lost_sales_scope: LostSalesScope::AllForecasts,
            log_format: LogFormat::Json,
            stockout_limit: 5,
        }
    }
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank values take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(DATA_DIR_VAR) {
            config.data_dir = PathBuf::from(dir.trim());
        }

        if let Some(year) = get(SEASON_YEAR_VAR) {
            let parsed = year
                .trim()
                .parse::<i32>()
                .map_err(|err| ConfigError::invalid(SEASON_YEAR_VAR, &year, err.to_string()))?;
            config.season_year = Some(parsed);
        }

        if let Some(scope) = get(LOST_SALES_SCOPE_VAR) {
            config.lost_sales_scope = match scope.trim().to_ascii_lowercase().as_str() {
                "all" => LostSalesScope::AllForecasts,
                "region" => LostSalesScope::Region,
                _ => {
                    return Err(ConfigError::invalid(
                        LOST_SALES_SCOPE_VAR,
                        &scope,
                        "expected `all` or `region`",
                    ));
                }
            };
        }

        if let Some(format) = get(LOG_FORMAT_VAR) {
            config.log_format = format
                .parse()
                .map_err(|err| ConfigError::invalid(LOG_FORMAT_VAR, &format, format!("{err}")))?;
        }

        if let Some(limit) = get(STOCKOUT_LIMIT_VAR) {
            config.stockout_limit = limit
                .trim()
                .parse::<usize>()
                .map_err(|err| ConfigError::invalid(STOCKOUT_LIMIT_VAR, &limit, err.to_string()))?;
        }

        Ok(config)
    }

    /// Configured season year, else the latest year in the sales history,
    /// else `current_year`.
    pub fn season_year_for(&self, sales: &[SalesHistoryRecord], current_year: i32) -> i32 {
        self.season_year
            .or_else(|| sales.iter().map(|s| s.date.year()).max())
            .unwrap_or(current_year)
    }
}
