use anyhow::{Context, bail};
use chrono::{Datelike, Utc};

use millboard_dashboard::{DashboardConfig, build_snapshot, verify};
use millboard_ingest::{DatasetCache, DirectorySource};

const USAGE: &str = "usage: millboard-dashboard [snapshot|verify]";

fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::from_env().context("reading dashboard configuration")?;
    millboard_observability::init(config.log_format);

    let command = std::env::args().nth(1).unwrap_or_else(|| "snapshot".to_string());
    let cache = DatasetCache::new(DirectorySource::new(&config.data_dir));
    tracing::info!(data_dir = %config.data_dir.display(), %command, "starting");

    match command.as_str() {
        "snapshot" => {
            let snapshot = build_snapshot(&cache, &config, Utc::now().year());
            let json = serde_json::to_string_pretty(&snapshot).context("serializing snapshot")?;
            println!("{json}");
        }
        "verify" => {
            let report = verify(&cache, config.lost_sales_scope);
            let json = serde_json::to_string_pretty(&report).context("serializing report")?;
            println!("{json}");
            if report.has_failures() {
                bail!("{} verification check(s) failed", report.failed);
            }
        }
        other => bail!("unknown command `{other}`\n{USAGE}"),
    }

    Ok(())
}
