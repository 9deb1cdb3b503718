//! Headless dashboard: configuration, view assembly and the integration check.

pub mod config;
pub mod verify;
pub mod views;

pub use config::{ConfigError, DashboardConfig};
pub use verify::{VerificationReport, VerificationResult, VerificationStatus, verify};
pub use views::{
    DashboardSnapshot, ExecutiveOverview, FinishedGoodsView, KpiTile, RawMaterialsView,
    build_snapshot,
};
