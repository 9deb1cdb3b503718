//! `millboard-core`: shared vocabulary of the metrics engine.
//!
//! This crate contains **pure** building blocks (no IO): the record types every
//! calculator borrows, guarded arithmetic, calendar helpers and the domain error.

pub mod calendar;
pub mod error;
pub mod numeric;
pub mod records;
pub mod value_object;

pub use calendar::{DateWindow, parse_calendar_date};
pub use error::{DomainError, DomainResult};
pub use numeric::{clamp_percent, round_to, safe_divide};
pub use records::{
    FinishedGoodsForecast, FinishedGoodsInventoryRecord, MaterialForecastRecord,
    ProductionPlanRecord, SalesHistoryRecord,
};
pub use value_object::ValueObject;
