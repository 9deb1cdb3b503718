//! `millboard-ingest`: turning bundled text into typed records.
//!
//! Pipeline: delimited text -> [`normalize`] (loosely typed [`RawRecord`]s) ->
//! [`schema`] (strict typed records) -> [`DatasetCache`] (parsed once, owned by
//! the caller). Every failure here is non-fatal: callers get fewer (or zero)
//! records and a `warn!` in the logs, never an error that stops the dashboard.

pub mod cache;
pub mod error;
pub mod normalize;
pub mod schema;
pub mod snapshot;

pub use cache::{DatasetCache, DatasetSource, DirectorySource, InMemorySource};
pub use error::{Dataset, IngestError};
pub use normalize::{Field, FieldValue, NormalizeOptions, RawRecord, normalize, normalize_with};
pub use schema::{FromRawRecord, parse_records};
pub use snapshot::parse_forecast_snapshot;
