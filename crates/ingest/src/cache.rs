//! Caller-owned dataset cache.
//!
//! Each dataset is read and parsed at most once per cache lifetime. The owner
//! decides when the data is stale and calls [`DatasetCache::invalidate`]; there
//! is no process-wide state.

use std::cell::OnceCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use millboard_core::{
    FinishedGoodsForecast, FinishedGoodsInventoryRecord, MaterialForecastRecord,
    ProductionPlanRecord, SalesHistoryRecord,
};

use crate::error::{Dataset, IngestError};
use crate::schema::parse_records;
use crate::snapshot::parse_forecast_snapshot;

/// Where dataset text comes from.
pub trait DatasetSource {
    fn read(&self, dataset: Dataset) -> Result<String, IngestError>;
}

/// Reads datasets from files named by [`Dataset::file_name`] under a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DatasetSource for DirectorySource {
    fn read(&self, dataset: Dataset) -> Result<String, IngestError> {
        let path = self.root.join(dataset.file_name());
        std::fs::read_to_string(&path).map_err(|source| IngestError::Io {
            dataset,
            path,
            source,
        })
    }
}

/// In-memory dataset texts (tests, embedding).
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    texts: HashMap<Dataset, String>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, dataset: Dataset, text: impl Into<String>) -> Self {
        self.texts.insert(dataset, text.into());
        self
    }
}

impl DatasetSource for InMemorySource {
    fn read(&self, dataset: Dataset) -> Result<String, IngestError> {
        self.texts
            .get(&dataset)
            .cloned()
            .ok_or(IngestError::Missing(dataset))
    }
}

/// Parsed datasets, populated lazily from a [`DatasetSource`].
#[derive(Debug)]
pub struct DatasetCache<S> {
    source: S,
    materials: OnceCell<Vec<MaterialForecastRecord>>,
    sales: OnceCell<Vec<SalesHistoryRecord>>,
    plans: OnceCell<Vec<ProductionPlanRecord>>,
    inventory: OnceCell<Vec<FinishedGoodsInventoryRecord>>,
    forecasts: OnceCell<Vec<FinishedGoodsForecast>>,
}

impl<S: DatasetSource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            materials: OnceCell::new(),
            sales: OnceCell::new(),
            plans: OnceCell::new(),
            inventory: OnceCell::new(),
            forecasts: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn materials(&self) -> &[MaterialForecastRecord] {
        self.materials
            .get_or_init(|| self.load(Dataset::MaterialForecast, |t| parse_records(t)))
    }

    pub fn sales_history(&self) -> &[SalesHistoryRecord] {
        self.sales
            .get_or_init(|| self.load(Dataset::SalesHistory, |t| parse_records(t)))
    }

    pub fn production_plan(&self) -> &[ProductionPlanRecord] {
        self.plans
            .get_or_init(|| self.load(Dataset::ProductionPlan, |t| parse_records(t)))
    }

    pub fn finished_goods_inventory(&self) -> &[FinishedGoodsInventoryRecord] {
        self.inventory
            .get_or_init(|| self.load(Dataset::FinishedGoodsInventory, |t| parse_records(t)))
    }

    pub fn forecasts(&self) -> &[FinishedGoodsForecast] {
        self.forecasts
            .get_or_init(|| self.load(Dataset::ForecastSnapshot, parse_forecast_snapshot))
    }

    /// Raw text of a dataset, bypassing the cache (e.g. credentials).
    pub fn read_raw(&self, dataset: Dataset) -> Result<String, IngestError> {
        self.source.read(dataset)
    }

    /// Drop every parsed dataset; the next access re-reads the source.
    pub fn invalidate(&mut self) {
        self.materials.take();
        self.sales.take();
        self.plans.take();
        self.inventory.take();
        self.forecasts.take();
        debug!("dataset cache invalidated");
    }

    fn load<T>(&self, dataset: Dataset, parse: impl FnOnce(&str) -> Vec<T>) -> Vec<T> {
        match self.source.read(dataset) {
            Ok(text) => parse(&text),
            Err(err) => {
                warn!(%dataset, error = %err, "dataset unavailable; continuing with no records");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Source that counts reads so tests can observe caching.
    struct CountingSource {
        inner: InMemorySource,
        reads: Cell<usize>,
    }

    impl DatasetSource for CountingSource {
        fn read(&self, dataset: Dataset) -> Result<String, IngestError> {
            self.reads.set(self.reads.get() + 1);
            self.inner.read(dataset)
        }
    }

    const PLAN: &str = "plan_id,sku_id,planned_date,planned_quantity,actual_produced_quantity,machine_id\n\
        P1,SKU-FLO-25,2024-03-04,700,650,M-01\n";

    #[test]
    fn parses_once_until_invalidated() {
        let source = CountingSource {
            inner: InMemorySource::new().with(Dataset::ProductionPlan, PLAN),
            reads: Cell::new(0),
        };
        let mut cache = DatasetCache::new(source);

        assert_eq!(cache.production_plan().len(), 1);
        assert_eq!(cache.production_plan().len(), 1);
        assert_eq!(cache.source().reads.get(), 1);

        cache.invalidate();
        assert_eq!(cache.production_plan().len(), 1);
        assert_eq!(cache.source().reads.get(), 2);
    }

    #[test]
    fn missing_datasets_are_empty_not_errors() {
        let cache = DatasetCache::new(InMemorySource::new());
        assert!(cache.sales_history().is_empty());
        assert!(cache.forecasts().is_empty());
        assert!(matches!(
            cache.read_raw(Dataset::Credentials),
            Err(IngestError::Missing(Dataset::Credentials))
        ));
    }

    #[test]
    fn directory_source_reports_io_errors_with_path() {
        let source = DirectorySource::new("/definitely/not/here");
        let err = source.read(Dataset::SalesHistory).unwrap_err();
        assert!(err.to_string().contains("sales_history.csv"));
    }
}
