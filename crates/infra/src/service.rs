//! Dashboard service: storage adapter → aggregator → view model.

use thiserror::Error;

use stockboard_core::DomainError;
use stockboard_inventory::{CategorySelector, DashboardSummary, InventoryRecord, NewRecord};

use crate::config::DashboardConfig;
use crate::store::{RecordStore, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Serves dashboard views and the registration flow over one record store.
///
/// Holds no derived state: every view is rebuilt from a fresh load.
#[derive(Debug)]
pub struct DashboardService<S>
where
    S: RecordStore,
{
    store: S,
    config: DashboardConfig,
}

impl<S> DashboardService<S>
where
    S: RecordStore,
{
    pub fn new(store: S, config: DashboardConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load every record and build the views for `selector`.
    pub fn dashboard(&self, selector: &CategorySelector) -> Result<DashboardSummary, ServiceError> {
        let records = self.store.load_all()?;
        let summary = DashboardSummary::build(&records, selector, self.config.low_stock_threshold);

        tracing::info!(
            selector = %selector,
            records = records.len(),
            items = summary.item_count,
            low_stock = summary.low_stock_count,
            "built dashboard"
        );
        Ok(summary)
    }

    /// Validate and store a new record.
    pub fn register(&self, input: NewRecord) -> Result<InventoryRecord, ServiceError> {
        let record = input.validate().inspect_err(|e| {
            tracing::warn!(error = %e, "rejected inventory registration");
        })?;

        self.store.append(record.clone())?;
        tracing::info!(
            product = %record.product_name,
            category = ?record.category,
            "registered inventory record"
        );
        Ok(record)
    }
}
