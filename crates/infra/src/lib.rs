//! Infrastructure layer: storage adapters, configuration, dashboard wiring.

pub mod config;
pub mod service;
pub mod store;

pub use config::DashboardConfig;
pub use service::{DashboardService, ServiceError};
pub use store::{InMemoryRecordStore, JsonSheetStore, RecordStore, StoreError};
