//! Inventory domain module.
//!
//! This crate contains the inventory record model and the dashboard
//! aggregations over it, implemented purely as deterministic domain logic
//! (no IO, no rendering, no storage).

pub mod aggregator;
pub mod record;
pub mod summary;

pub use aggregator::{
    CategorySelector, CategoryTotals, DEFAULT_LOW_STOCK_THRESHOLD, compute_total_value,
    extract_categories, filter_by_category, select_low_stock, summarize_by_category,
};
pub use record::{COLUMN_COUNT, HEADER, InventoryRecord, NewRecord};
pub use summary::DashboardSummary;
