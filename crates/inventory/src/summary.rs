//! Dashboard view model.
//!
//! One aggregation pass over a freshly loaded record list produces everything
//! the dashboard page shows: selector options, the three headline metrics, the
//! low-stock table, the filtered table and the per-category chart data.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::aggregator::{
    CategorySelector, CategoryTotals, compute_total_value, extract_categories, filter_by_category,
    select_low_stock, summarize_by_category,
};
use crate::record::InventoryRecord;

/// Derived dashboard views for one selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    /// Every grouping key across all records (selector options without `ALL`).
    pub categories: Vec<Option<String>>,
    pub selector: CategorySelector,
    pub low_stock_threshold: u32,
    /// Rows in the filtered view.
    pub item_count: usize,
    /// Value of the filtered view.
    pub total_value: Decimal,
    pub low_stock_count: usize,
    pub low_stock: Vec<InventoryRecord>,
    pub items: Vec<InventoryRecord>,
    /// Chart data, always over all records regardless of the selector.
    pub category_totals: CategoryTotals,
}

impl DashboardSummary {
    pub fn build(
        records: &[InventoryRecord],
        selector: &CategorySelector,
        low_stock_threshold: u32,
    ) -> Self {
        let filtered = filter_by_category(records, selector);
        let low_stock = select_low_stock(filtered.iter().copied(), low_stock_threshold);

        Self {
            categories: extract_categories(records),
            selector: selector.clone(),
            low_stock_threshold,
            item_count: filtered.len(),
            total_value: compute_total_value(filtered.iter().copied()),
            low_stock_count: low_stock.len(),
            low_stock: low_stock.into_iter().cloned().collect(),
            items: filtered.into_iter().cloned().collect(),
            category_totals: summarize_by_category(records),
        }
    }

    /// Selector options as shown to the user: `ALL` first, then categories.
    pub fn selector_options(&self) -> Vec<CategorySelector> {
        std::iter::once(CategorySelector::All)
            .chain(
                self.categories
                    .iter()
                    .map(|category| CategorySelector::for_category(category.as_deref())),
            )
            .collect()
    }
}
