//! Dashboard aggregations over an in-memory list of inventory records.
//!
//! Every function here is pure: it borrows its input, never mutates it, and
//! returns a freshly built output. Results depend only on the input order, so
//! repeated calls with the same records are bit-identical.

use std::collections::{BTreeSet, HashMap};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};

use crate::record::InventoryRecord;

/// Stock level at or below which a record counts as low-stock.
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 5;

/// Category selector: every record, one exact category, or the records
/// stored without a category.
///
/// Serialized as `"ALL"`, the category text, or `null` respectively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "Option<String>")]
pub enum CategorySelector {
    #[default]
    All,
    Category(String),
    Uncategorized,
}

impl CategorySelector {
    /// Sentinel text that selects every record.
    pub const ALL: &'static str = "ALL";

    pub fn category(name: impl Into<String>) -> Self {
        Self::Category(name.into())
    }

    /// Selector for one grouping key as returned by [`extract_categories`].
    pub fn for_category(category: Option<&str>) -> Self {
        match category {
            Some(name) => Self::Category(name.to_string()),
            None => Self::Uncategorized,
        }
    }

    pub fn matches(&self, record: &InventoryRecord) -> bool {
        match self {
            Self::All => true,
            Self::Category(name) => record.category.as_deref() == Some(name.as_str()),
            Self::Uncategorized => record.category.is_none(),
        }
    }
}

impl fmt::Display for CategorySelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(Self::ALL),
            Self::Category(name) => f.write_str(name),
            Self::Uncategorized => f.write_str("(uncategorized)"),
        }
    }
}

/// Text never parses to `Uncategorized`; only `ALL` is special.
impl FromStr for CategorySelector {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(Some(s.to_string())))
    }
}

impl From<Option<String>> for CategorySelector {
    fn from(value: Option<String>) -> Self {
        match value {
            None => Self::Uncategorized,
            Some(text) if text == Self::ALL => Self::All,
            Some(text) => Self::Category(text),
        }
    }
}

impl From<CategorySelector> for Option<String> {
    fn from(value: CategorySelector) -> Self {
        match value {
            CategorySelector::All => Some(CategorySelector::ALL.to_string()),
            CategorySelector::Category(name) => Some(name),
            CategorySelector::Uncategorized => None,
        }
    }
}

/// Summed stock per category, in first-seen order.
///
/// Serialized as a list of `{ "category", "quantity" }` entries so the
/// missing-category group (`null`) keeps its place next to named ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTotals {
    entries: Vec<(Option<String>, u64)>,
    index: HashMap<Option<String>, usize>,
}

#[derive(Serialize)]
struct CategoryTotal<'a> {
    category: Option<&'a str>,
    quantity: u64,
}

impl CategoryTotals {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, category: Option<&str>, quantity: u64) {
        let key = category.map(str::to_owned);
        match self.index.get(&key) {
            Some(&pos) => self.entries[pos].1 += quantity,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, quantity));
            }
        }
    }

    pub fn get(&self, category: Option<&str>) -> Option<u64> {
        self.index
            .get(&category.map(str::to_owned))
            .map(|&pos| self.entries[pos].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Option<&str>, u64)> + '_ {
        self.entries
            .iter()
            .map(|(category, total)| (category.as_deref(), *total))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CategoryTotals {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.iter()
                .map(|(category, quantity)| CategoryTotal { category, quantity }),
        )
    }
}

/// Distinct grouping keys, sorted ascending; the missing category sorts first.
pub fn extract_categories<'a, I>(records: I) -> Vec<Option<String>>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    records
        .into_iter()
        .map(|r| r.category.as_deref())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|category| category.map(str::to_owned))
        .collect()
}

/// Records matching `selector`, in input order.
pub fn filter_by_category<'a, I>(records: I, selector: &CategorySelector) -> Vec<&'a InventoryRecord>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    records.into_iter().filter(|r| selector.matches(r)).collect()
}

/// Records with `stock_quantity <= threshold`, in input order.
pub fn select_low_stock<'a, I>(records: I, threshold: u32) -> Vec<&'a InventoryRecord>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    records
        .into_iter()
        .filter(|r| r.stock_quantity <= threshold)
        .collect()
}

/// Sum of `stock_quantity * unit_price`, saturating at `Decimal::MAX`.
pub fn compute_total_value<'a, I>(records: I) -> Decimal
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    records
        .into_iter()
        .fold(Decimal::ZERO, |total, r| total.saturating_add(r.line_value()))
}

/// Summed `stock_quantity` per category over the given records.
pub fn summarize_by_category<'a, I>(records: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut totals = CategoryTotals::new();
    for record in records {
        totals.add(record.category.as_deref(), u64::from(record.stock_quantity));
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn named(category: &str) -> Option<String> {
        Some(category.to_string())
    }

    fn uncategorized(product: &str, stock: u32) -> InventoryRecord {
        InventoryRecord {
            category: None,
            ..InventoryRecord::new(product, "", stock, 1, date(1))
        }
    }

    fn sample() -> Vec<InventoryRecord> {
        vec![
            InventoryRecord::new("Widget", "Electronics", 3, 100, date(1)),
            InventoryRecord::new("Gadget", "Electronics", 10, 200, date(2)),
            InventoryRecord::new("Bolt", "Hardware", 2, 5, date(3)),
        ]
    }

    #[test]
    fn example_inventory_produces_expected_views() {
        let records = sample();

        assert_eq!(extract_categories(&records), vec![named("Electronics"), named("Hardware")]);

        let electronics = filter_by_category(&records, &CategorySelector::category("Electronics"));
        assert_eq!(electronics, vec![&records[0], &records[1]]);

        let low = select_low_stock(electronics.iter().copied(), DEFAULT_LOW_STOCK_THRESHOLD);
        assert_eq!(low, vec![&records[0]]);

        assert_eq!(compute_total_value(&records), Decimal::from(2310));

        let totals = summarize_by_category(&records);
        assert_eq!(
            totals.iter().collect::<Vec<_>>(),
            vec![(Some("Electronics"), 13), (Some("Hardware"), 2)]
        );
    }

    #[test]
    fn empty_input_yields_empty_outputs() {
        let records: Vec<InventoryRecord> = Vec::new();

        assert!(extract_categories(&records).is_empty());
        assert!(filter_by_category(&records, &CategorySelector::All).is_empty());
        assert!(select_low_stock(&records, DEFAULT_LOW_STOCK_THRESHOLD).is_empty());
        assert_eq!(compute_total_value(&records), Decimal::ZERO);
        assert!(summarize_by_category(&records).is_empty());
    }

    #[test]
    fn unknown_category_filters_to_nothing() {
        let records = sample();
        assert!(filter_by_category(&records, &CategorySelector::category("Garden")).is_empty());
        assert!(filter_by_category(&records, &CategorySelector::Uncategorized).is_empty());
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let records = sample();
        assert!(filter_by_category(&records, &CategorySelector::category("electronics")).is_empty());
        assert_eq!(extract_categories(&records).len(), 2);
    }

    #[test]
    fn threshold_is_inclusive() {
        let records = vec![
            InventoryRecord::new("A", "X", 5, 1, date(1)),
            InventoryRecord::new("B", "X", 6, 1, date(1)),
            InventoryRecord::new("C", "X", 0, 1, date(1)),
        ];

        let low = select_low_stock(&records, 5);
        assert_eq!(low, vec![&records[0], &records[2]]);
        assert_eq!(select_low_stock(&records, 6).len(), 3);
    }

    #[test]
    fn duplicate_rows_count_separately() {
        let row = InventoryRecord::new("Widget", "Electronics", 1, 10, date(1));
        let records = vec![row.clone(), row];

        assert_eq!(filter_by_category(&records, &CategorySelector::All).len(), 2);
        assert_eq!(compute_total_value(&records), Decimal::from(20));
        assert_eq!(summarize_by_category(&records).get(Some("Electronics")), Some(2));
        assert_eq!(extract_categories(&records), vec![named("Electronics")]);
    }

    #[test]
    fn fractional_prices_sum_exactly() {
        let records = vec![
            InventoryRecord::new("Tea", "Pantry", 3, Decimal::new(1999, 2), date(1)),
            InventoryRecord::new("Gum", "Pantry", 7, Decimal::new(10, 2), date(1)),
        ];
        assert_eq!(compute_total_value(&records), Decimal::new(6067, 2));
    }

    #[test]
    fn missing_empty_and_numeric_text_categories_stay_distinct() {
        let records = vec![
            uncategorized("Mystery", 1),
            InventoryRecord::new("Blank", "", 2, 1, date(1)),
            InventoryRecord::new("Answer", "42", 3, 1, date(1)),
            uncategorized("Stray", 4),
        ];

        assert_eq!(extract_categories(&records), vec![None, named(""), named("42")]);
        assert_eq!(
            summarize_by_category(&records).iter().collect::<Vec<_>>(),
            vec![(None, 5), (Some(""), 2), (Some("42"), 3)]
        );

        let missing = filter_by_category(&records, &CategorySelector::Uncategorized);
        assert_eq!(missing, vec![&records[0], &records[3]]);
        let blank = filter_by_category(&records, &CategorySelector::category(""));
        assert_eq!(blank, vec![&records[1]]);
    }

    #[test]
    fn totals_keep_first_seen_order() {
        let records = vec![
            InventoryRecord::new("a", "Zeta", 1, 1, date(1)),
            InventoryRecord::new("b", "Alpha", 2, 1, date(1)),
            uncategorized("c", 5),
            InventoryRecord::new("d", "Zeta", 3, 1, date(1)),
        ];

        let totals = summarize_by_category(&records);
        assert_eq!(
            totals.iter().map(|(category, _)| category).collect::<Vec<_>>(),
            vec![Some("Zeta"), Some("Alpha"), None]
        );
        assert_eq!(totals.get(Some("Zeta")), Some(4));
        assert_eq!(totals.get(None), Some(5));
        assert_eq!(
            serde_json::to_string(&totals).unwrap(),
            r#"[{"category":"Zeta","quantity":4},{"category":"Alpha","quantity":2},{"category":null,"quantity":5}]"#
        );
    }

    #[test]
    fn selector_parses_sentinel() {
        assert_eq!("ALL".parse::<CategorySelector>().unwrap(), CategorySelector::All);
        assert_eq!(
            "Hardware".parse::<CategorySelector>().unwrap(),
            CategorySelector::category("Hardware")
        );
        assert_eq!(CategorySelector::All.to_string(), "ALL");
        assert_eq!(serde_json::to_string(&CategorySelector::All).unwrap(), r#""ALL""#);
        assert_eq!(serde_json::to_string(&CategorySelector::Uncategorized).unwrap(), "null");
        assert_eq!(
            serde_json::from_str::<CategorySelector>("null").unwrap(),
            CategorySelector::Uncategorized
        );
        assert_eq!(CategorySelector::for_category(None), CategorySelector::Uncategorized);
    }

    fn arb_record() -> impl Strategy<Value = InventoryRecord> {
        (
            "[a-z]{1,8}",
            prop::option::of("[A-Cc]{0,2}"),
            0u32..20,
            (0i64..1_000_000, 0u32..=2),
            1u32..28,
        )
            .prop_map(|(name, category, stock, (mantissa, scale), day)| InventoryRecord {
                product_name: name,
                category,
                stock_quantity: stock,
                unit_price: Decimal::new(mantissa, scale),
                received_date: date(day),
            })
    }

    fn arb_records() -> impl Strategy<Value = Vec<InventoryRecord>> {
        prop::collection::vec(arb_record(), 0..40)
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: categories are strictly ascending (sorted, no duplicates).
        #[test]
        fn categories_sorted_and_unique(records in arb_records()) {
            let categories = extract_categories(&records);
            prop_assert!(categories.windows(2).all(|w| w[0] < w[1]));
            for record in &records {
                prop_assert!(categories.contains(&record.category));
            }
        }

        /// Property: the ALL selector returns the input unchanged.
        #[test]
        fn all_selector_is_identity(records in arb_records()) {
            let filtered = filter_by_category(&records, &CategorySelector::All);
            prop_assert_eq!(filtered, records.iter().collect::<Vec<_>>());
        }

        /// Property: per-category filters partition the input.
        #[test]
        fn category_filters_partition_records(records in arb_records()) {
            let mut covered = 0;
            for category in extract_categories(&records) {
                let selector = CategorySelector::for_category(category.as_deref());
                let filtered = filter_by_category(&records, &selector);
                prop_assert!(filtered.iter().all(|r| r.category == category));
                covered += filtered.len();
            }
            prop_assert_eq!(covered, records.len());
        }

        /// Property: raising the threshold never shrinks the low-stock set.
        #[test]
        fn low_stock_is_monotonic(records in arb_records(), lower in 0u32..20, bump in 0u32..20) {
            let higher = lower + bump;
            let small = select_low_stock(&records, lower);
            let large = select_low_stock(&records, higher);

            prop_assert!(small.iter().all(|r| r.stock_quantity <= lower));
            prop_assert!(small.len() <= large.len());
            let mut rest = large.iter();
            for record in &small {
                prop_assert!(rest.any(|candidate| std::ptr::eq(*candidate, *record)));
            }
        }

        /// Property: total value is additive over concatenation.
        #[test]
        fn total_value_is_additive(a in arb_records(), b in arb_records()) {
            let joined: Vec<_> = a.iter().chain(b.iter()).cloned().collect();
            prop_assert_eq!(
                compute_total_value(&joined),
                compute_total_value(&a) + compute_total_value(&b)
            );
        }

        /// Property: category totals match a manual filter-and-sum.
        #[test]
        fn totals_match_filtered_sums(records in arb_records()) {
            let totals = summarize_by_category(&records);
            prop_assert_eq!(totals.len(), extract_categories(&records).len());
            for (category, total) in totals.iter() {
                let expected: u64 = filter_by_category(&records, &CategorySelector::for_category(category))
                    .iter()
                    .map(|r| u64::from(r.stock_quantity))
                    .sum();
                prop_assert_eq!(total, expected);
            }
        }

        /// Property: every operation is deterministic.
        #[test]
        fn operations_are_deterministic(records in arb_records()) {
            prop_assert_eq!(extract_categories(&records), extract_categories(&records));
            prop_assert_eq!(summarize_by_category(&records), summarize_by_category(&records));
            prop_assert_eq!(compute_total_value(&records), compute_total_value(&records));
            prop_assert_eq!(select_low_stock(&records, 5), select_low_stock(&records, 5));
        }
    }
}
