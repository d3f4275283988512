use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value as JsonValue};

use stockboard_core::{DomainError, DomainResult};

/// Number of positional columns in a stored inventory row.
pub const COLUMN_COUNT: usize = 5;

/// Header row of an inventory sheet, in column order.
pub const HEADER: [&str; COLUMN_COUNT] = ["product", "category", "stock", "price", "date"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One inventory row.
///
/// Identity is positional: two rows with identical fields are still two
/// entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub product_name: String,
    /// Grouping key; compared exactly (case-sensitive). `None` is a stored row
    /// whose category cell was empty, and groups apart from every name.
    pub category: Option<String>,
    pub stock_quantity: u32,
    /// Non-negative unit price.
    pub unit_price: Decimal,
    pub received_date: NaiveDate,
}

impl InventoryRecord {
    /// Build a categorised record. Callers are expected to pass a
    /// non-negative price; storage and registration input are checked.
    pub fn new(
        product_name: impl Into<String>,
        category: impl Into<String>,
        stock_quantity: u32,
        unit_price: impl Into<Decimal>,
        received_date: NaiveDate,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            category: Some(category.into()),
            stock_quantity,
            unit_price: unit_price.into(),
            received_date,
        }
    }

    /// `stock_quantity * unit_price`, saturating at `Decimal::MAX`.
    pub fn line_value(&self) -> Decimal {
        Decimal::from(self.stock_quantity).saturating_mul(self.unit_price)
    }

    /// Positional row: product, category, stock, price, date.
    pub fn to_row(&self) -> Vec<JsonValue> {
        vec![
            JsonValue::String(self.product_name.clone()),
            self.category.clone().map_or(JsonValue::Null, JsonValue::String),
            JsonValue::from(self.stock_quantity),
            price_cell(self.unit_price),
            JsonValue::String(self.received_date.format(DATE_FORMAT).to_string()),
        ]
    }

    /// Parse a positional row handed over by a storage adapter.
    ///
    /// A null category cell stays `None`; a category cell holding anything
    /// other than text or null is rejected rather than turned into text.
    pub fn from_row(row: &[JsonValue]) -> DomainResult<Self> {
        let [product, category, stock, price, date] = row else {
            return Err(DomainError::validation(format!(
                "expected {COLUMN_COUNT} columns, found {}",
                row.len()
            )));
        };

        let stock_quantity = parse_whole(stock, "stock")?;
        let stock_quantity = u32::try_from(stock_quantity)
            .map_err(|_| DomainError::validation(format!("stock out of range: {stock}")))?;

        Ok(Self {
            product_name: product_cell(product),
            category: category_cell(category)?,
            stock_quantity,
            unit_price: parse_price(price)?,
            received_date: parse_date(date)?,
        })
    }
}

/// Product names are display-only, so numeric names read as their text.
fn product_cell(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn category_cell(value: &JsonValue) -> DomainResult<Option<String>> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s.clone())),
        other => Err(DomainError::validation(format!(
            "category must be text, found {other}"
        ))),
    }
}

/// Non-negative whole number; spreadsheets often store integers as `3.0`.
fn parse_whole(value: &JsonValue, column: &str) -> DomainResult<u64> {
    if let Some(n) = value.as_u64() {
        return Ok(n);
    }
    // `u64::MAX as f64` rounds up to 2^64, so the bound must be exclusive.
    match value.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f < u64::MAX as f64 => Ok(f as u64),
        _ => Err(DomainError::validation(format!(
            "{column} must be a non-negative integer, found {value}"
        ))),
    }
}

/// Sheet numbers are read from their literal text, so `19.99` stays exact.
fn parse_price(value: &JsonValue) -> DomainResult<Decimal> {
    let JsonValue::Number(number) = value else {
        return Err(DomainError::validation(format!("price must be a number, found {value}")));
    };

    let text = number.to_string();
    let price = Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| DomainError::validation(format!("price out of range: {text}")))?;

    if price < Decimal::ZERO {
        return Err(DomainError::validation(format!("price cannot be negative, found {text}")));
    }
    Ok(price.normalize())
}

fn price_cell(price: Decimal) -> JsonValue {
    if price.fract().is_zero() {
        if let Some(whole) = price.to_u64() {
            return JsonValue::from(whole);
        }
    }
    price
        .to_f64()
        .and_then(Number::from_f64)
        .map_or(JsonValue::Null, JsonValue::Number)
}

fn parse_date(value: &JsonValue) -> DomainResult<NaiveDate> {
    let text = value
        .as_str()
        .ok_or_else(|| DomainError::validation(format!("date must be text, found {value}")))?;

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| DomainError::validation(format!("date is not YYYY-MM-DD: {text}")))
}

/// Registration input for a new inventory row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
    pub product_name: String,
    pub category: String,
    pub stock_quantity: u32,
    pub unit_price: Decimal,
    pub received_date: NaiveDate,
}

impl NewRecord {
    /// Product name and category are required; values are kept as entered.
    pub fn validate(self) -> DomainResult<InventoryRecord> {
        if self.product_name.trim().is_empty() {
            return Err(DomainError::validation("product name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(DomainError::validation("price cannot be negative"));
        }

        Ok(InventoryRecord {
            product_name: self.product_name,
            category: Some(self.category),
            stock_quantity: self.stock_quantity,
            unit_price: self.unit_price,
            received_date: self.received_date,
        })
    }
}
