//! Storage adapters for inventory sheets.
//!
//! The aggregator only ever sees `Vec<InventoryRecord>`; where those rows live
//! (a sheet file, a test fixture) is decided here.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde_json::Value as JsonValue;
use thiserror::Error;

use stockboard_core::DomainError;
use stockboard_inventory::{HEADER, InventoryRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("inventory sheet not found: {0}")]
    NotFound(PathBuf),

    #[error("inventory sheet io error: {0}")]
    Io(#[from] io::Error),

    #[error("inventory sheet is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inventory sheet has no header row")]
    MissingHeader,

    #[error("malformed row {row}: {source}")]
    MalformedRow {
        /// 1-based sheet row (the header is row 1).
        row: usize,
        #[source]
        source: DomainError,
    },

    #[error("record store lock poisoned")]
    Poisoned,
}

/// Backing store for inventory rows.
pub trait RecordStore: Send + Sync {
    /// Load every data row (header excluded), in stored order.
    fn load_all(&self) -> Result<Vec<InventoryRecord>, StoreError>;
    /// Append one row after the existing ones.
    fn append(&self, record: InventoryRecord) -> Result<(), StoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn load_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        (**self).load_all()
    }

    fn append(&self, record: InventoryRecord) -> Result<(), StoreError> {
        (**self).append(record)
    }
}

/// In-memory record store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<Vec<InventoryRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<InventoryRecord>) -> Self {
        Self {
            inner: RwLock::new(records),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn load_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        let rows = self.inner.read().map_err(|_| StoreError::Poisoned)?;
        Ok(rows.clone())
    }

    fn append(&self, record: InventoryRecord) -> Result<(), StoreError> {
        let mut rows = self.inner.write().map_err(|_| StoreError::Poisoned)?;
        rows.push(record);
        Ok(())
    }
}

/// Sheet stored as a JSON array of positional rows, header first.
///
/// ```json
/// [
///   ["product", "category", "stock", "price", "date"],
///   ["Widget", "Electronics", 3, 100, "2024-01-01"]
/// ]
/// ```
///
/// Every call re-reads the file; `append` rewrites it whole.
#[derive(Debug, Clone)]
pub struct JsonSheetStore {
    path: PathBuf,
}

impl JsonSheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create (or truncate to) a header-only sheet.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self::new(path);
        store.write_rows(&[header_row()])?;
        tracing::info!(path = %store.path().display(), "created inventory sheet");
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<Vec<JsonValue>>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(self.path.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        let rows: Vec<Vec<JsonValue>> = serde_json::from_str(&text)?;
        if rows.is_empty() {
            return Err(StoreError::MissingHeader);
        }
        Ok(rows)
    }

    fn write_rows(&self, rows: &[Vec<JsonValue>]) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(rows)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

fn header_row() -> Vec<JsonValue> {
    HEADER.iter().map(|h| JsonValue::from(*h)).collect()
}

impl RecordStore for JsonSheetStore {
    fn load_all(&self) -> Result<Vec<InventoryRecord>, StoreError> {
        let rows = self.read_rows()?;

        // Row 0 is the header; data rows are numbered from 2 like a spreadsheet.
        let records = rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, row)| {
                InventoryRecord::from_row(row)
                    .map_err(|source| StoreError::MalformedRow { row: i + 1, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(path = %self.path.display(), rows = records.len(), "loaded inventory sheet");
        Ok(records)
    }

    fn append(&self, record: InventoryRecord) -> Result<(), StoreError> {
        let mut rows = self.read_rows()?;
        rows.push(record.to_row());
        self.write_rows(&rows)?;

        tracing::debug!(path = %self.path.display(), rows = rows.len() - 1, "appended inventory row");
        Ok(())
    }
}
