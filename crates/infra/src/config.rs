//! Configuration loading and representation.

use std::path::PathBuf;

use stockboard_inventory::DEFAULT_LOW_STOCK_THRESHOLD;

pub const DATA_ENV: &str = "STOCKBOARD_DATA";
pub const THRESHOLD_ENV: &str = "STOCKBOARD_LOW_STOCK_THRESHOLD";

const DEFAULT_DATA_PATH: &str = "inventory.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Inventory sheet location.
    pub data_path: PathBuf,
    /// Inclusive low-stock threshold.
    pub low_stock_threshold: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl DashboardConfig {
    /// Read `STOCKBOARD_DATA` and `STOCKBOARD_LOW_STOCK_THRESHOLD`, falling
    /// back to defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let data_path = lookup(DATA_ENV)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);

        let low_stock_threshold = match lookup(THRESHOLD_ENV) {
            None => defaults.low_stock_threshold,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    value = %raw,
                    default = defaults.low_stock_threshold,
                    "{THRESHOLD_ENV} is not a non-negative integer; using default"
                );
                defaults.low_stock_threshold
            }),
        };

        Self {
            data_path,
            low_stock_threshold,
        }
    }

    pub fn with_data_path(mut self, data_path: impl Into<PathBuf>) -> Self {
        self.data_path = data_path.into();
        self
    }

    pub fn with_low_stock_threshold(mut self, threshold: u32) -> Self {
        self.low_stock_threshold = threshold;
        self
    }

    /// Apply command-line values on top of the environment; `None` keeps the
    /// current setting.
    pub fn with_overrides(self, data_path: Option<PathBuf>, threshold: Option<u32>) -> Self {
        let config = match data_path {
            Some(path) => self.with_data_path(path),
            None => self,
        };
        match threshold {
            Some(threshold) => config.with_low_stock_threshold(threshold),
            None => config,
        }
    }
}
