//! Index configuration.

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, IndexResult};

/// Result sets at or above this many rows are returned unsorted.
pub const DEFAULT_SORT_THRESHOLD: u64 = 100_000;

/// Tunables shared by every query on one index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Capacity of the result count cache.
    pub query_cache_size: usize,
    /// Sort only when the result count is strictly below this.
    pub sort_threshold: u64,
    /// Rows fetched per page by result streams.
    pub page_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            query_cache_size: 1000,
            sort_threshold: DEFAULT_SORT_THRESHOLD,
            page_size: 500,
        }
    }
}

impl IndexConfig {
    pub fn validate(&self) -> IndexResult<()> {
        if self.query_cache_size == 0 {
            return Err(IndexError::config("query_cache_size must be greater than zero"));
        }
        if self.page_size == 0 {
            return Err(IndexError::config("page_size must be greater than zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: IndexConfig = serde_json::from_str(r#"{ "page_size": 20 }"#).unwrap();
        assert_eq!(config.page_size, 20);
        assert_eq!(config.sort_threshold, DEFAULT_SORT_THRESHOLD);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = IndexConfig {
            page_size: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(IndexError::Config(_))));
    }
}
