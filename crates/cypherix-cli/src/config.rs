//! CLI configuration file and environment overrides.

use std::path::Path;

use anyhow::{Context, Result};
use cypherix_bolt::BoltConfig;
use cypherix_core::IndexConfig;
use serde::Deserialize;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "cypherix.toml";

/// Contents of `cypherix.toml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub bolt: BoltConfig,
    pub index: IndexConfig,
}

impl AppConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Invalid configuration file")
    }

    /// Load `path`, or the default file when present, then apply
    /// `CYPHERIX_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read config file {}", path.display()))?;
                Self::from_toml(&text)?
            }
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                let text = std::fs::read_to_string(DEFAULT_CONFIG_FILE)?;
                Self::from_toml(&text)?
            }
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.index.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(uri) = var("CYPHERIX_URI") {
            self.bolt.uri = uri;
        }
        if let Some(user) = var("CYPHERIX_USER") {
            self.bolt.user = user;
        }
        if let Some(password) = var("CYPHERIX_PASSWORD") {
            self.bolt.password = password;
        }
        if let Some(database) = var("CYPHERIX_DATABASE") {
            self.bolt.database = database;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml() {
        let config = AppConfig::from_toml(
            r#"
            [bolt]
            uri = "bolt://graph:7687"

            [index]
            page_size = 100
            sort_threshold = 5000
            "#,
        )
        .unwrap();

        assert_eq!(config.bolt.uri, "bolt://graph:7687");
        assert_eq!(config.bolt.user, "neo4j");
        assert_eq!(config.index.page_size, 100);
        assert_eq!(config.index.sort_threshold, 5000);
        assert_eq!(config.index.query_cache_size, 1000);
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides(|key| match key {
            "CYPHERIX_URI" => Some("bolt://other:7687".to_string()),
            "CYPHERIX_PASSWORD" => Some("s3cret".to_string()),
            _ => None,
        });

        assert_eq!(config.bolt.uri, "bolt://other:7687");
        assert_eq!(config.bolt.password, "s3cret");
        assert_eq!(config.bolt.database, "neo4j");
    }
}
