//! TOML configuration file support.
//!
//! Scan bounds and batch sizes can be kept in a config file:
//!
//! ```toml
//! # bdf-inspect.toml
//! [reader]
//! header_scan_lines = 20
//! body_scan_lines = 500
//!
//! [scan]
//! batch_size = 64
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use almabdf::bdf::ReaderConfig;

/// Root configuration structure for bdf-inspect.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Scan bounds of the reader.
    #[serde(default)]
    pub reader: ReaderConfig,

    /// Settings of the scan command.
    #[serde(default)]
    pub scan: ScanConfig,
}

/// Configuration for the scan command.
#[derive(Debug, Default, Deserialize)]
pub struct ScanConfig {
    /// Number of subsets to read per batch.
    pub batch_size: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, the defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
            [reader]
            header_scan_lines = 20
            body_scan_lines = 500

            [scan]
            batch_size = 64
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.reader.header_scan_lines, 20);
        assert_eq!(config.reader.body_scan_lines, 500);
        assert_eq!(config.scan.batch_size, Some(64));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [reader]
            body_scan_lines = 250
        "#;

        let config = Config::from_str(toml).unwrap();
        assert_eq!(config.reader.header_scan_lines, 10);
        assert_eq!(config.reader.body_scan_lines, 250);
        assert_eq!(config.scan.batch_size, None);
    }

    #[test]
    fn test_empty_config() {
        let config = Config::from_str("").unwrap();
        assert_eq!(config.reader, ReaderConfig::default());
        assert_eq!(config.scan.batch_size, None);
    }

    #[test]
    fn test_invalid_config() {
        assert!(Config::from_str("[reader]\nbody_scan_lines = \"many\"").is_err());
    }
}
