//! Configuration module

use crate::error::CliError;
use crate::output::ReportFormat;
use annocurate_core::CurationOptions;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// CLI configuration structure
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct CliConfig {
    /// Curation configuration
    #[serde(default)]
    pub curation: CurationConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// Curation-related configuration
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Remove exact duplicates
    pub dedup: bool,

    /// Resolve identical spans and overlaps
    pub resolve: bool,

    /// Priority table file (default: built-in CRAFT table)
    pub priority_table: Option<PathBuf>,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            dedup: true,
            resolve: true,
            priority_table: None,
        }
    }
}

impl CurationConfig {
    /// Stages enabled by this configuration
    pub fn options(&self) -> CurationOptions {
        CurationOptions {
            dedup: self.dedup,
            resolve: self.resolve,
        }
    }
}

/// Output-related configuration
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format
    pub report_format: ReportFormat,
}

impl CliConfig {
    /// Load a configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CliError::ConfigError(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        let config = toml::from_str(&content).map_err(|e| {
            CliError::ConfigError(format!(
                "Failed to parse TOML from '{}': {}",
                path.display(),
                e
            ))
        })?;
        Ok(config)
    }

    /// Load `path` if given, defaults otherwise
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = CliConfig::default();
        assert_eq!(config.curation.options(), CurationOptions::default());
        assert!(config.curation.priority_table.is_none());
        assert_eq!(config.output.report_format, ReportFormat::Text);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[curation]
resolve = false
priority_table = "tables/local.toml"

[output]
report_format = "json"
"#
        )
        .unwrap();

        let config = CliConfig::from_file(file.path()).unwrap();
        assert!(config.curation.dedup);
        assert!(!config.curation.resolve);
        assert_eq!(
            config.curation.priority_table,
            Some(PathBuf::from("tables/local.toml"))
        );
        assert_eq!(config.output.report_format, ReportFormat::Json);
    }

    #[test]
    fn test_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[curation]\ndedup = \"yes\"\n").unwrap();
        let err = CliConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }
}
