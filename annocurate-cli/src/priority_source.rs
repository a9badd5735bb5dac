//! Priority table source management for CLI

use annocurate_core::PriorityTable;
use anyhow::{Context, Result};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Source of priority rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrioritySource {
    /// Embedded CRAFT table
    BuiltIn,
    /// External TOML file
    External(PathBuf),
}

impl PrioritySource {
    /// Command-line path first, then the configuration file, then built-in
    pub fn select(flag: Option<&Path>, config: Option<&Path>) -> Self {
        match flag.or(config) {
            Some(path) => Self::External(path.to_path_buf()),
            None => Self::BuiltIn,
        }
    }

    /// Load the table
    pub fn load(&self) -> Result<Cow<'static, PriorityTable>> {
        match self {
            Self::BuiltIn => Ok(Cow::Borrowed(PriorityTable::builtin())),
            Self::External(path) => PriorityTable::from_file(path)
                .map(Cow::Owned)
                .with_context(|| format!("Failed to load priority table {}", path.display())),
        }
    }

    /// Get the display name for the priority source
    pub fn display_name(&self) -> String {
        match self {
            Self::BuiltIn => format!("Built-in: {}", PriorityTable::builtin().metadata.name),
            Self::External(path) => format!("External: {}", path.display()),
        }
    }
}
