//! File reading utilities

use crate::error::CliError;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension of document text files next to annotation files
pub const TEXT_EXTENSION: &str = "txt";

/// File reader with UTF-8 validation
pub struct FileReader;

impl FileReader {
    /// Read a file as UTF-8 text
    pub fn read_text(path: &Path) -> Result<String> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(content)
    }

    /// Path of the document text for an annotation file: `DIR/<stem>.txt`
    pub fn text_path(text_dir: &Path, annotation: &Path) -> Option<PathBuf> {
        let stem = annotation.file_stem()?;
        Some(text_dir.join(format!("{}.{TEXT_EXTENSION}", stem.to_string_lossy())))
    }

    /// Read the document text for an annotation file
    pub fn read_companion_text(text_dir: &Path, annotation: &Path) -> Result<String> {
        let path = Self::text_path(text_dir, annotation)
            .ok_or_else(|| CliError::FileNotFound(annotation.display().to_string()))?;
        if !path.is_file() {
            return Err(CliError::FileNotFound(path.display().to_string()).into());
        }
        Self::read_text(&path)
    }
}
