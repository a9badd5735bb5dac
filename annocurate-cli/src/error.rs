//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// No input file matched the given patterns
    NoInput(String),
    /// Configuration error
    ConfigError(String),
    /// Every matched document failed
    NothingProcessed {
        /// Number of documents that failed
        failed: usize,
    },
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::NoInput(patterns) => {
                write!(f, "No files found matching the provided patterns: {patterns}")
            }
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::NothingProcessed { failed } => {
                write!(f, "No document could be processed ({failed} failed)")
            }
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_error_display() {
        let error = CliError::FileNotFound("doc.txt".to_string());
        assert_eq!(error.to_string(), "File not found: doc.txt");
    }

    #[test]
    fn test_no_input_error_display() {
        let error = CliError::NoInput("*.ann".to_string());
        assert_eq!(
            error.to_string(),
            "No files found matching the provided patterns: *.ann"
        );
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_nothing_processed_display() {
        let error = CliError::NothingProcessed { failed: 3 };
        assert_eq!(
            error.to_string(),
            "No document could be processed (3 failed)"
        );
    }

    #[test]
    fn test_cli_error_downcasts_from_anyhow() {
        let failure: CliResult<()> = Err(CliError::NothingProcessed { failed: 1 }.into());
        let err = failure.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::NothingProcessed { failed: 1 })
        ));
    }
}
