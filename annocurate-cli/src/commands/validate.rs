//! Validate command implementation

use annocurate_core::PriorityTable;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Path to the priority table to validate
    #[arg(short, long, value_name = "FILE", required = true)]
    pub priority: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        println!("Validating priority table: {}", self.priority.display());

        match PriorityTable::from_file(&self.priority) {
            Ok(table) => {
                println!("✓ Priority table is valid!");
                println!("  Name: {}", table.metadata.name);
                if let Some(description) = &table.metadata.description {
                    println!("  Description: {description}");
                }
                println!("  Rules: {}", table.len());
                Ok(())
            }
            Err(e) => {
                println!("✗ Priority table is invalid!");
                println!("  Error: {e}");
                Err(anyhow::anyhow!("Validation failed: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_validate_valid_table() {
        let toml_content = r#"
[metadata]
name = "local"

[[rules]]
keep = "CL"
remove = "GO"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let args = ValidateArgs {
            priority: temp_file.path().to_path_buf(),
        };

        assert!(args.execute().is_ok());
    }

    #[test]
    fn test_validate_self_rule() {
        let toml_content = r#"
[metadata]
name = "broken"

[[rules]]
keep = "CL"
remove = "CL"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let args = ValidateArgs {
            priority: temp_file.path().to_path_buf(),
        };

        let err = args.execute().unwrap_err();
        assert!(err.to_string().contains("keeps and removes the same type"));
    }
}
