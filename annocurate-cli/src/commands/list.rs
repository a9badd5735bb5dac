//! List command implementation

use crate::priority_source::PrioritySource;
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

/// Arguments for `list rules`
#[derive(Debug, Args)]
pub struct RulesArgs {
    /// Priority table (default: built-in CRAFT table)
    #[arg(short, long, value_name = "FILE")]
    pub priority: Option<PathBuf>,
}

impl RulesArgs {
    /// Print the active rules in precedence order
    pub fn execute(&self) -> Result<()> {
        let source = PrioritySource::select(self.priority.as_deref(), None);
        let table = source.load()?;

        println!("{}", source.display_name());
        if let Some(description) = &table.metadata.description {
            println!("  {description}");
        }
        for (i, rule) in table.rules.iter().enumerate() {
            println!("  {:>2}. {} > {}", i + 1, rule.keep, rule.remove);
        }
        Ok(())
    }
}

/// Print the available report formats
pub fn list_formats() {
    println!("Available report formats:");
    println!("  text - One diagnostic line per event (default)");
    println!("  json - Per-document summaries and diagnostics");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_builtin_rules() {
        let args = RulesArgs { priority: None };
        assert!(args.execute().is_ok());
    }

    #[test]
    fn test_list_missing_table() {
        let args = RulesArgs {
            priority: Some(PathBuf::from("/nonexistent/table.toml")),
        };
        assert!(args.execute().is_err());
    }
}
