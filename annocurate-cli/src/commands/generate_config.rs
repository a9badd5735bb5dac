//! Generate config command implementation

use annocurate_core::PriorityTable;
use anyhow::{Context, Result};
use clap::Args;
use std::fmt::Write as _;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Name for the new priority table
    #[arg(short, long, value_name = "NAME", default_value = "custom")]
    pub name: String,

    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        println!("Generating priority table template...");
        println!("  Name: {}", self.name);
        println!("  Output file: {}", self.output.display());

        let template = self.generate_template();

        fs::write(&self.output, template)
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Priority table template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the rules to match your annotation types");
        println!("2. Validate your table:");
        println!("   annocurate validate --priority {}", self.output.display());
        println!("3. Use it for curation:");
        println!(
            "   annocurate curate -i '*.ann' --priority {}",
            self.output.display()
        );

        Ok(())
    }

    /// Generate template content, seeded with the built-in rules
    fn generate_template(&self) -> String {
        let mut template = format!(
            r#"# Type priority table "{}"
#
# When two annotations cover exactly the same spans, the first rule naming
# both types (in either direction) decides which one is removed. Pairs that
# no rule names are reported and both annotations are kept.

[metadata]
name = "{}"
description = "Custom type priority"
"#,
            self.name, self.name
        );

        for rule in &PriorityTable::builtin().rules {
            let _ = write!(
                template,
                "\n[[rules]]\nkeep = \"{}\"\nremove = \"{}\"\n",
                rule.keep, rule.remove
            );
        }
        template
    }
}
