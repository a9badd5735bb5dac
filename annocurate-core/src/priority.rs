//! Type-priority table for identically-spanned annotations
//!
//! The table is an ordered list of `(keep, remove)` type pairs loaded from
//! TOML. For two annotations with exactly the same spans, the first rule that
//! names both types, in either direction, decides which one is removed.

use crate::error::{CurateError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::OnceLock;

static BUILTIN_TABLE: OnceLock<PriorityTable> = OnceLock::new();

const BUILTIN_TOML: &str = include_str!("../configs/priority/craft.toml");

/// One `(keep, remove)` rule
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriorityRule {
    /// Type that survives
    pub keep: String,
    /// Type that is removed
    pub remove: String,
}

impl PriorityRule {
    /// Create a rule
    pub fn new(keep: impl Into<String>, remove: impl Into<String>) -> Self {
        Self {
            keep: keep.into(),
            remove: remove.into(),
        }
    }
}

/// Table metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Short table name
    pub name: String,
    /// Free-form description
    #[serde(default)]
    pub description: Option<String>,
}

/// Which side of a compared pair loses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Loser {
    /// The first argument is removed
    First,
    /// The second argument is removed
    Second,
}

/// A decision taken by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// The losing side
    pub loser: Loser,
    /// Index of the deciding rule
    pub rule: usize,
}

/// Ordered priority rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityTable {
    /// Table metadata
    #[serde(default)]
    pub metadata: TableMetadata,
    /// Rules in precedence order
    #[serde(default)]
    pub rules: Vec<PriorityRule>,
}

impl PriorityTable {
    /// Build a table from rules
    pub fn new(name: impl Into<String>, rules: Vec<PriorityRule>) -> Self {
        Self {
            metadata: TableMetadata {
                name: name.into(),
                description: None,
            },
            rules,
        }
    }

    /// The embedded CRAFT table
    pub fn builtin() -> &'static PriorityTable {
        BUILTIN_TABLE.get_or_init(|| {
            Self::from_toml_str(BUILTIN_TOML).expect("embedded priority table must be valid")
        })
    }

    /// Parse and validate a TOML table
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: PriorityTable = toml::from_str(content)
            .map_err(|e| CurateError::Config(format!("Failed to parse priority table: {e}")))?;
        table.validate()?;
        Ok(table)
    }

    /// Load and validate a TOML table from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CurateError::Config(format!(
                "Failed to read file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let table: PriorityTable = toml::from_str(&content).map_err(|e| {
            CurateError::Config(format!(
                "Failed to parse TOML from '{}': {}",
                path.display(),
                e
            ))
        })?;
        table.validate()?;
        Ok(table)
    }

    /// Reject empty labels and self-rules; warn about rules that can never fire
    pub fn validate(&self) -> Result<()> {
        let mut seen: HashSet<(&str, &str)> = HashSet::new();
        for (i, rule) in self.rules.iter().enumerate() {
            if rule.keep.is_empty() || rule.remove.is_empty() {
                return Err(CurateError::Config(format!(
                    "rule {} has an empty type label",
                    i + 1
                )));
            }
            if rule.keep == rule.remove {
                return Err(CurateError::Config(format!(
                    "rule {} keeps and removes the same type '{}'",
                    i + 1,
                    rule.keep
                )));
            }
            let pair = (rule.keep.as_str(), rule.remove.as_str());
            let reversed = (rule.remove.as_str(), rule.keep.as_str());
            if seen.contains(&pair) || seen.contains(&reversed) {
                log::warn!(
                    "priority rule {} ({} over {}) is shadowed by an earlier rule",
                    i + 1,
                    rule.keep,
                    rule.remove
                );
            }
            seen.insert(pair);
        }
        Ok(())
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Decide between two types; `None` if no rule names both
    pub fn decide(&self, first: &str, second: &str) -> Option<Decision> {
        self.rules.iter().enumerate().find_map(|(i, rule)| {
            if rule.keep == first && rule.remove == second {
                Some(Decision {
                    loser: Loser::Second,
                    rule: i,
                })
            } else if rule.keep == second && rule.remove == first {
                Some(Decision {
                    loser: Loser::First,
                    rule: i,
                })
            } else {
                None
            }
        })
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CurateError::Config(format!("Failed to serialize priority table: {e}")))
    }
}
