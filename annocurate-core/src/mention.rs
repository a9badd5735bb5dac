//! Mentions handed over by the Knowtator importer
//!
//! Every mention has an identifier and one of five payload kinds. A mention's
//! type label is what the exported textbound is typed with.

use crate::error::{CurateError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

static ONTOLOGY_ID: OnceLock<Regex> = OnceLock::new();

fn ontology_id() -> &'static Regex {
    ONTOLOGY_ID.get_or_init(|| {
        Regex::new(r"^([a-zA-Z]+):(\d+)$").expect("valid ontology id pattern")
    })
}

/// Mention payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MentionKind {
    /// Ontology class mention
    ClassMention {
        /// Class identifier, e.g. `CL:0000000`
        class_id: String,
        /// Class label
        #[serde(default)]
        text: Option<String>,
    },
    /// String-valued slot
    StringSlotMention {
        /// Slot name
        slot: String,
        /// Slot value
        value: String,
    },
    /// Integer-valued slot
    IntegerSlotMention {
        /// Slot name
        slot: String,
        /// Slot value
        value: i64,
    },
    /// Boolean-valued slot
    BooleanSlotMention {
        /// Slot name
        slot: String,
        /// Slot value
        value: bool,
    },
    /// Slot pointing at other mentions
    ComplexSlotMention {
        /// Slot name
        slot: String,
        /// Referenced mention identifiers
        #[serde(default)]
        values: Vec<String>,
    },
}

/// A mention with its identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mention {
    /// Mention identifier
    pub id: String,
    /// Payload
    #[serde(flatten)]
    pub kind: MentionKind,
}

impl Mention {
    /// Create a mention
    pub fn new(id: impl Into<String>, kind: MentionKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }

    /// Type label
    ///
    /// For class mentions this is the ontology prefix of a `PREFIX:NUMBER`
    /// identifier, or the whole identifier otherwise. For slots it is the slot
    /// name.
    pub fn type_label(&self) -> &str {
        match &self.kind {
            MentionKind::ClassMention { class_id, .. } => ontology_id()
                .captures(class_id)
                .and_then(|c| c.get(1))
                .map_or(class_id.as_str(), |m| m.as_str()),
            MentionKind::StringSlotMention { slot, .. }
            | MentionKind::IntegerSlotMention { slot, .. }
            | MentionKind::BooleanSlotMention { slot, .. }
            | MentionKind::ComplexSlotMention { slot, .. } => slot.as_str(),
        }
    }
}

/// Mentions by identifier
#[derive(Debug, Default)]
pub struct MentionIndex<'m> {
    by_id: HashMap<&'m str, &'m Mention>,
}

impl<'m> MentionIndex<'m> {
    /// Index mentions; identifiers must be unique
    pub fn build(mentions: &'m [Mention]) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(mentions.len());
        for mention in mentions {
            if by_id.insert(mention.id.as_str(), mention).is_some() {
                return Err(CurateError::DuplicateIdentifier {
                    id: mention.id.clone(),
                });
            }
        }
        Ok(Self { by_id })
    }

    /// Look up a mention
    pub fn get(&self, id: &str) -> Option<&'m Mention> {
        self.by_id.get(id).copied()
    }

    /// Number of mentions
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
