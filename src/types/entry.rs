//! Entry types and the normalized, searchable entry struct.

use serde::{Deserialize, Serialize};

/// The kind of rules content an entry was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// A castable spell.
    Spell,
    /// A character feat.
    Feat,
    /// Equipment, gear, or a magic item.
    Item,
    /// A rules section or glossary entry.
    Rule,
}

impl EntryType {
    /// All entry types, in dataset order.
    pub const ALL: [EntryType; 4] = [Self::Spell, Self::Feat, Self::Item, Self::Rule];

    /// Return the machine name used in ids and filters.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spell => "spell",
            Self::Feat => "feat",
            Self::Item => "item",
            Self::Rule => "rule",
        }
    }

    /// Return the human-readable label shown in subtitles and tags.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Spell => "Spell",
            Self::Feat => "Feat",
            Self::Item => "Item",
            Self::Rule => "Rule",
        }
    }

    /// Parse an entry type from its name. Accepts singular or plural, any case.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "spell" | "spells" => Some(Self::Spell),
            "feat" | "feats" => Some(Self::Feat),
            "item" | "items" => Some(Self::Item),
            "rule" | "rules" => Some(Self::Rule),
            _ => None,
        }
    }
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A single label/value pair shown in an entry's detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

impl Stat {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One normalized, searchable record. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchEntry {
    /// `"<type>:<slug>"`, unique within an index.
    pub id: String,
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    /// `·`-joined type label, facets, and source badge.
    pub subtitle: String,
    /// Trimmed description or placeholder, ellipsized past 160 characters.
    pub summary: String,
    /// Normalized free-text description.
    pub description: String,
    /// Ordered detail stats; absent attributes are skipped.
    pub stats: Vec<Stat>,
    /// Case-insensitively unique, in insertion order.
    pub tags: Vec<String>,
    /// `"<source name> · <edition>"`, or empty.
    pub source_label: String,
    /// `"Source: <name> • <edition> • <license>"`, or empty.
    pub source_detail: String,
}

impl SearchEntry {
    /// Build the canonical id for an entry of `entry_type` with `slug`.
    pub fn make_id(entry_type: EntryType, slug: &str) -> String {
        format!("{}:{}", entry_type.name(), slug)
    }

    /// Look up a stat value by label.
    pub fn stat(&self, label: &str) -> Option<&str> {
        self.stats
            .iter()
            .find(|s| s.label == label)
            .map(|s| s.value.as_str())
    }
}
