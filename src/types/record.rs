//! Raw source records and the per-kind dataset they arrive in.
//!
//! Records are parsed leniently from JSON: a field with the wrong type is
//! treated as absent rather than failing the whole dataset.

use std::path::Path;

use serde_json::{Map, Number, Value};

use super::entry::EntryType;
use super::error::CompendiumResult;

/// Provenance of a record: which content pack it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provenance {
    pub name: Option<String>,
    pub edition: Option<String>,
    pub license: Option<String>,
}

impl Provenance {
    fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            name: text_field(obj, "name"),
            edition: text_field(obj, "edition"),
            license: text_field(obj, "license"),
        })
    }
}

/// Fields every record kind shares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordCommon {
    /// `slug`, falling back to `id`.
    pub slug: Option<String>,
    pub name: Option<String>,
    /// `description`, falling back to `text`, then `summary`.
    pub description: Option<String>,
    pub source: Option<Provenance>,
}

impl RecordCommon {
    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            slug: text_field(obj, "slug").or_else(|| text_field(obj, "id")),
            name: text_field(obj, "name"),
            description: raw_text_field(obj, "description")
                .or_else(|| raw_text_field(obj, "text"))
                .or_else(|| raw_text_field(obj, "summary")),
            source: obj.get("source").and_then(Provenance::from_value),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellRecord {
    pub common: RecordCommon,
    /// Spell level; only numeric values are accepted.
    pub level: Option<String>,
    pub school: Option<String>,
    pub casting_time: Option<String>,
    pub range: Option<String>,
    pub components: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatRecord {
    pub common: RecordCommon,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemRecord {
    pub common: RecordCommon,
    pub category: Option<String>,
    pub cost: Option<String>,
    /// Numeric or free-text weight, rendered as given.
    pub weight: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleRecord {
    pub common: RecordCommon,
    pub category: Option<String>,
}

/// A raw record of one of the four supported kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceRecord {
    Spell(SpellRecord),
    Feat(FeatRecord),
    Item(ItemRecord),
    Rule(RuleRecord),
}

impl SourceRecord {
    /// Parse a record of the given kind. Returns `None` for non-object values.
    pub fn from_value(kind: EntryType, value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let common = RecordCommon::from_object(obj);
        let record = match kind {
            EntryType::Spell => Self::Spell(SpellRecord {
                common,
                level: obj
                    .get("level")
                    .and_then(Value::as_number)
                    .map(number_text),
                school: text_field(obj, "school"),
                casting_time: text_field(obj, "casting_time"),
                range: text_field(obj, "range"),
                components: text_field(obj, "components"),
                duration: text_field(obj, "duration"),
            }),
            EntryType::Feat => Self::Feat(FeatRecord { common }),
            EntryType::Item => Self::Item(ItemRecord {
                common,
                category: text_field(obj, "category"),
                cost: text_field(obj, "cost"),
                weight: text_field(obj, "weight"),
            }),
            EntryType::Rule => Self::Rule(RuleRecord {
                common,
                category: text_field(obj, "category"),
            }),
        };
        Some(record)
    }

    /// The kind of this record.
    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::Spell(_) => EntryType::Spell,
            Self::Feat(_) => EntryType::Feat,
            Self::Item(_) => EntryType::Item,
            Self::Rule(_) => EntryType::Rule,
        }
    }

    /// Fields shared by every kind.
    pub fn common(&self) -> &RecordCommon {
        match self {
            Self::Spell(r) => &r.common,
            Self::Feat(r) => &r.common,
            Self::Item(r) => &r.common,
            Self::Rule(r) => &r.common,
        }
    }
}

/// A raw dataset: ordered source records, grouped by kind in
/// spells, feats, items, rules order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    records: Vec<SourceRecord>,
}

impl Dataset {
    /// Create an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset from already-parsed records.
    pub fn from_records(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }

    /// Parse a dataset keyed by kind (`spells`, `feats`, `items`, `rules`).
    ///
    /// A non-object payload yields an empty dataset; a missing or non-array
    /// kind contributes nothing; non-object records are skipped.
    pub fn from_value(value: &Value) -> Self {
        let mut records = Vec::new();
        let Some(obj) = value.as_object() else {
            log::debug!("Dataset payload is not an object; treating as empty");
            return Self { records };
        };
        for kind in EntryType::ALL {
            let key = dataset_key(kind);
            let Some(list) = obj.get(key).and_then(Value::as_array) else {
                continue;
            };
            for raw in list {
                match SourceRecord::from_value(kind, raw) {
                    Some(record) => records.push(record),
                    None => log::debug!("Skipping non-object {} record", kind),
                }
            }
        }
        Self { records }
    }

    /// Parse a dataset from a JSON string.
    pub fn from_json_str(json: &str) -> CompendiumResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Read and parse a dataset from a JSON file.
    pub fn load(path: &Path) -> CompendiumResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Append a record.
    pub fn push(&mut self, record: SourceRecord) {
        self.records.push(record);
    }

    /// All records in input order.
    pub fn records(&self) -> &[SourceRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// The dataset key holding records of `kind`.
pub fn dataset_key(kind: EntryType) -> &'static str {
    match kind {
        EntryType::Spell => "spells",
        EntryType::Feat => "feats",
        EntryType::Item => "items",
        EntryType::Rule => "rules",
    }
}

/// A trimmed, non-empty string or number field.
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    let text = match obj.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => number_text(n),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Render a JSON number for display. Integral floats drop the fraction, so
/// `3.0` reads `3`.
fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        // f64's Display already omits a zero fraction.
        n.as_f64().map_or_else(|| n.to_string(), |f| f.to_string())
    }
}

/// A string field kept verbatim (description text is normalized later).
fn raw_text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}
