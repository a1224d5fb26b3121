//! Entry normalization. Turns heterogeneous source records into uniform
//! [`SearchEntry`] values.
//!
//! Dispatch on record kind happens once, here, at ingestion. Nothing at query
//! time needs to know which kind an entry came from beyond its `entry_type`.

pub mod text;

use std::collections::HashSet;

use deunicode::deunicode;
use serde::{Deserialize, Serialize};

use crate::types::{
    Dataset, EntryType, FeatRecord, ItemRecord, RecordCommon, RuleRecord, SearchEntry,
    SourceRecord, SpellRecord, Stat,
};

pub use text::{
    format_source_badge, format_source_detail, normalize_description, summarise, uniq_strings,
};

use text::{join_present, DOT_SEPARATOR};

/// Per-kind entry counts produced by a dataset build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryCounts {
    pub spells: usize,
    pub feats: usize,
    pub items: usize,
    pub rules: usize,
    pub total: usize,
}

impl EntryCounts {
    /// Tally entries by type.
    pub fn tally(entries: &[SearchEntry]) -> Self {
        let mut counts = Self::default();
        for entry in entries {
            match entry.entry_type {
                EntryType::Spell => counts.spells += 1,
                EntryType::Feat => counts.feats += 1,
                EntryType::Item => counts.items += 1,
                EntryType::Rule => counts.rules += 1,
            }
        }
        counts.total = entries.len();
        counts
    }

    /// Count for a single type.
    pub fn get(&self, entry_type: EntryType) -> usize {
        match entry_type {
            EntryType::Spell => self.spells,
            EntryType::Feat => self.feats,
            EntryType::Item => self.items,
            EntryType::Rule => self.rules,
        }
    }
}

/// Normalize one record. Returns `None` when `slug`/`id` or `name` is missing.
pub fn normalize(record: &SourceRecord) -> Option<SearchEntry> {
    let common = record.common();
    let (Some(slug), Some(name)) = (common.slug.as_deref(), common.name.as_deref()) else {
        log::debug!(
            "Dropping {} record without slug or name (slug={:?}, name={:?})",
            record.entry_type(),
            common.slug,
            common.name
        );
        return None;
    };

    let draft = match record {
        SourceRecord::Spell(spell) => spell_draft(spell),
        SourceRecord::Feat(feat) => feat_draft(feat),
        SourceRecord::Item(item) => item_draft(item),
        SourceRecord::Rule(rule) => rule_draft(rule),
    };
    Some(draft.finish(record.entry_type(), common, slug, name))
}

/// Normalize every record of a dataset and sort by `sort_key` of the name.
///
/// The sort is stable, so entries with equal names keep dataset order.
/// A record whose id repeats an earlier one is dropped.
pub fn build_entries(dataset: &Dataset) -> Vec<SearchEntry> {
    let mut seen_ids = HashSet::new();
    let mut entries: Vec<SearchEntry> = dataset
        .records()
        .iter()
        .filter_map(normalize)
        .filter(|entry| {
            let fresh = seen_ids.insert(entry.id.clone());
            if !fresh {
                log::debug!("Dropping duplicate entry id {}", entry.id);
            }
            fresh
        })
        .collect();
    entries.sort_by_cached_key(|entry| sort_key(&entry.name));
    entries
}

/// Case- and accent-insensitive sort key: `Éclair` sorts with `eclair`.
pub fn sort_key(name: &str) -> String {
    deunicode(name).to_lowercase()
}

/// Kind-specific facets and stats, before the shared fields are filled in.
struct Draft {
    /// Shown in the subtitle and tags, after the type label.
    facets: Vec<String>,
    stats: Vec<Stat>,
    /// Whether the source badge is appended as a trailing `Source` stat.
    source_stat: bool,
}

impl Draft {
    fn finish(
        self,
        entry_type: EntryType,
        common: &RecordCommon,
        slug: &str,
        name: &str,
    ) -> SearchEntry {
        let description = common
            .description
            .as_deref()
            .map(normalize_description)
            .unwrap_or_default();
        let source_label = format_source_badge(common.source.as_ref());
        let source_detail = format_source_detail(common.source.as_ref());

        let labelled: Vec<&str> = std::iter::once(entry_type.label())
            .chain(self.facets.iter().map(String::as_str))
            .chain(std::iter::once(source_label.as_str()))
            .collect();
        let subtitle = join_present(labelled.iter().copied().map(Some), DOT_SEPARATOR);
        let tags = uniq_strings(labelled.iter().copied());

        let mut stats = self.stats;
        if self.source_stat && !source_label.is_empty() {
            stats.push(Stat::new("Source", source_label.as_str()));
        }

        SearchEntry {
            id: SearchEntry::make_id(entry_type, slug),
            slug: slug.to_string(),
            name: name.to_string(),
            entry_type,
            subtitle,
            summary: summarise(&description),
            description,
            stats,
            tags,
            source_label,
            source_detail,
        }
    }
}

fn push_stat(stats: &mut Vec<Stat>, label: &str, value: Option<&str>) {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
        stats.push(Stat::new(label, value));
    }
}

fn spell_draft(spell: &SpellRecord) -> Draft {
    let level = spell.level.as_ref().map(|l| format!("Level {l}"));
    let mut facets = Vec::new();
    facets.extend(level.clone());
    facets.extend(spell.school.clone());

    let mut stats = Vec::new();
    push_stat(&mut stats, "Level", level.as_deref());
    push_stat(&mut stats, "School", spell.school.as_deref());
    push_stat(&mut stats, "Casting Time", spell.casting_time.as_deref());
    push_stat(&mut stats, "Range", spell.range.as_deref());
    push_stat(&mut stats, "Components", spell.components.as_deref());
    push_stat(&mut stats, "Duration", spell.duration.as_deref());

    Draft {
        facets,
        stats,
        source_stat: false,
    }
}

fn feat_draft(_feat: &FeatRecord) -> Draft {
    Draft {
        facets: Vec::new(),
        stats: Vec::new(),
        source_stat: true,
    }
}

fn item_draft(item: &ItemRecord) -> Draft {
    let mut stats = Vec::new();
    push_stat(&mut stats, "Category", item.category.as_deref());
    push_stat(&mut stats, "Cost", item.cost.as_deref());
    push_stat(&mut stats, "Weight", item.weight.as_deref());
    Draft {
        facets: item.category.iter().cloned().collect(),
        stats,
        source_stat: true,
    }
}

fn rule_draft(rule: &RuleRecord) -> Draft {
    let mut stats = Vec::new();
    push_stat(&mut stats, "Category", rule.category.as_deref());
    Draft {
        facets: rule.category.iter().cloned().collect(),
        stats,
        source_stat: true,
    }
}
