//! Text shaping helpers shared by every record kind.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{Provenance, SUMMARY_MAX_CHARS, SUMMARY_PLACEHOLDER};

static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").expect("valid regex"));
static BLANK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Separator for subtitles and source badges.
pub const DOT_SEPARATOR: &str = " · ";

/// Separator inside source detail lines.
pub const BULLET_SEPARATOR: &str = " • ";

/// Normalize line endings, collapse runs of blank lines, and trim.
pub fn normalize_description(text: &str) -> String {
    let unified = LINE_ENDINGS.replace_all(text, "\n");
    let collapsed = BLANK_RUNS.replace_all(&unified, "\n\n");
    collapsed.trim().to_string()
}

/// Summarise a normalized description for list rows.
///
/// Empty text yields the placeholder. Text longer than [`SUMMARY_MAX_CHARS`]
/// characters is cut on a character boundary and ends in a single `…`.
pub fn summarise(description: &str) -> String {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return SUMMARY_PLACEHOLDER.to_string();
    }
    if trimmed.chars().count() <= SUMMARY_MAX_CHARS {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(SUMMARY_MAX_CHARS - 3).collect();
    out.push('…');
    out
}

/// `"<name> · <edition>"`, omitting empty segments.
pub fn format_source_badge(source: Option<&Provenance>) -> String {
    let Some(source) = source else {
        return String::new();
    };
    join_present(
        [source.name.as_deref(), source.edition.as_deref()],
        DOT_SEPARATOR,
    )
}

/// `"Source: <name> • <edition> • <license>"`, or empty if no field is set.
pub fn format_source_detail(source: Option<&Provenance>) -> String {
    let Some(source) = source else {
        return String::new();
    };
    let parts = join_present(
        [
            source.name.as_deref(),
            source.edition.as_deref(),
            source.license.as_deref(),
        ],
        BULLET_SEPARATOR,
    );
    if parts.is_empty() {
        String::new()
    } else {
        format!("Source: {parts}")
    }
}

/// Join the non-empty parts with `sep`.
pub fn join_present<'a, I>(parts: I, sep: &str) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Trim, drop empties, and de-duplicate case-insensitively, keeping the
/// first spelling seen.
pub fn uniq_strings<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::new();
    for value in values {
        let value = value.trim();
        if value.is_empty() || !seen.insert(value.to_lowercase()) {
            continue;
        }
        out.push(value.to_string());
    }
    out
}
