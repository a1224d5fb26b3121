//! Tokenizer shared by index build and query parsing.

use std::collections::HashSet;

/// Split `text` into lowercase tokens on runs of characters that are not
/// ASCII letters or digits. Tokens are unique and keep first-occurrence order.
///
/// ```
/// use compendium_index::index::tokenize;
///
/// assert_eq!(tokenize("Fire-ball, FIRE bolt!"), vec!["fire", "ball", "bolt"]);
/// ```
pub fn tokenize(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_lowercase)
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
