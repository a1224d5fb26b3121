//! Phase 2 tests: Tokenizer + inverted index.

use compendium_index::index::{search_vector, tokenize, SearchIndex};
use compendium_index::normalize::build_entries;
use compendium_index::types::{Dataset, EntryType};

use serde_json::json;

fn sample_index() -> SearchIndex {
    SearchIndex::from_dataset(&Dataset::from_value(&json!({
        "spells": [
            {
                "slug": "fireball",
                "name": "Fireball",
                "level": 3,
                "school": "Evocation",
                "description": "A bright streak flashes from your pointing finger."
            },
            { "slug": "aid", "name": "Aid", "level": 2, "school": "Abjuration" }
        ],
        "feats": [
            { "slug": "alert", "name": "Alert", "description": "Always on the lookout." }
        ]
    })))
}

// ==================== Tokenizer Tests ====================

#[test]
fn test_tokenize_splits_on_non_alphanumerics() {
    assert_eq!(
        tokenize("20-foot-radius sphere; DEX save!"),
        vec!["20", "foot", "radius", "sphere", "dex", "save"]
    );
}

#[test]
fn test_tokenize_dedups_in_first_occurrence_order() {
    assert_eq!(tokenize("b a B c A"), vec!["b", "a", "c"]);
}

#[test]
fn test_tokenize_empty_and_separator_only() {
    assert!(tokenize("").is_empty());
    assert!(tokenize(" -- ,, !!").is_empty());
}

#[test]
fn test_tokenize_non_ascii_is_separator() {
    assert_eq!(tokenize("Spell · Level 3"), vec!["spell", "level", "3"]);
    assert_eq!(tokenize("café"), vec!["caf"]);
}

// ==================== Search Vector Tests ====================

#[test]
fn test_search_vector_fields_in_order() {
    let entries = build_entries(&Dataset::from_value(&json!({
        "items": [{
            "slug": "rope",
            "name": "Rope",
            "category": "Gear",
            "cost": "1 gp",
            "description": "Fifty feet of HEMP.",
            "source": { "name": "SRD", "edition": "5.1" }
        }]
    })));
    let vector = search_vector(&entries[0]);
    assert_eq!(
        vector,
        "rope item · gear · srd · 5.1 fifty feet of hemp. fifty feet of hemp. \
         source: srd • 5.1 item gear srd · 5.1 category gear cost 1 gp source srd · 5.1"
    );
    assert_eq!(vector, vector.to_lowercase());
}

// ==================== Index Tests ====================

#[test]
fn test_index_positions_follow_sorted_entries() {
    let index = sample_index();
    let names: Vec<&str> = index.entries().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Aid", "Alert", "Fireball"]);
    assert_eq!(index.len(), 3);
    assert_eq!(index.search_vectors().len(), 3);
    assert_eq!(index.position("spell:fireball"), Some(2));
}

#[test]
fn test_postings_map_tokens_to_positions() {
    let index = sample_index();
    let spell = index.postings("spell").unwrap();
    assert_eq!(spell.len(), 2);
    assert!(spell.contains(&0) && spell.contains(&2));
    assert_eq!(index.postings("alert").unwrap().len(), 1);
    assert!(index.postings("fire").is_none());
    assert!(index.postings("fireball").unwrap().contains(&2));
}

#[test]
fn test_every_vector_token_is_indexed() {
    let index = sample_index();
    for (position, vector) in index.search_vectors().iter().enumerate() {
        for token in tokenize(vector) {
            assert!(
                index.postings(&token).unwrap().contains(&position),
                "token {token} missing position {position}"
            );
        }
    }
}

#[test]
fn test_postings_never_point_at_vectors_without_the_token() {
    let index = SearchIndex::from_dataset(&Dataset::from_value(&json!({
        "rules": [
            {
                "slug": "travel",
                "name": "İstanbul ΣΑΣ café",
                "category": "Ünterwegs",
                "description": "Straße, naïve façade; ÆON-7 ΣΊΣΥΦΟΣ."
            },
            { "slug": "plain", "name": "Plain Rule", "description": "Cafe CAFE caf" }
        ]
    })));
    assert!(index.token_count() > 0);
    for (token, positions) in index.token_index() {
        for &position in positions {
            let vector = index.vector(position).unwrap();
            assert!(
                vector.contains(token.as_str()),
                "token {token} not in vector {position}: {vector}"
            );
        }
    }
    let caf = index.postings("caf").unwrap();
    assert_eq!(caf.len(), 2);
}

#[test]
fn test_lookup_by_id() {
    let index = sample_index();
    let alert = index.get("feat:alert").unwrap();
    assert_eq!(alert.entry_type, EntryType::Feat);
    assert!(index.get("feat:missing").is_none());
    assert_eq!(index.entry(0).unwrap().name, "Aid");
    assert!(index.entry(3).is_none());
    assert_eq!(index.vector(2).unwrap(), search_vector(index.entry(2).unwrap()));
}

#[test]
fn test_index_counts() {
    let counts = sample_index().counts();
    assert_eq!(counts.spells, 2);
    assert_eq!(counts.feats, 1);
    assert_eq!(counts.total, 3);
}

#[test]
fn test_empty_index() {
    let index = SearchIndex::new();
    assert!(index.is_empty());
    assert_eq!(index.token_count(), 0);
    assert_eq!(index.generation(), 0);
    assert_eq!(index.counts().total, 0);

    let empty = SearchIndex::from_dataset(&Dataset::new());
    assert!(empty.is_empty());
}

#[test]
fn test_generation_tag() {
    let index = sample_index().with_generation(7);
    assert_eq!(index.generation(), 7);
    assert_eq!(index.len(), 3);
}

#[test]
fn test_rebuild_is_deterministic() {
    let a = sample_index();
    let b = sample_index();
    assert_eq!(a.search_vectors(), b.search_vectors());
    assert_eq!(a.token_index(), b.token_index());
}
