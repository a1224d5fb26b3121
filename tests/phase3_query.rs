//! Phase 3 tests: Query engine + chunked result streams.

use compendium_index::engine::{intersect_tokens, Query, QueryEngine, ResultStream};
use compendium_index::index::SearchIndex;
use compendium_index::types::{Dataset, EntryType, WorkerResponse, DEFAULT_CHUNK_SIZE};

use serde_json::json;

fn scenario_index() -> SearchIndex {
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

fn large_index(count: usize) -> SearchIndex {
    let spells: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "slug": format!("spell-{i:04}"),
                "name": format!("Spell {i:04}"),
                "level": i % 10,
                "school": if i % 2 == 0 { "Evocation" } else { "Illusion" },
            })
        })
        .collect();
    SearchIndex::from_dataset(&Dataset::from_value(&json!({ "spells": spells })))
}

fn names(index: &SearchIndex, query: &Query) -> Vec<String> {
    QueryEngine::new()
        .search(index, query)
        .into_iter()
        .map(|e| e.name.clone())
        .collect()
}

// ==================== Query Semantics Tests ====================

#[test]
fn test_empty_query_returns_all_alphabetically() {
    let index = scenario_index();
    assert_eq!(names(&index, &Query::new("")), vec!["Aid", "Alert", "Fireball"]);
    assert_eq!(names(&index, &Query::new("   ")), vec!["Aid", "Alert", "Fireball"]);
}

#[test]
fn test_prefix_query() {
    let index = scenario_index();
    assert_eq!(names(&index, &Query::new("fire")), vec!["Fireball"]);
    assert_eq!(names(&index, &Query::new("FIRE")), vec!["Fireball"]);
}

#[test]
fn test_type_filter() {
    let index = scenario_index();
    let spells = Query::new("").with_types([EntryType::Spell]);
    assert_eq!(names(&index, &spells), vec!["Aid", "Fireball"]);

    let feats = Query::new("").with_types([EntryType::Feat]);
    assert_eq!(names(&index, &feats), vec!["Alert"]);

    let both = Query::new("").with_types([EntryType::Feat, EntryType::Spell]);
    assert_eq!(names(&index, &both).len(), 3);

    let items = Query::new("").with_types([EntryType::Item]);
    assert!(names(&index, &items).is_empty());
}

#[test]
fn test_substring_spanning_token_boundary() {
    let index = scenario_index();
    assert_eq!(names(&index, &Query::new("reba")), vec!["Fireball"]);
    assert_eq!(names(&index, &Query::new("fireb")), vec!["Fireball"]);
}

#[test]
fn test_multi_token_and() {
    let index = scenario_index();
    assert_eq!(names(&index, &Query::new("spell level 2")), vec!["Aid"]);
    assert!(names(&index, &Query::new("spell lookout")).is_empty());
}

#[test]
fn test_substring_is_authority_over_tokens() {
    // Both tokens are in Aid's vector, but not as this contiguous phrase.
    let index = scenario_index();
    assert!(names(&index, &Query::new("abjuration aid")).is_empty());
}

#[test]
fn test_narrowed_candidates_retry_all_positions() {
    let index = SearchIndex::from_dataset(&Dataset::from_value(&json!({
        "spells": [{ "slug": "fire-bolt", "name": "Fire Bolt", "level": 0 }],
        "feats": [{ "slug": "bo-of-ire", "name": "Bo of Ire" }]
    })));
    let engine = QueryEngine::new();

    let candidates = engine.candidates(&index, "ire bo");
    assert!(candidates.narrowed);
    assert_eq!(candidates.positions, vec![index.position("feat:bo-of-ire").unwrap()]);

    assert_eq!(names(&index, &Query::new("ire bo")), vec!["Fire Bolt"]);
}

#[test]
fn test_candidates_without_matching_tokens_are_all_positions() {
    let index = scenario_index();
    let engine = QueryEngine::new();
    let candidates = engine.candidates(&index, "zzz");
    assert!(!candidates.narrowed);
    assert_eq!(candidates.positions, vec![0, 1, 2]);

    let punctuation = engine.candidates(&index, "--");
    assert!(!punctuation.narrowed);
    assert_eq!(punctuation.positions.len(), 3);
}

#[test]
fn test_no_match_is_empty_not_error() {
    let index = scenario_index();
    assert!(names(&index, &Query::new("tarrasque")).is_empty());
}

#[test]
fn test_intersect_tokens_sorted() {
    let index = large_index(50);
    let hits = intersect_tokens(&index, &["spell".to_string(), "evocation".to_string()]);
    assert_eq!(hits.len(), 25);
    assert!(hits.windows(2).all(|w| w[0] < w[1]));
    assert!(intersect_tokens(&index, &["spell".to_string(), "necromancy".to_string()]).is_empty());
    assert!(intersect_tokens(&index, &[]).is_empty());
}

#[test]
fn test_every_entry_found_by_its_name() {
    let index = scenario_index();
    let engine = QueryEngine::new();
    for entry in index.entries() {
        let hits = engine.search(&index, &Query::new(entry.name.to_uppercase()));
        assert!(
            hits.iter().any(|e| e.id == entry.id),
            "{} not found by name",
            entry.id
        );
    }
}

#[test]
fn test_results_keep_index_order() {
    let index = large_index(200);
    let engine = QueryEngine::new();
    let positions = engine.positions(&index, &Query::new("illusion"));
    assert_eq!(positions.len(), 100);
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_search_on_empty_index() {
    let index = SearchIndex::new();
    assert!(names(&index, &Query::new("")).is_empty());
    assert!(names(&index, &Query::new("fire")).is_empty());
}

// ==================== Payload Tests ====================

#[test]
fn test_query_from_payload() {
    let query = Query::from_payload(&json!({
        "query": "  Fire ",
        "filters": ["spell", "Feats", "monster", 7]
    }));
    assert_eq!(query.text, "  Fire ");
    assert_eq!(query.normalized_text(), "fire");
    assert_eq!(
        query.type_filters.iter().copied().collect::<Vec<_>>(),
        vec![EntryType::Spell, EntryType::Feat]
    );
}

#[test]
fn test_malformed_payload_defaults() {
    for payload in [
        json!(null),
        json!("fire"),
        json!([1, 2]),
        json!({ "query": 5, "filters": "spell" }),
    ] {
        let query = Query::from_payload(&payload);
        assert!(query.text.is_empty(), "payload {payload}");
        assert!(query.type_filters.is_empty(), "payload {payload}");
    }
}

#[test]
fn test_payload_roundtrip() {
    let query = Query::new("aid").with_types([EntryType::Rule, EntryType::Spell]);
    let payload = query.to_payload();
    assert_eq!(payload["filters"], json!(["spell", "rule"]));
    assert_eq!(Query::from_payload(&payload), query);
}

// ==================== Stream Tests ====================

#[test]
fn test_stream_chunking() {
    let index = large_index(150);
    let messages: Vec<WorkerResponse> = QueryEngine::new()
        .stream(&index, 7, &Query::new(""))
        .collect();

    assert_eq!(messages.len(), 1 + 3 + 1);
    assert_eq!(
        messages[0],
        WorkerResponse::ResultsStart {
            request_id: 7,
            total: 150
        }
    );
    let chunks: Vec<(usize, usize)> = messages[1..4]
        .iter()
        .map(|m| match m {
            WorkerResponse::ResultsChunk {
                request_id,
                offset,
                items,
            } => {
                assert_eq!(*request_id, 7);
                (*offset, items.len())
            }
            other => panic!("expected chunk, got {other:?}"),
        })
        .collect();
    assert_eq!(chunks, vec![(0, 60), (60, 60), (120, 30)]);
    assert_eq!(
        messages[4],
        WorkerResponse::ResultsEnd {
            request_id: 7,
            total: 150
        }
    );
}

#[test]
fn test_stream_chunk_count_formula() {
    let index = large_index(121);
    let engine = QueryEngine::new();
    for (query, expected_total) in [("", 121), ("evocation", 61), ("spell 0120", 1)] {
        let stream = engine.stream(&index, 1, &Query::new(query));
        assert_eq!(stream.total(), expected_total);
        assert_eq!(
            stream.chunk_count(),
            expected_total.div_ceil(DEFAULT_CHUNK_SIZE)
        );
        let chunks = stream
            .filter(|m| matches!(m, WorkerResponse::ResultsChunk { .. }))
            .count();
        assert_eq!(chunks, expected_total.div_ceil(DEFAULT_CHUNK_SIZE));
    }
}

#[test]
fn test_empty_result_stream_has_no_chunks() {
    let index = scenario_index();
    let messages: Vec<_> = QueryEngine::new()
        .stream(&index, 3, &Query::new("tarrasque"))
        .collect();
    assert_eq!(
        messages,
        vec![
            WorkerResponse::ResultsStart {
                request_id: 3,
                total: 0
            },
            WorkerResponse::ResultsEnd {
                request_id: 3,
                total: 0
            },
        ]
    );
}

#[test]
fn test_custom_chunk_size() {
    let index = scenario_index();
    let engine = QueryEngine::with_chunk_size(2);
    assert_eq!(engine.chunk_size(), 2);
    let offsets: Vec<usize> = engine
        .stream(&index, 1, &Query::new(""))
        .filter_map(|m| match m {
            WorkerResponse::ResultsChunk { offset, .. } => Some(offset),
            _ => None,
        })
        .collect();
    assert_eq!(offsets, vec![0, 2]);

    assert_eq!(QueryEngine::with_chunk_size(0).chunk_size(), DEFAULT_CHUNK_SIZE);
}

#[test]
fn test_stream_is_fused() {
    let mut stream = ResultStream::new(1, Vec::new(), 60);
    assert!(stream.next().is_some());
    assert!(stream.next().is_some());
    assert!(stream.next().is_none());
    assert!(stream.next().is_none());
}
