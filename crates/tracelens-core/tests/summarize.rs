// crates/tracelens-core/tests/summarize.rs
// ============================================================================
// Module: Summarization Integration Tests
// Description: End-to-end properties of selection plus summarization.
// Purpose: Validate documented scenarios and metric guarantees.
// Dependencies: tracelens-core, serde_json
// ============================================================================

//! ## Overview
//! Exercises the full selection → summarization pipeline the run-fetching
//! tool uses, including the documented concrete scenarios and the bounds on
//! preview length and character counts.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use serde_json::json;
use tracelens_core::KEY_CHARACTER_COUNT;
use tracelens_core::KEY_FIELD_COUNT;
use tracelens_core::KEY_PREVIEW;
use tracelens_core::KEY_TYPE;
use tracelens_core::PREVIEW_MAX_CHARS;
use tracelens_core::Record;
use tracelens_core::TRUNCATION_MARKER;
use tracelens_core::render_value;
use tracelens_core::select_fields;
use tracelens_core::summarize_record;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds a record from a JSON object literal.
fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        _ => Record::new(),
    }
}

// ============================================================================
// SECTION: Documented Scenarios
// ============================================================================

#[test]
fn nested_outputs_at_depth_one() {
    let input = record(json!({"id": "r1", "outputs": {"a": {"b": {"c": 1}}}}));
    let output = summarize_record(&input, 1);
    assert_eq!(output["id"], json!("r1"));
    let outputs = output["outputs"].as_object().expect("outputs kept as mapping");
    let node = outputs["a"].as_object().expect("inner subtree summarized");
    assert_eq!(node[KEY_TYPE], json!("mapping"));
    assert_eq!(node[KEY_FIELD_COUNT], json!(1));
    assert_eq!(node[KEY_PREVIEW], json!("{\"b\": {\"c\": 1}}"));
    assert_eq!(node[KEY_CHARACTER_COUNT], json!(15));
}

#[test]
fn tags_sequence_at_depth_zero() {
    let input = record(json!({"tags": ["x", "y", "z"]}));
    let output = summarize_record(&input, 0);
    let node = output["tags"].as_object().expect("tags summarized");
    assert_eq!(node[KEY_TYPE], json!("sequence"));
    assert_eq!(node[KEY_FIELD_COUNT], json!(3));
    assert_eq!(node[KEY_PREVIEW], json!("[\"x\", \"y\", \"z\"]"));
    assert_eq!(node[KEY_CHARACTER_COUNT], json!(15));
}

// ============================================================================
// SECTION: Metric Bounds
// ============================================================================

#[test]
fn character_count_never_decreases_as_content_grows() {
    let mut items: Vec<Value> = Vec::new();
    let mut previous = 0_u64;
    for index in 0..32 {
        items.push(json!(format!("element-{index}")));
        let input = record(json!({"events": items.clone()}));
        let output = summarize_record(&input, 0);
        let node = output["events"].as_object().expect("events summarized");
        let count = node[KEY_CHARACTER_COUNT].as_u64().expect("count is a number");
        assert!(count >= previous);
        previous = count;
    }
}

#[test]
fn preview_length_is_bounded() {
    let marker_len = TRUNCATION_MARKER.chars().count();
    for size in [1_usize, 10, 60, 200, 201, 5_000] {
        let input = record(json!({"outputs": {"text": "x".repeat(size)}}));
        let output = summarize_record(&input, 0);
        let node = output["outputs"].as_object().expect("outputs summarized");
        let preview = node[KEY_PREVIEW].as_str().expect("preview is a string");
        assert!(preview.chars().count() <= PREVIEW_MAX_CHARS + marker_len);
    }
}

#[test]
fn short_previews_equal_the_full_rendering() {
    let subtree = json!({"b": [1, 2, 3]});
    let input = record(json!({"outputs": subtree}));
    let output = summarize_record(&input, 0);
    let node = output["outputs"].as_object().expect("outputs summarized");
    assert_eq!(node[KEY_PREVIEW], json!(render_value(&subtree)));
}

#[test]
fn character_count_matches_preview_source() {
    let subtree = json!({"a": {"b": "value"}, "c": [true, null]});
    let rendered = render_value(&subtree);
    let input = record(json!({"extra": subtree}));
    let output = summarize_record(&input, 0);
    let node = output["extra"].as_object().expect("extra summarized");
    let expected = u64::try_from(rendered.chars().count()).expect("fits in u64");
    assert_eq!(node[KEY_CHARACTER_COUNT], json!(expected));
}

// ============================================================================
// SECTION: Selection Composition
// ============================================================================

#[test]
fn selection_runs_before_summarization() {
    let input = record(json!({
        "id": "r1",
        "inputs": {"question": "q"},
        "outputs": {"answer": {"text": "a"}},
        "tags": ["x"]
    }));
    let wanted = vec!["outputs".to_string(), "id".to_string(), "missing".to_string()];
    let selected = select_fields(&input, Some(&wanted));
    let output = summarize_record(&selected, 0);
    let keys: Vec<&str> = output.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "outputs"]);
    assert!(output["outputs"].as_object().is_some_and(|node| node.contains_key(KEY_TYPE)));
}

#[test]
fn selection_does_not_change_selected_values() {
    let input = record(json!({"inputs": {"q": 1}, "outputs": {"a": 2}}));
    let wanted = vec!["outputs".to_string()];
    let selected = select_fields(&input, Some(&wanted));
    let from_selected = summarize_record(&selected, 0);
    let from_full = summarize_record(&input, 0);
    assert_eq!(from_selected["outputs"], from_full["outputs"]);
}

// ============================================================================
// SECTION: Input Integrity
// ============================================================================

#[test]
fn input_record_is_not_mutated() {
    let input = record(json!({"outputs": {"a": {"b": 1}}}));
    let snapshot = input.clone();
    let _ = summarize_record(&input, 0);
    let _ = select_fields(&input, Some(&["outputs".to_string()]));
    assert_eq!(input, snapshot);
}
