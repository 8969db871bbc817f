// crates/tracelens-mcp/src/params/tests.rs
// ============================================================================
// Module: Parameter Coercion Tests
// Description: Unit tests for string-typed argument parsing.
// Purpose: Validate boolean, count, list, and object coercion rules.
// Dependencies: tracelens-mcp, serde_json
// ============================================================================

//! ## Overview
//! Validates the string conventions tool callers rely on: case-insensitive
//! booleans, decimal counts with defaults, JSON-array strings with
//! single-value promotion and malformed-JSON fallback, and JSON-object
//! metadata parsing.

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

use serde_json::json;

use super::NumberArg;
use super::parse_bool_flag;
use super::parse_count;
use super::parse_json_object;
use super::parse_number;
use super::parse_opt_bool;
use super::parse_opt_count;
use super::parse_string_list;

// ============================================================================
// SECTION: Boolean Tests
// ============================================================================

#[test]
fn bool_flag_accepts_true_case_insensitively() {
    assert!(parse_bool_flag(Some("true"), false));
    assert!(parse_bool_flag(Some("TRUE"), false));
    assert!(parse_bool_flag(Some("True"), false));
}

#[test]
fn bool_flag_treats_everything_else_as_false() {
    assert!(!parse_bool_flag(Some("false"), true));
    assert!(!parse_bool_flag(Some("yes"), true));
    assert!(!parse_bool_flag(Some(""), true));
}

#[test]
fn bool_flag_defaults_when_absent() {
    assert!(parse_bool_flag(None, true));
    assert!(!parse_bool_flag(None, false));
}

#[test]
fn opt_bool_maps_only_recognized_values() {
    assert_eq!(parse_opt_bool(Some("true")), Some(true));
    assert_eq!(parse_opt_bool(Some("False")), Some(false));
    assert_eq!(parse_opt_bool(Some("maybe")), None);
    assert_eq!(parse_opt_bool(None), None);
}

// ============================================================================
// SECTION: Count Tests
// ============================================================================

#[test]
fn count_parses_strings_and_numbers() {
    let text = NumberArg::Text("25".to_string());
    assert_eq!(parse_count("limit", Some(&text), 50).expect("parses"), 25);
    let number = NumberArg::Number(10);
    assert_eq!(parse_count("limit", Some(&number), 50).expect("parses"), 10);
}

#[test]
fn count_defaults_when_absent_or_empty() {
    assert_eq!(parse_count("limit", None, 50).expect("parses"), 50);
    let empty = NumberArg::Text(String::new());
    assert_eq!(parse_count("limit", Some(&empty), 50).expect("parses"), 50);
}

#[test]
fn count_rejects_malformed_and_negative_input() {
    let garbage = NumberArg::Text("abc".to_string());
    assert!(parse_count("limit", Some(&garbage), 50).is_err());
    let negative = NumberArg::Number(-3);
    assert!(parse_count("limit", Some(&negative), 50).is_err());
}

#[test]
fn number_allows_negative_values() {
    let negative = NumberArg::Text("-1".to_string());
    assert_eq!(parse_number("depth", Some(&negative), 0).expect("parses"), -1);
}

#[test]
fn opt_count_distinguishes_absent_from_present() {
    assert_eq!(parse_opt_count("offset", None).expect("parses"), None);
    let empty = NumberArg::Text(String::new());
    assert_eq!(parse_opt_count("offset", Some(&empty)).expect("parses"), None);
    let present = NumberArg::Text("7".to_string());
    assert_eq!(parse_opt_count("offset", Some(&present)).expect("parses"), Some(7));
}

// ============================================================================
// SECTION: List Tests
// ============================================================================

#[test]
fn list_parses_json_array_strings() {
    let parsed = parse_string_list(Some("[\"a\", \"b\"]"));
    assert_eq!(parsed, Some(vec!["a".to_string(), "b".to_string()]));
}

#[test]
fn list_promotes_single_values() {
    let parsed = parse_string_list(Some("alpha-project"));
    assert_eq!(parsed, Some(vec!["alpha-project".to_string()]));
}

#[test]
fn list_falls_back_on_malformed_json() {
    let parsed = parse_string_list(Some("[not json"));
    assert_eq!(parsed, Some(vec!["[not json".to_string()]));
}

#[test]
fn list_yields_none_for_empty_input() {
    assert_eq!(parse_string_list(Some("")), None);
    assert_eq!(parse_string_list(None), None);
}

// ============================================================================
// SECTION: Object Tests
// ============================================================================

#[test]
fn object_parses_json_objects() {
    let parsed = parse_json_object(Some("{\"team\": \"search\"}"));
    assert_eq!(parsed, Some(json!({"team": "search"})));
}

#[test]
fn object_rejects_non_objects_and_malformed_json() {
    assert_eq!(parse_json_object(Some("[1, 2]")), None);
    assert_eq!(parse_json_object(Some("{broken")), None);
    assert_eq!(parse_json_object(None), None);
}
