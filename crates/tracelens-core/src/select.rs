// crates/tracelens-core/src/select.rs
// ============================================================================
// Module: TraceLens Field Selection
// Description: Top-level field allow-list projection for run records.
// Purpose: Narrow records to requested fields before summarization.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Callers may request a subset of a record's top-level fields. Selection
//! keeps the record's own key order among selected keys and silently omits
//! requested keys the record does not carry. It runs before, and independent
//! of, depth-limited summarization.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::tree::Record;

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Projects a record onto an optional top-level field allow-list.
///
/// With `None` the record is returned unchanged. With a list, the result
/// contains the intersection of the list and the record's keys, in the
/// record's original order. Absent keys are omitted, never an error.
#[must_use]
pub fn select_fields(record: &Record, selected: Option<&[String]>) -> Record {
    selected.map_or_else(
        || record.clone(),
        |fields| {
            let wanted: BTreeSet<&str> = fields.iter().map(String::as_str).collect();
            record
                .iter()
                .filter(|(key, _)| wanted.contains(key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        },
    )
}

// ============================================================================
// SECTION: Tests
// ============================================================================
