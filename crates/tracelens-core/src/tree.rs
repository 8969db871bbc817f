// crates/tracelens-core/src/tree.rs
// ============================================================================
// Module: TraceLens Tree Summarization
// Description: Depth-limited summarization of nested run records.
// Purpose: Replace deep subtrees with compact, flat summary nodes.
// Dependencies: serde_json, crate::render
// ============================================================================

//! ## Overview
//! The summarizer walks a record's values and keeps full structure down to a
//! configured detail depth. Any container at or beyond that depth is replaced
//! by a summary node that measures the whole remaining subtree in one pass:
//! its kind, direct child count, serialized character count, and a bounded
//! preview of its serialized form.
//!
//! ## Invariants
//! - Summary nodes are flat mappings of scalars; the output never nests a
//!   container inside one.
//! - Values above the threshold keep their keys, element order, and values
//!   exactly.
//! - Top-level record keys are always preserved; only values are candidates
//!   for replacement.
//! - Inputs are never mutated; every call builds fresh output.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::render::render_value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum number of characters included in a summary preview.
pub const PREVIEW_MAX_CHARS: usize = 200;
/// Marker appended to previews cut at the preview bound.
pub const TRUNCATION_MARKER: &str = "...";
/// Summary node key holding the container kind.
pub const KEY_TYPE: &str = "_type";
/// Summary node key holding the direct child count.
pub const KEY_FIELD_COUNT: &str = "_field_count";
/// Summary node key holding the serialized character count.
pub const KEY_CHARACTER_COUNT: &str = "_character_count";
/// Summary node key holding the bounded preview text.
pub const KEY_PREVIEW: &str = "_preview";

// ============================================================================
// SECTION: Record Model
// ============================================================================

/// A run/trace record: top-level field names mapped to opaque nested values.
///
/// The map preserves insertion order, so records round-trip the field order
/// the platform API returned them in.
pub type Record = serde_json::Map<String, Value>;

/// Container kind recorded under [`KEY_TYPE`] on a summary node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// Key/value mapping subtree.
    Mapping,
    /// Ordered sequence subtree.
    Sequence,
}

impl SummaryKind {
    /// Returns the stable label stored on summary nodes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
        }
    }
}

// ============================================================================
// SECTION: Summarization
// ============================================================================

/// Clamps a caller-supplied detail depth to the supported range.
///
/// Negative depths are a caller contract violation and clamp to zero rather
/// than failing.
#[must_use]
pub fn clamp_depth(depth: i64) -> usize {
    usize::try_from(depth).unwrap_or(0)
}

/// Summarizes every value of a record at the given detail depth.
///
/// Top-level keys are always preserved. Each value is summarized starting at
/// depth zero, so `max_depth = 0` yields a flat mapping of scalars and
/// summary nodes.
#[must_use]
pub fn summarize_record(record: &Record, max_depth: usize) -> Record {
    record.iter().map(|(key, value)| (key.clone(), summarize_value(value, 0, max_depth))).collect()
}

/// Summarizes a single value at the given depth.
///
/// Scalars pass through unchanged at any depth. Containers below the
/// threshold recurse with depth incremented, visiting every branch exactly
/// once in original order. Containers at or beyond the threshold become
/// summary nodes regardless of how deep the subtree actually goes.
#[must_use]
pub fn summarize_value(value: &Value, depth: usize, max_depth: usize) -> Value {
    match value {
        Value::Object(map) if depth < max_depth => Value::Object(
            map.iter()
                .map(|(key, child)| (key.clone(), summarize_value(child, depth + 1, max_depth)))
                .collect(),
        ),
        Value::Array(items) if depth < max_depth => Value::Array(
            items.iter().map(|child| summarize_value(child, depth + 1, max_depth)).collect(),
        ),
        Value::Object(map) => summary_node(SummaryKind::Mapping, map.len(), value),
        Value::Array(items) => summary_node(SummaryKind::Sequence, items.len(), value),
        scalar => scalar.clone(),
    }
}

/// Builds the flat summary node replacing a subtree.
///
/// The character count and preview are derived from one rendering of the
/// subtree, so the two metrics always describe the same text.
fn summary_node(kind: SummaryKind, field_count: usize, value: &Value) -> Value {
    let rendered = render_value(value);
    let character_count = rendered.chars().count();
    let preview = if character_count > PREVIEW_MAX_CHARS {
        let mut cut: String = rendered.chars().take(PREVIEW_MAX_CHARS).collect();
        cut.push_str(TRUNCATION_MARKER);
        cut
    } else {
        rendered
    };
    let mut node = Record::new();
    node.insert(KEY_TYPE.to_string(), Value::String(kind.as_str().to_string()));
    node.insert(KEY_FIELD_COUNT.to_string(), Value::from(field_count));
    node.insert(KEY_CHARACTER_COUNT.to_string(), Value::from(character_count));
    node.insert(KEY_PREVIEW.to_string(), Value::String(preview));
    Value::Object(node)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
