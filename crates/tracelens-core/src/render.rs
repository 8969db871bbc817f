// crates/tracelens-core/src/render.rs
// ============================================================================
// Module: TraceLens Preview Rendering
// Description: Deterministic JSON-style text rendering for nested values.
// Purpose: Provide the single serialized form behind counts and previews.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! Summary nodes report a character count and a preview of the subtree they
//! replace. Both metrics are derived from one rendered string produced here,
//! so they can never disagree. Rendering is total: every value a record can
//! carry has a text form, and scalar text flows through a single escaping
//! path shared by keys and string leaves.
//!
//! The rendering is JSON-style with `", "` item separators and `": "` key
//! separators. Mapping keys appear in the mapping's own order, which the
//! record model preserves from the wire, so identical inputs always render
//! identically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write;

use serde_json::Value;

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders a value as deterministic JSON-style text.
#[must_use]
pub fn render_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(&mut out, value);
    out
}

/// Appends the rendering of a value to the output buffer.
fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => {
            out.push('{');
            for (index, (key, child)) in map.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_string(out, key);
                out.push_str(": ");
                write_value(out, child);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (index, child) in items.iter().enumerate() {
                if index > 0 {
                    out.push_str(", ");
                }
                write_value(out, child);
            }
            out.push(']');
        }
        scalar => write_scalar(out, scalar),
    }
}

/// Appends the rendering of a scalar leaf to the output buffer.
///
/// This is the leaf-encoding seam: every non-container value is rendered
/// here, so the character count and the preview always agree on leaf text.
fn write_scalar(out: &mut String, value: &Value) {
    match value {
        Value::String(text) => write_string(out, text),
        Value::Number(number) => {
            let _ = write!(out, "{number}");
        }
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Null => out.push_str("null"),
        Value::Object(_) | Value::Array(_) => write_value(out, value),
    }
}

/// Appends a quoted, escaped string to the output buffer.
fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            control if control < '\u{20}' => {
                let code = u32::from(control);
                let _ = write!(out, "\\u{code:04x}");
            }
            other => out.push(other),
        }
    }
    out.push('"');
}

// ============================================================================
// SECTION: Tests
// ============================================================================
