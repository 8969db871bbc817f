// crates/tracelens-mcp/src/params.rs
// ============================================================================
// Module: MCP Parameter Coercion
// Description: String-typed tool argument parsing helpers.
// Purpose: Keep the original string conventions MCP callers rely on.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Tool arguments arrive string-typed: booleans as `"true"`/`"false"`,
//! integers as decimal strings, lists as JSON-array strings with single
//! values promoted to one-element lists, and metadata as JSON-object
//! strings. Malformed JSON in list arguments falls back to treating the raw
//! string as a single value; malformed integers are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error produced when a string-typed argument cannot be coerced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for {field}: {reason}")]
pub struct ParamError {
    /// Argument name the failure applies to.
    pub field: String,
    /// Human-readable failure reason.
    pub reason: String,
}

impl ParamError {
    /// Creates a parameter error for a named field.
    fn new(field: &str, reason: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// SECTION: Numeric Arguments
// ============================================================================

/// Numeric argument accepted in string or number form.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NumberArg {
    /// Native JSON number form.
    Number(i64),
    /// Decimal string form.
    Text(String),
}

/// Parses a signed numeric argument, defaulting when absent or empty.
///
/// # Errors
///
/// Returns [`ParamError`] when a non-empty string is not a decimal integer.
pub fn parse_number(
    field: &str,
    value: Option<&NumberArg>,
    default: i64,
) -> Result<i64, ParamError> {
    match value {
        None => Ok(default),
        Some(NumberArg::Number(number)) => Ok(*number),
        Some(NumberArg::Text(text)) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                return Ok(default);
            }
            trimmed
                .parse::<i64>()
                .map_err(|_| ParamError::new(field, format!("expected an integer, got {text:?}")))
        }
    }
}

/// Parses a non-negative count argument, defaulting when absent or empty.
///
/// # Errors
///
/// Returns [`ParamError`] on malformed or negative input.
pub fn parse_count(
    field: &str,
    value: Option<&NumberArg>,
    default: usize,
) -> Result<usize, ParamError> {
    let fallback = i64::try_from(default).unwrap_or(i64::MAX);
    let signed = parse_number(field, value, fallback)?;
    usize::try_from(signed)
        .map_err(|_| ParamError::new(field, format!("expected a non-negative count, got {signed}")))
}

/// Parses an optional non-negative count argument.
///
/// # Errors
///
/// Returns [`ParamError`] on malformed or negative input.
pub fn parse_opt_count(
    field: &str,
    value: Option<&NumberArg>,
) -> Result<Option<usize>, ParamError> {
    match value {
        None => Ok(None),
        Some(NumberArg::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(_) => parse_count(field, value, 0).map(Some),
    }
}

// ============================================================================
// SECTION: Boolean Arguments
// ============================================================================

/// Parses a boolean flag: `"true"` (any case) is true, anything else false,
/// absent falls back to the default.
#[must_use]
pub fn parse_bool_flag(value: Option<&str>, default: bool) -> bool {
    value.map_or(default, |text| text.eq_ignore_ascii_case("true"))
}

/// Parses a tri-state boolean: `"true"`/`"false"` map to set values, any
/// other input (including absence) means unset.
#[must_use]
pub fn parse_opt_bool(value: Option<&str>) -> Option<bool> {
    let text = value?;
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

// ============================================================================
// SECTION: List and Object Arguments
// ============================================================================

/// Parses a string-or-JSON-array argument.
///
/// A string beginning with `[` is parsed as a JSON string array, falling
/// back to a single-element list when malformed. Any other non-empty string
/// becomes a one-element list. Empty or absent input yields `None`.
#[must_use]
pub fn parse_string_list(value: Option<&str>) -> Option<Vec<String>> {
    let text = value?;
    if text.is_empty() {
        return None;
    }
    if text.starts_with('[') {
        if let Ok(items) = serde_json::from_str::<Vec<String>>(text) {
            return Some(items);
        }
    }
    Some(vec![text.to_string()])
}

/// Parses a JSON-object argument.
///
/// A string beginning with `{` is parsed as a JSON object; anything else,
/// including malformed JSON, yields `None`.
#[must_use]
pub fn parse_json_object(value: Option<&str>) -> Option<Value> {
    let text = value?;
    if !text.starts_with('{') {
        return None;
    }
    serde_json::from_str::<Value>(text).ok().filter(Value::is_object)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
