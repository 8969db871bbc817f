// crates/tracelens-mcp/src/audit.rs
// ============================================================================
// Module: MCP Audit Logging
// Description: Structured audit events for tool invocations.
// Purpose: Emit one JSON line per tool call without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The router emits one audit event per tool call: the tool, the outcome,
//! and the handling duration. Events never carry request arguments or
//! response payloads, so logs stay free of run content and credentials. The
//! stderr sink writes JSON lines; deployments can route events elsewhere by
//! implementing [`AuditSink`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::telemetry::McpOutcome;
use crate::tooling::ToolName;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Tool invocation audit event payload.
///
/// # Invariants
/// - Carries no request arguments or response payloads.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Tool that was invoked.
    pub tool: ToolName,
    /// Invocation outcome.
    pub outcome: McpOutcome,
    /// Handling duration in milliseconds.
    pub duration_ms: u128,
    /// Normalized error kind label when the call failed.
    pub error_kind: Option<&'static str>,
}

impl ToolCallEvent {
    /// Creates a tool call event stamped with the current time.
    #[must_use]
    pub fn new(
        tool: ToolName,
        outcome: McpOutcome,
        duration_ms: u128,
        error_kind: Option<&'static str>,
    ) -> Self {
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis());
        Self {
            event: "tool_call",
            timestamp_ms,
            tool,
            outcome,
            duration_ms,
            error_kind,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink for tool invocation events.
pub trait AuditSink: Send + Sync {
    /// Records one tool call event.
    fn record(&self, event: &ToolCallEvent);
}

/// Audit sink that logs JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record(&self, event: &ToolCallEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that drops all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &ToolCallEvent) {}
}
