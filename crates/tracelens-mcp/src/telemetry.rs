// crates/tracelens-mcp/src/telemetry.rs
// ============================================================================
// Module: MCP Telemetry
// Description: Observability hooks for MCP transport and tool routing.
// Purpose: Provide metric events and latency buckets without hard deps.
// Dependencies: serde, tracelens-config
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for MCP request counters and
//! latency histograms. It is intentionally dependency-light so deployments
//! can plug in Prometheus or OpenTelemetry without redesign. Labels are
//! drawn from fixed enums so cardinality stays bounded.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use tracelens_config::ServerTransport;

use crate::tooling::ToolName;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for MCP request histograms.
pub const MCP_LATENCY_BUCKETS_MS: &[u64] =
    &[1, 2, 5, 10, 25, 50, 100, 250, 500, 1_000, 2_500, 5_000, 10_000, 30_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// MCP request method classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum McpMethod {
    /// JSON-RPC tools/list.
    ToolsList,
    /// JSON-RPC tools/call.
    ToolsCall,
    /// Invalid or malformed JSON-RPC request.
    Invalid,
    /// Unsupported JSON-RPC method.
    Other,
}

impl McpMethod {
    /// Returns a stable label for the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
            Self::Invalid => "invalid",
            Self::Other => "other",
        }
    }
}

/// MCP request outcome classification.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum McpOutcome {
    /// Successful request.
    Ok,
    /// Failed request.
    Error,
}

impl McpOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

/// MCP request metric event payload.
///
/// # Invariants
/// - Optional fields are `None` when the metadata is unavailable.
#[derive(Debug, Clone)]
pub struct McpMetricEvent {
    /// JSON-RPC method classification.
    pub method: McpMethod,
    /// Tool name when the method is tools/call.
    pub tool: Option<ToolName>,
    /// Transport the request arrived on.
    pub transport: ServerTransport,
    /// Request outcome.
    pub outcome: McpOutcome,
    /// Request handling duration.
    pub duration: Duration,
}

// ============================================================================
// SECTION: Metrics Interface
// ============================================================================

/// Metrics sink for MCP request events.
pub trait McpMetrics: Send + Sync {
    /// Records one request event.
    fn record(&self, event: &McpMetricEvent);
}

/// Metrics sink that drops all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl McpMetrics for NoopMetrics {
    fn record(&self, _event: &McpMetricEvent) {}
}
