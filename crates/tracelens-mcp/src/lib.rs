// crates/tracelens-mcp/src/lib.rs
// ============================================================================
// Module: TraceLens MCP
// Description: MCP server exposing platform query operations as tools.
// Purpose: Provide thin tool wrappers over the platform API client.
// Dependencies: axum, tokio, tracelens-client, tracelens-core
// ============================================================================

//! ## Overview
//! TraceLens MCP exposes hosted-platform query operations (prompts, runs,
//! projects, datasets, examples) as JSON-RPC 2.0 tools over stdio or HTTP.
//! Tool handlers are thin wrappers over [`tracelens_client::PlatformApi`];
//! the run-fetching tool additionally projects results through the
//! summarizer in [`tracelens_core`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod auth;
pub mod params;
pub mod server;
pub mod telemetry;
pub mod tooling;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditSink;
pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ToolCallEvent;
pub use auth::AuthError;
pub use auth::RequestContext;
pub use auth::ServerAuthPolicy;
pub use server::McpServer;
pub use server::McpServerError;
pub use telemetry::MCP_LATENCY_BUCKETS_MS;
pub use telemetry::McpMethod;
pub use telemetry::McpMetricEvent;
pub use telemetry::McpMetrics;
pub use telemetry::McpOutcome;
pub use telemetry::NoopMetrics;
pub use tooling::ToolDefinition;
pub use tooling::ToolName;
pub use tooling::tool_definitions;
pub use tools::ToolError;
pub use tools::ToolRouter;
