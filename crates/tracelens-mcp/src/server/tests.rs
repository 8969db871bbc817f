// crates/tracelens-mcp/src/server/tests.rs
// ============================================================================
// Module: MCP Server Tests
// Description: Unit tests for framing and JSON-RPC envelope handling.
// Purpose: Validate framing limits and protocol error mapping.
// Dependencies: tracelens-mcp, serde_json
// ============================================================================

//! ## Overview
//! Validates Content-Length framing (limits, EOF handling) and the JSON-RPC
//! envelope paths: version checks, method routing, tool dispatch, and the
//! protocol error codes.

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

use std::io::BufReader;
use std::io::Cursor;
use std::sync::Arc;

use serde_json::Value;
use serde_json::json;
use tracelens_client::ApiError;
use tracelens_client::DatasetQuery;
use tracelens_client::ExampleQuery;
use tracelens_client::PlatformApi;
use tracelens_client::ProjectQuery;
use tracelens_client::PromptQuery;
use tracelens_client::RunQuery;
use tracelens_client::StatsQuery;
use tracelens_config::ServerTransport;

use super::JsonRpcRequest;
use super::handle_request;
use super::process_payload;
use super::read_framed;
use super::write_framed;
use crate::audit::NoopAuditSink;
use crate::telemetry::McpMetrics;
use crate::telemetry::NoopMetrics;
use crate::tools::ToolRouter;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Platform API stub returning empty objects for every operation.
struct EmptyApi;

impl PlatformApi for EmptyApi {
    fn list_prompts(&self, _query: &PromptQuery) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn get_prompt(&self, _prompt_name: &str) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn list_projects(&self, _query: &ProjectQuery) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn query_runs(&self, _query: &RunQuery) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn project_runs_stats(&self, _query: &StatsQuery) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn list_datasets(&self, _query: &DatasetQuery) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn read_dataset(&self, _dataset_id: &str) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn list_examples(&self, _query: &ExampleQuery) -> Result<Value, ApiError> {
        Ok(json!({}))
    }

    fn read_example(&self, _example_id: &str, _as_of: Option<&str>) -> Result<Value, ApiError> {
        Ok(json!({}))
    }
}

/// Builds a router over the empty stub API.
fn test_router() -> ToolRouter {
    ToolRouter::new(Arc::new(EmptyApi), Arc::new(NoopAuditSink))
}

/// Parses a JSON-RPC request literal.
fn request(value: Value) -> JsonRpcRequest {
    serde_json::from_value(value).expect("request parses")
}

// ============================================================================
// SECTION: Framing Tests
// ============================================================================

#[test]
fn read_framed_rejects_payload_over_limit() {
    let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let framed = format!(
        "Content-Length: {}\r\n\r\n{}",
        payload.len(),
        String::from_utf8_lossy(payload)
    );
    let mut reader = BufReader::new(Cursor::new(framed.into_bytes()));
    let result = read_framed(&mut reader, payload.len() - 1);
    assert!(result.is_err());
}

#[test]
fn read_framed_accepts_payload_at_limit() {
    let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let framed = format!(
        "Content-Length: {}\r\n\r\n{}",
        payload.len(),
        String::from_utf8_lossy(payload)
    );
    let mut reader = BufReader::new(Cursor::new(framed.into_bytes()));
    let bytes = read_framed(&mut reader, payload.len()).expect("payload read");
    assert_eq!(bytes.as_deref(), Some(payload.as_slice()));
}

#[test]
fn read_framed_signals_clean_eof() {
    let mut reader = BufReader::new(Cursor::new(Vec::new()));
    let result = read_framed(&mut reader, 1024).expect("eof is clean");
    assert!(result.is_none());
}

#[test]
fn read_framed_requires_content_length() {
    let mut reader = BufReader::new(Cursor::new(b"X-Other: 1\r\n\r\n".to_vec()));
    assert!(read_framed(&mut reader, 1024).is_err());
}

#[test]
fn write_framed_round_trips() {
    let payload = br#"{"jsonrpc":"2.0","id":1,"method":"tools/list"}"#;
    let mut framed = Vec::new();
    write_framed(&mut framed, payload).expect("payload written");
    let mut reader = BufReader::new(Cursor::new(framed));
    let bytes = read_framed(&mut reader, payload.len()).expect("payload read");
    assert_eq!(bytes.as_deref(), Some(payload.as_slice()));
}

// ============================================================================
// SECTION: Envelope Tests
// ============================================================================

#[test]
fn wrong_version_is_rejected() {
    let router = test_router();
    let (_, _, _, response) = handle_request(
        &router,
        request(json!({"jsonrpc": "1.0", "id": 1, "method": "tools/list"})),
    );
    assert_eq!(response.error.expect("error set").code, -32600);
}

#[test]
fn unknown_methods_are_rejected() {
    let router = test_router();
    let (_, _, _, response) = handle_request(
        &router,
        request(json!({"jsonrpc": "2.0", "id": 2, "method": "resources/list"})),
    );
    assert_eq!(response.error.expect("error set").code, -32601);
}

#[test]
fn tools_list_returns_all_definitions() {
    let router = test_router();
    let (_, _, _, response) = handle_request(
        &router,
        request(json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list"})),
    );
    let result = response.result.expect("result set");
    let tools = result["tools"].as_array().expect("tools array");
    assert_eq!(tools.len(), 10);
    assert_eq!(tools[0]["name"], json!("list_prompts"));
}

#[test]
fn tools_call_dispatches_to_the_router() {
    let router = test_router();
    let (_, _, _, response) = handle_request(
        &router,
        request(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "list_prompts", "arguments": {"limit": "3"}}
        })),
    );
    let result = response.result.expect("result set");
    assert_eq!(result["content"][0]["type"], json!("json"));
    assert_eq!(result["content"][0]["json"], json!({}));
}

#[test]
fn tools_call_rejects_unknown_tools() {
    let router = test_router();
    let (_, _, _, response) = handle_request(
        &router,
        request(json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": {"name": "fetch_trace", "arguments": {}}
        })),
    );
    assert_eq!(response.error.expect("error set").code, -32601);
}

#[test]
fn tools_call_rejects_malformed_params() {
    let router = test_router();
    let (_, _, _, response) = handle_request(
        &router,
        request(json!({"jsonrpc": "2.0", "id": 6, "method": "tools/call"})),
    );
    assert_eq!(response.error.expect("error set").code, -32602);
}

#[test]
fn tools_call_maps_invalid_arguments() {
    let router = test_router();
    let (_, _, _, response) = handle_request(
        &router,
        request(json!({
            "jsonrpc": "2.0",
            "id": 7,
            "method": "tools/call",
            "params": {"name": "fetch_runs", "arguments": {"project_name": "alpha", "limit": "abc"}}
        })),
    );
    assert_eq!(response.error.expect("error set").code, -32602);
}

// ============================================================================
// SECTION: Payload Tests
// ============================================================================

#[test]
fn oversized_payloads_are_rejected() {
    let router = test_router();
    let metrics: Arc<dyn McpMetrics> = Arc::new(NoopMetrics);
    let payload = vec![b' '; 64];
    let (_, response) =
        process_payload(&router, &metrics, ServerTransport::Stdio, 16, &payload);
    assert_eq!(response.error.expect("error set").code, -32070);
}

#[test]
fn malformed_json_is_rejected() {
    let router = test_router();
    let metrics: Arc<dyn McpMetrics> = Arc::new(NoopMetrics);
    let (_, response) =
        process_payload(&router, &metrics, ServerTransport::Stdio, 1024, b"{broken");
    assert_eq!(response.error.expect("error set").code, -32600);
}
