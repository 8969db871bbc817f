// crates/tracelens-mcp/src/tools/tests.rs
// ============================================================================
// Module: Tool Router Tests
// Description: Unit tests for tool dispatch and response shaping.
// Purpose: Validate argument coercion, summarization plumbing, and errors.
// Dependencies: tracelens-mcp, tracelens-client, serde_json
// ============================================================================

//! ## Overview
//! Drives the router against a stub platform API, validating query
//! construction, the fetch_runs summarization path, project simplification,
//! dataset name resolution, and fail-closed argument checks.

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

use std::sync::Arc;
use std::sync::Mutex;

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

use super::ToolError;
use super::ToolRouter;
use crate::audit::NoopAuditSink;

// ============================================================================
// SECTION: Stub Platform API
// ============================================================================

/// Stub platform API returning canned responses and recording queries.
#[derive(Default)]
struct StubApi {
    /// When set, every call fails with a 500 status error.
    fail: bool,
    /// Canned response for run queries.
    runs: Option<Value>,
    /// Canned response for project listings.
    projects: Option<Value>,
    /// Canned response for dataset listings.
    datasets: Option<Value>,
    /// Canned response for dataset reads.
    dataset: Option<Value>,
    /// Last run query observed.
    last_run_query: Mutex<Option<RunQuery>>,
    /// Last prompt query observed.
    last_prompt_query: Mutex<Option<PromptQuery>>,
    /// Last project query observed.
    last_project_query: Mutex<Option<ProjectQuery>>,
    /// Last dataset query observed.
    last_dataset_query: Mutex<Option<DatasetQuery>>,
    /// Last example query observed.
    last_example_query: Mutex<Option<ExampleQuery>>,
    /// Last dataset id read.
    last_dataset_read: Mutex<Option<String>>,
}

impl StubApi {
    /// Returns the canned value or a stub failure.
    fn respond(&self, canned: Option<&Value>) -> Result<Value, ApiError> {
        if self.fail {
            return Err(ApiError::Status {
                status: 500,
            });
        }
        Ok(canned.cloned().unwrap_or_else(|| json!({})))
    }
}

impl PlatformApi for StubApi {
    fn list_prompts(&self, query: &PromptQuery) -> Result<Value, ApiError> {
        *self.last_prompt_query.lock().unwrap() = Some(query.clone());
        self.respond(None)
    }

    fn get_prompt(&self, _prompt_name: &str) -> Result<Value, ApiError> {
        self.respond(None)
    }

    fn list_projects(&self, query: &ProjectQuery) -> Result<Value, ApiError> {
        *self.last_project_query.lock().unwrap() = Some(query.clone());
        self.respond(self.projects.as_ref())
    }

    fn query_runs(&self, query: &RunQuery) -> Result<Value, ApiError> {
        *self.last_run_query.lock().unwrap() = Some(query.clone());
        self.respond(self.runs.as_ref())
    }

    fn project_runs_stats(&self, _query: &StatsQuery) -> Result<Value, ApiError> {
        self.respond(None)
    }

    fn list_datasets(&self, query: &DatasetQuery) -> Result<Value, ApiError> {
        *self.last_dataset_query.lock().unwrap() = Some(query.clone());
        self.respond(self.datasets.as_ref())
    }

    fn read_dataset(&self, dataset_id: &str) -> Result<Value, ApiError> {
        *self.last_dataset_read.lock().unwrap() = Some(dataset_id.to_string());
        self.respond(self.dataset.as_ref())
    }

    fn list_examples(&self, query: &ExampleQuery) -> Result<Value, ApiError> {
        *self.last_example_query.lock().unwrap() = Some(query.clone());
        self.respond(None)
    }

    fn read_example(&self, _example_id: &str, _as_of: Option<&str>) -> Result<Value, ApiError> {
        self.respond(None)
    }
}

/// Builds a router over a stub API.
fn router(stub: StubApi) -> (ToolRouter, Arc<StubApi>) {
    let api = Arc::new(stub);
    let router = ToolRouter::new(api.clone(), Arc::new(NoopAuditSink));
    (router, api)
}

// ============================================================================
// SECTION: Dispatch Tests
// ============================================================================

#[test]
fn unknown_tools_are_rejected() {
    let (router, _) = router(StubApi::default());
    let err = router.handle_tool_call("fetch_trace", json!({})).expect_err("unknown rejected");
    assert!(matches!(err, ToolError::UnknownTool));
}

#[test]
fn null_arguments_mean_no_arguments() {
    let (router, api) = router(StubApi::default());
    router.handle_tool_call("list_prompts", Value::Null).expect("defaults apply");
    let query = api.last_prompt_query.lock().unwrap().clone().expect("query recorded");
    assert!(!query.is_public);
    assert_eq!(query.limit, 20);
}

// ============================================================================
// SECTION: Prompt and Stats Tests
// ============================================================================

#[test]
fn list_prompts_coerces_string_arguments() {
    let (router, api) = router(StubApi::default());
    router
        .handle_tool_call("list_prompts", json!({"is_public": "TRUE", "limit": "7"}))
        .expect("arguments coerce");
    let query = api.last_prompt_query.lock().unwrap().clone().expect("query recorded");
    assert!(query.is_public);
    assert_eq!(query.limit, 7);
}

#[test]
fn stats_require_a_selector() {
    let (router, _) = router(StubApi::default());
    let err = router
        .handle_tool_call("get_project_runs_stats", json!({}))
        .expect_err("selector required");
    assert!(matches!(err, ToolError::InvalidParams(_)));
}

#[test]
fn upstream_failures_become_error_payloads() {
    let (router, _) = router(StubApi {
        fail: true,
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call("get_prompt_by_name", json!({"prompt_name": "greeting"}))
        .expect("failure becomes payload");
    assert_eq!(result, json!({"error": "platform api returned status 500"}));
}

// ============================================================================
// SECTION: Fetch Runs Tests
// ============================================================================

/// Canned run query response with one nested run.
fn runs_response() -> Value {
    json!({
        "runs": [{
            "id": "r1",
            "name": "root",
            "inputs": {"question": {"text": "q"}},
            "outputs": {"a": {"b": {"c": 1}}},
            "tags": ["x", "y", "z"]
        }]
    })
}

#[test]
fn fetch_runs_builds_the_run_query() {
    let (router, api) = router(StubApi::default());
    router
        .handle_tool_call(
            "fetch_runs",
            json!({
                "project_name": "[\"alpha\", \"beta\"]",
                "run_type": "llm",
                "error": "true",
                "is_root": "banana",
                "limit": "10"
            }),
        )
        .expect("query builds");
    let query = api.last_run_query.lock().unwrap().clone().expect("query recorded");
    assert_eq!(query.project_names, vec!["alpha".to_string(), "beta".to_string()]);
    assert_eq!(query.run_type.as_deref(), Some("llm"));
    assert_eq!(query.error, Some(true));
    assert_eq!(query.is_root, None);
    assert_eq!(query.limit, 10);
    assert_eq!(query.order_by.as_deref(), Some("-start_time"));
}

#[test]
fn fetch_runs_summarizes_by_default() {
    let (router, _) = router(StubApi {
        runs: Some(runs_response()),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call("fetch_runs", json!({"project_name": "alpha"}))
        .expect("runs fetched");
    assert_eq!(result["count"], json!(1));
    let run = &result["runs"][0];
    assert_eq!(run["id"], json!("r1"));
    assert_eq!(run["tags"]["_type"], json!("sequence"));
    assert_eq!(run["tags"]["_field_count"], json!(3));
    assert_eq!(run["tags"]["_preview"], json!("[\"x\", \"y\", \"z\"]"));
    assert_eq!(run["outputs"]["_type"], json!("mapping"));
}

#[test]
fn fetch_runs_depth_keeps_one_level() {
    let (router, _) = router(StubApi {
        runs: Some(runs_response()),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call(
            "fetch_runs",
            json!({"project_name": "alpha", "trace_tree_depth": "1"}),
        )
        .expect("runs fetched");
    let run = &result["runs"][0];
    assert_eq!(run["outputs"]["a"]["_type"], json!("mapping"));
    assert_eq!(run["outputs"]["a"]["_preview"], json!("{\"b\": {\"c\": 1}}"));
}

#[test]
fn fetch_runs_negative_depth_clamps_to_zero() {
    let (router, _) = router(StubApi {
        runs: Some(runs_response()),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call(
            "fetch_runs",
            json!({"project_name": "alpha", "trace_tree_depth": "-3"}),
        )
        .expect("runs fetched");
    let run = &result["runs"][0];
    assert_eq!(run["outputs"]["_type"], json!("mapping"));
}

#[test]
fn fetch_runs_select_narrows_top_level_fields() {
    let (router, _) = router(StubApi {
        runs: Some(runs_response()),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call(
            "fetch_runs",
            json!({"project_name": "alpha", "select": "[\"id\", \"outputs\"]"}),
        )
        .expect("runs fetched");
    let run = result["runs"][0].as_object().expect("run object");
    let keys: Vec<&str> = run.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["id", "outputs"]);
}

#[test]
fn fetch_runs_can_disable_summarization() {
    let (router, _) = router(StubApi {
        runs: Some(runs_response()),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call(
            "fetch_runs",
            json!({"project_name": "alpha", "show_trace_tree": "false"}),
        )
        .expect("runs fetched");
    let run = &result["runs"][0];
    assert_eq!(run["outputs"], json!({"a": {"b": {"c": 1}}}));
    assert_eq!(run["tags"], json!(["x", "y", "z"]));
}

#[test]
fn fetch_runs_requires_a_project() {
    let (router, _) = router(StubApi::default());
    let err = router
        .handle_tool_call("fetch_runs", json!({"project_name": ""}))
        .expect_err("empty project rejected");
    assert!(matches!(err, ToolError::InvalidParams(_)));
}

#[test]
fn fetch_runs_reports_upstream_failure_in_payload() {
    let (router, _) = router(StubApi {
        fail: true,
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call("fetch_runs", json!({"project_name": "alpha"}))
        .expect("failure becomes payload");
    assert_eq!(result["error"], json!("platform api returned status 500"));
}

// ============================================================================
// SECTION: Project Tests
// ============================================================================

#[test]
fn list_projects_simplifies_by_default() {
    let (router, _) = router(StubApi {
        projects: Some(json!({"projects": [{
            "id": "787d5165",
            "name": "Chat-Agent",
            "extra": {"metadata": {"agent_deployment_id": "dep-123"}},
            "settings": {"big": ["nested", "payload"]}
        }]})),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call("list_projects", json!({}))
        .expect("projects listed");
    assert_eq!(
        result,
        json!({"projects": [{
            "name": "Chat-Agent",
            "project_id": "787d5165",
            "agent_deployment_id": "dep-123"
        }]})
    );
}

#[test]
fn list_projects_more_info_returns_full_records() {
    let full = json!({"projects": [{"id": "p1", "name": "Chat", "settings": {"a": 1}}]});
    let (router, api) = router(StubApi {
        projects: Some(full.clone()),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call(
            "list_projects",
            json!({"more_info": "true", "project_name": "Chat", "limit": "3"}),
        )
        .expect("projects listed");
    assert_eq!(result, full);
    let query = api.last_project_query.lock().unwrap().clone().expect("query recorded");
    assert_eq!(query.name_contains.as_deref(), Some("Chat"));
    assert_eq!(query.limit, 3);
}

// ============================================================================
// SECTION: Dataset and Example Tests
// ============================================================================

#[test]
fn list_datasets_coerces_filters() {
    let (router, api) = router(StubApi::default());
    router
        .handle_tool_call(
            "list_datasets",
            json!({
                "dataset_ids": "[\"d1\", \"d2\"]",
                "metadata": "{\"team\": \"search\"}",
                "limit": "9"
            }),
        )
        .expect("datasets listed");
    let query = api.last_dataset_query.lock().unwrap().clone().expect("query recorded");
    assert_eq!(query.dataset_ids, vec!["d1".to_string(), "d2".to_string()]);
    assert_eq!(query.metadata, Some(json!({"team": "search"})));
    assert_eq!(query.limit, 9);
}

#[test]
fn list_examples_requires_a_selector() {
    let (router, _) = router(StubApi::default());
    let err = router
        .handle_tool_call("list_examples", json!({}))
        .expect_err("selector required");
    assert!(matches!(err, ToolError::InvalidParams(_)));
}

#[test]
fn list_examples_example_ids_take_precedence() {
    let (router, api) = router(StubApi::default());
    router
        .handle_tool_call(
            "list_examples",
            json!({
                "example_ids": "[\"e1\"]",
                "dataset_id": "d1",
                "dataset_name": "eval-set"
            }),
        )
        .expect("examples listed");
    let query = api.last_example_query.lock().unwrap().clone().expect("query recorded");
    assert_eq!(query.example_ids, vec!["e1".to_string()]);
    assert_eq!(query.dataset_id, None);
    assert_eq!(query.dataset_name, None);
}

#[test]
fn read_dataset_resolves_names_through_the_listing() {
    let (router, api) = router(StubApi {
        datasets: Some(json!({"datasets": [{"id": "d-42", "name": "eval-set"}]})),
        dataset: Some(json!({"id": "d-42", "name": "eval-set", "data_type": "kv"})),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call("read_dataset", json!({"dataset_name": "eval-set"}))
        .expect("dataset read");
    assert_eq!(result["id"], json!("d-42"));
    assert_eq!(api.last_dataset_read.lock().unwrap().clone(), Some("d-42".to_string()));
    let query = api.last_dataset_query.lock().unwrap().clone().expect("query recorded");
    assert_eq!(query.dataset_name.as_deref(), Some("eval-set"));
    assert_eq!(query.limit, 1);
}

#[test]
fn read_dataset_reports_unknown_names() {
    let (router, _) = router(StubApi {
        datasets: Some(json!({"datasets": []})),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call("read_dataset", json!({"dataset_name": "absent"}))
        .expect("missing dataset becomes payload");
    assert_eq!(result, json!({"error": "dataset not found: absent"}));
}

#[test]
fn read_dataset_requires_a_selector() {
    let (router, _) = router(StubApi::default());
    let err = router
        .handle_tool_call("read_dataset", json!({}))
        .expect_err("selector required");
    assert!(matches!(err, ToolError::InvalidParams(_)));
}

// ============================================================================
// SECTION: Thread History Tests
// ============================================================================

#[test]
fn thread_history_extracts_messages_oldest_first() {
    let (router, api) = router(StubApi {
        runs: Some(json!({"runs": [{
            "id": "r-latest",
            "inputs": {"messages": [
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"}
            ]},
            "outputs": {"role": "assistant", "content": "bye"}
        }]})),
        ..StubApi::default()
    });
    let result = router
        .handle_tool_call(
            "get_thread_history",
            json!({"thread_id": "t-9", "project_name": "alpha"}),
        )
        .expect("history built");
    assert_eq!(result["thread_id"], json!("t-9"));
    let history = result["history"].as_array().expect("history array");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["content"], json!("hi"));
    assert_eq!(history[2]["content"], json!("bye"));
    let query = api.last_run_query.lock().unwrap().clone().expect("query recorded");
    assert_eq!(query.is_root, Some(true));
    assert!(query.filter.as_deref().is_some_and(|filter| filter.contains("t-9")));
}

#[test]
fn thread_history_requires_identifiers() {
    let (router, _) = router(StubApi::default());
    let err = router
        .handle_tool_call("get_thread_history", json!({"thread_id": "", "project_name": "p"}))
        .expect_err("empty thread rejected");
    assert!(matches!(err, ToolError::InvalidParams(_)));
}
