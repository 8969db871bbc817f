// crates/tracelens-mcp/src/tools.rs
// ============================================================================
// Module: MCP Tool Router
// Description: Tool routing for the TraceLens MCP server.
// Purpose: Expose thin wrappers over the platform API client.
// Dependencies: tracelens-client, tracelens-core, serde, serde_json
// ============================================================================

//! ## Overview
//! The tool router dispatches MCP tool calls to the platform API client. All
//! tool handlers are thin wrappers over [`tracelens_client::PlatformApi`];
//! the run-fetching tool additionally narrows and summarizes run records
//! through [`tracelens_core`].
//!
//! ## Layer Responsibilities
//! - Coerce string-typed MCP arguments into typed queries.
//! - Route tool calls to platform operations and shape responses.
//! - Emit audit events for tool invocations.
//!
//! ## Invariants
//! - Upstream platform failures surface as `{"error": ...}` payloads, never
//!   as protocol failures.
//! - Responses are deterministic for identical inputs and upstream data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Instant;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;
use tracelens_client::ApiError;
use tracelens_client::DatasetQuery;
use tracelens_client::ExampleQuery;
use tracelens_client::PlatformApi;
use tracelens_client::ProjectQuery;
use tracelens_client::PromptQuery;
use tracelens_client::RunQuery;
use tracelens_client::StatsQuery;
use tracelens_core::clamp_depth;
use tracelens_core::select_fields;
use tracelens_core::summarize_record;

use crate::audit::AuditSink;
use crate::audit::ToolCallEvent;
use crate::params::NumberArg;
use crate::params::ParamError;
use crate::params::parse_bool_flag;
use crate::params::parse_count;
use crate::params::parse_json_object;
use crate::params::parse_number;
use crate::params::parse_opt_bool;
use crate::params::parse_opt_count;
use crate::params::parse_string_list;
use crate::telemetry::McpOutcome;
use crate::tooling::ToolDefinition;
use crate::tooling::ToolName;
use crate::tooling::tool_definitions;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default page size for prompt listings.
const DEFAULT_PROMPT_LIMIT: usize = 20;
/// Default page size for run queries.
const DEFAULT_RUN_LIMIT: usize = 50;
/// Default page size for project listings.
const DEFAULT_PROJECT_LIMIT: usize = 5;
/// Default page size for dataset listings.
const DEFAULT_DATASET_LIMIT: usize = 20;
/// Maximum page size for list-style tools.
const MAX_LIST_LIMIT: usize = 1000;
/// Default sort order for run queries.
const DEFAULT_RUN_ORDER: &str = "-start_time";
/// Maximum runs fetched when reconstructing a thread's history.
const THREAD_HISTORY_RUN_LIMIT: usize = 50;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Tool routing errors surfaced as JSON-RPC failures.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool does not exist.
    #[error("unknown tool")]
    UnknownTool,
    /// The caller is not authenticated.
    #[error("unauthenticated: {0}")]
    Unauthenticated(String),
    /// The tool arguments are malformed.
    #[error("invalid tool params: {0}")]
    InvalidParams(String),
    /// Response serialization failed.
    #[error("serialization failed")]
    Serialization,
    /// An unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Returns a stable label for audit events.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownTool => "unknown_tool",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::InvalidParams(_) => "invalid_params",
            Self::Serialization => "serialization",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ParamError> for ToolError {
    fn from(err: ParamError) -> Self {
        Self::InvalidParams(err.to_string())
    }
}

// ============================================================================
// SECTION: Tool Router
// ============================================================================

/// Tool router for MCP requests.
#[derive(Clone)]
pub struct ToolRouter {
    /// Platform API surface behind the tools.
    api: Arc<dyn PlatformApi>,
    /// Audit sink for tool invocations.
    audit: Arc<dyn AuditSink>,
}

impl ToolRouter {
    /// Creates a router over a platform API and audit sink.
    #[must_use]
    pub fn new(api: Arc<dyn PlatformApi>, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            api,
            audit,
        }
    }

    /// Returns the canonical tool definitions for tools/list.
    #[must_use]
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        tool_definitions()
    }

    /// Dispatches one tool call by wire name.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError`] for unknown tools and malformed arguments.
    /// Upstream platform failures are reported inside the result payload.
    pub fn handle_tool_call(&self, name: &str, arguments: Value) -> Result<Value, ToolError> {
        let Some(tool) = ToolName::parse(name) else {
            return Err(ToolError::UnknownTool);
        };
        let arguments = if arguments.is_null() {
            Value::Object(serde_json::Map::new())
        } else {
            arguments
        };
        let started = Instant::now();
        let result = self.dispatch(tool, arguments);
        let outcome = if result.is_ok() { McpOutcome::Ok } else { McpOutcome::Error };
        let error_kind = result.as_ref().err().map(ToolError::kind);
        self.audit.record(&ToolCallEvent::new(
            tool,
            outcome,
            started.elapsed().as_millis(),
            error_kind,
        ));
        result
    }

    /// Routes a resolved tool to its handler.
    fn dispatch(&self, tool: ToolName, arguments: Value) -> Result<Value, ToolError> {
        match tool {
            ToolName::ListPrompts => self.handle_list_prompts(arguments),
            ToolName::GetPromptByName => self.handle_get_prompt_by_name(arguments),
            ToolName::GetThreadHistory => self.handle_get_thread_history(arguments),
            ToolName::GetProjectRunsStats => self.handle_get_project_runs_stats(arguments),
            ToolName::FetchRuns => self.handle_fetch_runs(arguments),
            ToolName::ListProjects => self.handle_list_projects(arguments),
            ToolName::ListDatasets => self.handle_list_datasets(arguments),
            ToolName::ListExamples => self.handle_list_examples(arguments),
            ToolName::ReadDataset => self.handle_read_dataset(arguments),
            ToolName::ReadExample => self.handle_read_example(arguments),
        }
    }

    /// Handles prompt listing requests.
    fn handle_list_prompts(&self, payload: Value) -> Result<Value, ToolError> {
        let request: ListPromptsRequest = decode(payload)?;
        let query = PromptQuery {
            is_public: parse_bool_flag(request.is_public.as_deref(), false),
            limit: parse_count("limit", request.limit.as_ref(), DEFAULT_PROMPT_LIMIT)?
                .min(MAX_LIST_LIMIT),
        };
        Ok(self.api.list_prompts(&query).unwrap_or_else(|err| error_payload(&err)))
    }

    /// Handles prompt read requests.
    fn handle_get_prompt_by_name(&self, payload: Value) -> Result<Value, ToolError> {
        let request: GetPromptRequest = decode(payload)?;
        if request.prompt_name.is_empty() {
            return Err(ToolError::InvalidParams("prompt_name must not be empty".to_string()));
        }
        Ok(self
            .api
            .get_prompt(&request.prompt_name)
            .unwrap_or_else(|err| error_payload(&err)))
    }

    /// Handles thread history requests.
    fn handle_get_thread_history(&self, payload: Value) -> Result<Value, ToolError> {
        let request: GetThreadHistoryRequest = decode(payload)?;
        if request.thread_id.is_empty() || request.project_name.is_empty() {
            return Err(ToolError::InvalidParams(
                "thread_id and project_name must not be empty".to_string(),
            ));
        }
        let query = RunQuery {
            project_names: vec![request.project_name],
            is_root: Some(true),
            filter: Some(thread_filter(&request.thread_id)),
            order_by: Some(DEFAULT_RUN_ORDER.to_string()),
            limit: THREAD_HISTORY_RUN_LIMIT,
            ..RunQuery::default()
        };
        match self.api.query_runs(&query) {
            Ok(response) => {
                let runs = collection_from_response(response, "runs");
                Ok(thread_history_from_runs(&request.thread_id, &runs))
            }
            Err(err) => Ok(error_payload(&err)),
        }
    }

    /// Handles run statistics requests.
    fn handle_get_project_runs_stats(&self, payload: Value) -> Result<Value, ToolError> {
        let request: StatsRequest = decode(payload)?;
        if request.project_name.is_none() && request.trace_id.is_none() {
            return Err(ToolError::InvalidParams(
                "project_name or trace_id is required".to_string(),
            ));
        }
        let query = StatsQuery {
            project_name: request.project_name,
            trace_id: request.trace_id,
        };
        Ok(self.api.project_runs_stats(&query).unwrap_or_else(|err| error_payload(&err)))
    }

    /// Handles run fetch requests, including trace-tree summarization.
    fn handle_fetch_runs(&self, payload: Value) -> Result<Value, ToolError> {
        let request: FetchRunsRequest = decode(payload)?;
        let project_names =
            parse_string_list(Some(request.project_name.as_str())).unwrap_or_default();
        if project_names.is_empty() {
            return Err(ToolError::InvalidParams("project_name must not be empty".to_string()));
        }
        let select = parse_string_list(request.select.as_deref());
        let show_trace_tree = parse_bool_flag(request.show_trace_tree.as_deref(), true);
        let depth = clamp_depth(parse_number(
            "trace_tree_depth",
            request.trace_tree_depth.as_ref(),
            0,
        )?);
        let query = RunQuery {
            project_names,
            trace_id: request.trace_id,
            run_type: request.run_type,
            dataset_name: request.dataset_name,
            reference_example_id: request.reference_example_id,
            parent_run_id: request.parent_run_id,
            error: parse_opt_bool(request.error.as_deref()),
            run_ids: parse_string_list(request.run_ids.as_deref()),
            is_root: parse_opt_bool(request.is_root.as_deref()),
            filter: request.filter,
            trace_filter: request.trace_filter,
            tree_filter: request.tree_filter,
            order_by: Some(
                request.order_by.unwrap_or_else(|| DEFAULT_RUN_ORDER.to_string()),
            ),
            limit: parse_count("limit", request.limit.as_ref(), DEFAULT_RUN_LIMIT)?
                .min(MAX_LIST_LIMIT),
        };
        match self.api.query_runs(&query) {
            Ok(response) => {
                let runs = collection_from_response(response, "runs");
                let projected: Vec<Value> = runs
                    .into_iter()
                    .map(|run| project_run(run, select.as_deref(), show_trace_tree, depth))
                    .collect();
                let count = projected.len();
                Ok(json!({ "runs": projected, "count": count }))
            }
            Err(err) => Ok(error_payload(&err)),
        }
    }

    /// Handles project listing requests.
    fn handle_list_projects(&self, payload: Value) -> Result<Value, ToolError> {
        let request: ListProjectsRequest = decode(payload)?;
        let more_info = parse_bool_flag(request.more_info.as_deref(), false);
        let query = ProjectQuery {
            name_contains: request.project_name,
            limit: parse_count("limit", request.limit.as_ref(), DEFAULT_PROJECT_LIMIT)?
                .min(MAX_LIST_LIMIT),
        };
        match self.api.list_projects(&query) {
            Ok(response) => {
                let projects = collection_from_response(response, "projects");
                let listed: Vec<Value> = if more_info {
                    projects
                } else {
                    projects.iter().map(simplify_project).collect()
                };
                Ok(json!({ "projects": listed }))
            }
            Err(err) => Ok(error_payload(&err)),
        }
    }

    /// Handles dataset listing requests.
    fn handle_list_datasets(&self, payload: Value) -> Result<Value, ToolError> {
        let request: ListDatasetsRequest = decode(payload)?;
        let query = DatasetQuery {
            dataset_ids: parse_string_list(request.dataset_ids.as_deref()).unwrap_or_default(),
            data_type: request.data_type,
            dataset_name: request.dataset_name,
            dataset_name_contains: request.dataset_name_contains,
            metadata: parse_json_object(request.metadata.as_deref()),
            limit: parse_count("limit", request.limit.as_ref(), DEFAULT_DATASET_LIMIT)?
                .min(MAX_LIST_LIMIT),
        };
        Ok(self.api.list_datasets(&query).unwrap_or_else(|err| error_payload(&err)))
    }

    /// Handles example listing requests.
    fn handle_list_examples(&self, payload: Value) -> Result<Value, ToolError> {
        let request: ListExamplesRequest = decode(payload)?;
        let example_ids = parse_string_list(request.example_ids.as_deref()).unwrap_or_default();
        if example_ids.is_empty()
            && request.dataset_id.is_none()
            && request.dataset_name.is_none()
        {
            return Err(ToolError::InvalidParams(
                "example_ids, dataset_id, or dataset_name is required".to_string(),
            ));
        }
        // Precedence: example_ids, then dataset_id, then dataset_name.
        let (dataset_id, dataset_name) = if example_ids.is_empty() {
            match request.dataset_id {
                Some(id) => (Some(id), None),
                None => (None, request.dataset_name),
            }
        } else {
            (None, None)
        };
        let query = ExampleQuery {
            dataset_id,
            dataset_name,
            example_ids,
            filter: request.filter,
            metadata: parse_json_object(request.metadata.as_deref()),
            splits: parse_string_list(request.splits.as_deref()).unwrap_or_default(),
            inline_s3_urls: parse_opt_bool(request.inline_s3_urls.as_deref()),
            include_attachments: parse_opt_bool(request.include_attachments.as_deref()),
            as_of: request.as_of,
            limit: parse_opt_count("limit", request.limit.as_ref())?,
            offset: parse_opt_count("offset", request.offset.as_ref())?,
        };
        Ok(self.api.list_examples(&query).unwrap_or_else(|err| error_payload(&err)))
    }

    /// Handles dataset read requests, resolving names through the listing.
    fn handle_read_dataset(&self, payload: Value) -> Result<Value, ToolError> {
        let request: ReadDatasetRequest = decode(payload)?;
        if let Some(dataset_id) = request.dataset_id.filter(|id| !id.is_empty()) {
            return Ok(self
                .api
                .read_dataset(&dataset_id)
                .unwrap_or_else(|err| error_payload(&err)));
        }
        let Some(dataset_name) = request.dataset_name.filter(|name| !name.is_empty()) else {
            return Err(ToolError::InvalidParams(
                "dataset_id or dataset_name is required".to_string(),
            ));
        };
        let query = DatasetQuery {
            dataset_name: Some(dataset_name.clone()),
            limit: 1,
            ..DatasetQuery::default()
        };
        match self.api.list_datasets(&query) {
            Ok(response) => {
                let datasets = collection_from_response(response, "datasets");
                let resolved = datasets
                    .first()
                    .and_then(|dataset| dataset.get("id"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                resolved.map_or_else(
                    || Ok(json!({ "error": format!("dataset not found: {dataset_name}") })),
                    |dataset_id| {
                        Ok(self
                            .api
                            .read_dataset(&dataset_id)
                            .unwrap_or_else(|err| error_payload(&err)))
                    },
                )
            }
            Err(err) => Ok(error_payload(&err)),
        }
    }

    /// Handles example read requests.
    fn handle_read_example(&self, payload: Value) -> Result<Value, ToolError> {
        let request: ReadExampleRequest = decode(payload)?;
        if request.example_id.is_empty() {
            return Err(ToolError::InvalidParams("example_id must not be empty".to_string()));
        }
        Ok(self
            .api
            .read_example(&request.example_id, request.as_of.as_deref())
            .unwrap_or_else(|err| error_payload(&err)))
    }
}

// ============================================================================
// SECTION: Tool Requests
// ============================================================================

/// Arguments for `list_prompts`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListPromptsRequest {
    /// Prompt visibility flag.
    is_public: Option<String>,
    /// Page size.
    limit: Option<NumberArg>,
}

/// Arguments for `get_prompt_by_name`.
#[derive(Debug, Deserialize)]
struct GetPromptRequest {
    /// Exact prompt name.
    prompt_name: String,
}

/// Arguments for `get_thread_history`.
#[derive(Debug, Deserialize)]
struct GetThreadHistoryRequest {
    /// Thread identifier.
    thread_id: String,
    /// Project containing the thread.
    project_name: String,
}

/// Arguments for `get_project_runs_stats`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct StatsRequest {
    /// Project selector.
    project_name: Option<String>,
    /// Trace selector (preferred).
    trace_id: Option<String>,
}

/// Arguments for `fetch_runs`.
#[derive(Debug, Deserialize)]
struct FetchRunsRequest {
    /// Project name, or JSON array string of names.
    project_name: String,
    /// Trace constraint.
    #[serde(default)]
    trace_id: Option<String>,
    /// Run type constraint.
    #[serde(default)]
    run_type: Option<String>,
    /// Dataset constraint.
    #[serde(default)]
    dataset_name: Option<String>,
    /// Dataset example constraint.
    #[serde(default)]
    reference_example_id: Option<String>,
    /// Parent run constraint.
    #[serde(default)]
    parent_run_id: Option<String>,
    /// Error presence flag.
    #[serde(default)]
    error: Option<String>,
    /// Run id, or JSON array string of run ids.
    #[serde(default)]
    run_ids: Option<String>,
    /// Root-run flag.
    #[serde(default)]
    is_root: Option<String>,
    /// Opaque run filter.
    #[serde(default)]
    filter: Option<String>,
    /// Opaque trace-root filter.
    #[serde(default)]
    trace_filter: Option<String>,
    /// Opaque trace-tree filter.
    #[serde(default)]
    tree_filter: Option<String>,
    /// Sort order.
    #[serde(default)]
    order_by: Option<String>,
    /// Page size.
    #[serde(default)]
    limit: Option<NumberArg>,
    /// Top-level field selection, as a JSON array string.
    #[serde(default)]
    select: Option<String>,
    /// Trace-tree summarization flag.
    #[serde(default)]
    show_trace_tree: Option<String>,
    /// Detail depth for trace-tree summarization.
    #[serde(default)]
    trace_tree_depth: Option<NumberArg>,
}

/// Arguments for `list_projects`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListProjectsRequest {
    /// Page size.
    limit: Option<NumberArg>,
    /// Substring filter on project names.
    project_name: Option<String>,
    /// Full-detail flag.
    more_info: Option<String>,
}

/// Arguments for `list_datasets`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListDatasetsRequest {
    /// Dataset id, or JSON array string of ids.
    dataset_ids: Option<String>,
    /// Data type filter.
    data_type: Option<String>,
    /// Exact name filter.
    dataset_name: Option<String>,
    /// Substring name filter.
    dataset_name_contains: Option<String>,
    /// Metadata filter, as a JSON object string.
    metadata: Option<String>,
    /// Page size.
    limit: Option<NumberArg>,
}

/// Arguments for `list_examples`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ListExamplesRequest {
    /// Dataset id selector.
    dataset_id: Option<String>,
    /// Dataset name selector.
    dataset_name: Option<String>,
    /// Example id, or JSON array string of ids.
    example_ids: Option<String>,
    /// Opaque example filter.
    filter: Option<String>,
    /// Metadata filter, as a JSON object string.
    metadata: Option<String>,
    /// Split name, or JSON array string of names.
    splits: Option<String>,
    /// Inline object-store URLs flag.
    inline_s3_urls: Option<String>,
    /// Include attachments flag.
    include_attachments: Option<String>,
    /// Dataset version selector.
    as_of: Option<String>,
    /// Page size.
    limit: Option<NumberArg>,
    /// Page offset.
    offset: Option<NumberArg>,
}

/// Arguments for `read_dataset`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ReadDatasetRequest {
    /// Dataset id selector (takes precedence).
    dataset_id: Option<String>,
    /// Dataset name selector.
    dataset_name: Option<String>,
}

/// Arguments for `read_example`.
#[derive(Debug, Deserialize)]
struct ReadExampleRequest {
    /// Example id to read.
    example_id: String,
    /// Dataset version selector.
    #[serde(default)]
    as_of: Option<String>,
}

// ============================================================================
// SECTION: Response Shaping
// ============================================================================

/// Decodes a tool argument payload into a typed request.
fn decode<T: DeserializeOwned>(payload: Value) -> Result<T, ToolError> {
    serde_json::from_value(payload).map_err(|err| ToolError::InvalidParams(err.to_string()))
}

/// Builds the error payload reported for upstream failures.
fn error_payload(err: &ApiError) -> Value {
    json!({ "error": err.to_string() })
}

/// Extracts a named collection from a platform response.
///
/// Accepts both enveloped (`{"runs": [...]}`) and bare-array responses.
/// Unexpected shapes yield an empty collection.
fn collection_from_response(response: Value, key: &str) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(key) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Applies field selection and trace-tree summarization to one run.
fn project_run(run: Value, select: Option<&[String]>, show_trace_tree: bool, depth: usize) -> Value {
    match run {
        Value::Object(record) => {
            let selected = select_fields(&record, select);
            if show_trace_tree {
                Value::Object(summarize_record(&selected, depth))
            } else {
                Value::Object(selected)
            }
        }
        other => other,
    }
}

/// Builds the metadata filter expression matching a thread id.
fn thread_filter(thread_id: &str) -> String {
    format!(
        "and(in(metadata_key, [\"session_id\", \"conversation_id\", \"thread_id\"]), \
         eq(metadata_value, \"{thread_id}\"))"
    )
}

/// Reconstructs a thread's message history from its root runs.
///
/// The most recent root run carries the full conversation: its input
/// messages, oldest first, followed by the final output payload.
fn thread_history_from_runs(thread_id: &str, runs: &[Value]) -> Value {
    let mut history: Vec<Value> = Vec::new();
    if let Some(run) = runs.first().and_then(Value::as_object) {
        if let Some(messages) = run
            .get("inputs")
            .and_then(|inputs| inputs.get("messages"))
            .and_then(Value::as_array)
        {
            history.extend(messages.iter().cloned());
        }
        if let Some(outputs) = run.get("outputs").filter(|outputs| !outputs.is_null()) {
            history.push(outputs.clone());
        }
    }
    json!({ "thread_id": thread_id, "history": history })
}

/// Projects a full project record onto the simplified listing shape.
fn simplify_project(project: &Value) -> Value {
    let mut simplified = serde_json::Map::new();
    if let Some(name) = project.get("name") {
        simplified.insert("name".to_string(), name.clone());
    }
    if let Some(id) = project.get("id") {
        simplified.insert("project_id".to_string(), id.clone());
    }
    if let Some(deployment) = deployment_id(project) {
        simplified.insert("agent_deployment_id".to_string(), deployment);
    }
    Value::Object(simplified)
}

/// Extracts a deployment id from a project record when present.
fn deployment_id(project: &Value) -> Option<Value> {
    project
        .get("agent_deployment_id")
        .cloned()
        .or_else(|| project.pointer("/extra/metadata/agent_deployment_id").cloned())
        .filter(|value| !value.is_null())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
