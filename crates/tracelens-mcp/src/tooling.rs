// crates/tracelens-mcp/src/tooling.rs
// ============================================================================
// Module: MCP Tool Contracts
// Description: Canonical tool definitions and input schemas for TraceLens.
// Purpose: Drive MCP tool listings and CLI contract output.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the canonical MCP tool surface: stable names, client
//! descriptions, and strict input schemas. The order of definitions is
//! intentional and preserved in listings to keep diffs stable; append new
//! tools at the end.
//!
//! Arguments follow the platform's string conventions: booleans as
//! `"true"`/`"false"`, integers as decimal strings (native numbers are also
//! accepted), lists as JSON-array strings, metadata as JSON-object strings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Tool Names
// ============================================================================

/// Stable MCP tool names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    /// List prompts with visibility filtering.
    ListPrompts,
    /// Read one prompt by exact name.
    GetPromptByName,
    /// Reconstruct a conversation thread's message history.
    GetThreadHistory,
    /// Aggregate run statistics for a project or trace.
    GetProjectRunsStats,
    /// Query runs with filters and trace-tree summarization.
    FetchRuns,
    /// List tracing projects.
    ListProjects,
    /// List datasets with filters.
    ListDatasets,
    /// List dataset examples with filters.
    ListExamples,
    /// Read one dataset by id or name.
    ReadDataset,
    /// Read one example by id.
    ReadExample,
}

/// All tools in canonical listing order.
pub const ALL_TOOLS: [ToolName; 10] = [
    ToolName::ListPrompts,
    ToolName::GetPromptByName,
    ToolName::GetThreadHistory,
    ToolName::GetProjectRunsStats,
    ToolName::FetchRuns,
    ToolName::ListProjects,
    ToolName::ListDatasets,
    ToolName::ListExamples,
    ToolName::ReadDataset,
    ToolName::ReadExample,
];

impl ToolName {
    /// Returns the stable wire name of the tool.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListPrompts => "list_prompts",
            Self::GetPromptByName => "get_prompt_by_name",
            Self::GetThreadHistory => "get_thread_history",
            Self::GetProjectRunsStats => "get_project_runs_stats",
            Self::FetchRuns => "fetch_runs",
            Self::ListProjects => "list_projects",
            Self::ListDatasets => "list_datasets",
            Self::ListExamples => "list_examples",
            Self::ReadDataset => "read_dataset",
            Self::ReadExample => "read_example",
        }
    }

    /// Resolves a wire name to a tool, if known.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        ALL_TOOLS.into_iter().find(|tool| tool.as_str() == name)
    }
}

// ============================================================================
// SECTION: Tool Definitions
// ============================================================================

/// Tool definition shape used by MCP tool listings.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    /// MCP tool name.
    pub name: ToolName,
    /// Tool description for clients.
    pub description: String,
    /// JSON schema for tool input.
    pub input_schema: Value,
}

/// Returns the canonical tool definitions in listing order.
#[must_use]
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        list_prompts_definition(),
        get_prompt_by_name_definition(),
        get_thread_history_definition(),
        get_project_runs_stats_definition(),
        fetch_runs_definition(),
        list_projects_definition(),
        list_datasets_definition(),
        list_examples_definition(),
        read_dataset_definition(),
        read_example_definition(),
    ]
}

/// Builds the definition for `list_prompts`.
fn list_prompts_definition() -> ToolDefinition {
    build_definition(
        ToolName::ListPrompts,
        "Fetch prompts with optional visibility filtering. is_public selects public (\"true\") \
         or private (\"false\", default) prompts.",
        tool_input_schema(
            &json!({
                "is_public": bool_string_property("Prompt visibility: \"true\" for public, \"false\" for private."),
                "limit": count_property("Maximum number of prompts to return (default 20).")
            }),
            &[],
        ),
    )
}

/// Builds the definition for `get_prompt_by_name`.
fn get_prompt_by_name_definition() -> ToolDefinition {
    build_definition(
        ToolName::GetPromptByName,
        "Get a specific prompt by its exact name, including the prompt template.",
        tool_input_schema(
            &json!({
                "prompt_name": string_property("Exact name of the prompt to retrieve.")
            }),
            &["prompt_name"],
        ),
    )
}

/// Builds the definition for `get_thread_history`.
fn get_thread_history_definition() -> ToolDefinition {
    build_definition(
        ToolName::GetThreadHistory,
        "Retrieve the message history for a conversation thread, oldest first.",
        tool_input_schema(
            &json!({
                "thread_id": string_property("Unique id of the thread to fetch history for."),
                "project_name": string_property("Name of the project containing the thread.")
            }),
            &["thread_id", "project_name"],
        ),
    )
}

/// Builds the definition for `get_project_runs_stats`.
fn get_project_runs_stats_definition() -> ToolDefinition {
    build_definition(
        ToolName::GetProjectRunsStats,
        "Get run statistics for a project or a single trace. Provide project_name or trace_id; \
         trace_id is preferred when both are set.",
        tool_input_schema(
            &json!({
                "project_name": string_property("Name of the project to analyze."),
                "trace_id": string_property("Specific trace id to analyze (preferred).")
            }),
            &[],
        ),
    )
}

/// Builds the definition for `fetch_runs`.
fn fetch_runs_definition() -> ToolDefinition {
    build_definition(
        ToolName::FetchRuns,
        "Fetch runs (traces, tools, chains) from one or more projects using flexible filters and \
         opaque filter expressions. With show_trace_tree enabled (default), nested run content \
         is replaced by summary nodes (_type, _field_count, _character_count, _preview); \
         trace_tree_depth controls how many levels stay fully expanded.",
        tool_input_schema(
            &json!({
                "project_name": string_property("Project name, or JSON array string of project names."),
                "trace_id": string_property("Return only runs belonging to this trace tree."),
                "run_type": string_property("Filter runs by type, e.g. \"llm\", \"chain\", \"tool\"."),
                "dataset_name": string_property("Return runs associated with this dataset."),
                "reference_example_id": string_property("Return runs linked to this dataset example."),
                "parent_run_id": string_property("Return children of this run."),
                "error": bool_string_property("\"true\" for errored runs, \"false\" for successful runs."),
                "run_ids": string_property("Run id, or JSON array string of run ids. Other filters are ignored when set."),
                "is_root": bool_string_property("\"true\" for only root runs, \"false\" to exclude roots."),
                "filter": string_property("Opaque filter expression applied to each run."),
                "trace_filter": string_property("Opaque filter expression applied to the root run of each trace."),
                "tree_filter": string_property("Opaque filter expression applied to any run in each trace tree."),
                "order_by": string_property("Sort field, prefixed with \"-\" for descending (default \"-start_time\")."),
                "limit": count_property("Maximum number of runs to return (default 50)."),
                "select": string_property("JSON array string of top-level fields to return."),
                "show_trace_tree": bool_string_property("Summarize nested content into summary nodes (default \"true\")."),
                "trace_tree_depth": count_property("Levels of nested content to keep before summarizing (default 0).")
            }),
            &["project_name"],
        ),
    )
}

/// Builds the definition for `list_projects`.
fn list_projects_definition() -> ToolDefinition {
    build_definition(
        ToolName::ListProjects,
        "List tracing projects. By default returns simplified entries (name, project_id, and \
         deployment id when present); more_info returns full project records.",
        tool_input_schema(
            &json!({
                "limit": count_property("Maximum number of projects to return (default 5)."),
                "project_name": string_property("Substring filter on project names."),
                "more_info": bool_string_property("\"true\" for full project records (default \"false\").")
            }),
            &[],
        ),
    )
}

/// Builds the definition for `list_datasets`.
fn list_datasets_definition() -> ToolDefinition {
    build_definition(
        ToolName::ListDatasets,
        "Fetch datasets. With no filters, all datasets are returned up to the limit.",
        tool_input_schema(
            &json!({
                "dataset_ids": string_property("Dataset id, or JSON array string of dataset ids."),
                "data_type": string_property("Filter by dataset data type, e.g. \"chat\", \"kv\"."),
                "dataset_name": string_property("Filter by exact dataset name."),
                "dataset_name_contains": string_property("Substring filter on dataset names."),
                "metadata": string_property("JSON object string of metadata the datasets must carry."),
                "limit": count_property("Maximum number of datasets to return (default 20).")
            }),
            &[],
        ),
    )
}

/// Builds the definition for `list_examples`.
fn list_examples_definition() -> ToolDefinition {
    build_definition(
        ToolName::ListExamples,
        "Fetch examples from a dataset. Provide example_ids, dataset_id, or dataset_name; they \
         are used in that order of precedence.",
        tool_input_schema(
            &json!({
                "dataset_id": string_property("Dataset id to retrieve examples from."),
                "dataset_name": string_property("Dataset name to retrieve examples from."),
                "example_ids": string_property("Example id, or JSON array string of example ids."),
                "filter": string_property("Opaque filter expression applied to examples."),
                "metadata": string_property("JSON object string of metadata the examples must carry."),
                "splits": string_property("Split name, or JSON array string of split names."),
                "inline_s3_urls": bool_string_property("Inline object-store URLs into payloads."),
                "include_attachments": bool_string_property("Include example attachments in payloads."),
                "as_of": string_property("Dataset version tag or ISO timestamp to read as of."),
                "limit": count_property("Maximum number of examples to return."),
                "offset": count_property("Number of examples to skip.")
            }),
            &[],
        ),
    )
}

/// Builds the definition for `read_dataset`.
fn read_dataset_definition() -> ToolDefinition {
    build_definition(
        ToolName::ReadDataset,
        "Read a specific dataset. Provide dataset_id or dataset_name; dataset_id takes \
         precedence when both are set.",
        tool_input_schema(
            &json!({
                "dataset_id": string_property("Dataset id to retrieve."),
                "dataset_name": string_property("Dataset name to retrieve.")
            }),
            &[],
        ),
    )
}

/// Builds the definition for `read_example`.
fn read_example_definition() -> ToolDefinition {
    build_definition(
        ToolName::ReadExample,
        "Read a specific dataset example by id, optionally as of a dataset version.",
        tool_input_schema(
            &json!({
                "example_id": string_property("Example id to retrieve."),
                "as_of": string_property("Dataset version tag or ISO timestamp to read as of.")
            }),
            &["example_id"],
        ),
    )
}

// ============================================================================
// SECTION: Schema Helpers
// ============================================================================

/// Builds a tool definition from its parts.
fn build_definition(name: ToolName, description: &str, input_schema: Value) -> ToolDefinition {
    ToolDefinition {
        name,
        description: description.to_string(),
        input_schema,
    }
}

/// Builds a standard tool input schema wrapper.
fn tool_input_schema(properties: &Value, required: &[&str]) -> Value {
    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}

/// Builds a plain string property schema.
fn string_property(description: &str) -> Value {
    json!({ "type": "string", "description": description })
}

/// Builds a string property schema for `"true"`/`"false"` flags.
fn bool_string_property(description: &str) -> Value {
    json!({ "type": "string", "enum": ["true", "false"], "description": description })
}

/// Builds a property schema for counts accepted as strings or numbers.
fn count_property(description: &str) -> Value {
    json!({ "type": ["string", "integer"], "description": description })
}

// ============================================================================
// SECTION: Tests
// ============================================================================
