// crates/tracelens-client/src/requests.rs
// ============================================================================
// Module: Platform API Requests
// Description: Typed request payloads for platform API operations.
// Purpose: Keep wire shapes explicit and unit-testable without a network.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Query payloads are plain serializable structs. POST bodies serialize with
//! absent filters omitted; GET queries build deterministic key/value pairs.
//! Filter expressions stay opaque strings passed through to the platform.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Run Queries
// ============================================================================

/// Filters for the run query endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunQuery {
    /// Project names to query.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_names: Vec<String>,
    /// Restrict to runs belonging to one trace tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Restrict to one run type (for example "llm", "chain", "tool").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_type: Option<String>,
    /// Restrict to runs associated with a dataset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_name: Option<String>,
    /// Restrict to runs linked to a specific dataset example.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_example_id: Option<String>,
    /// Restrict to direct children of one run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_run_id: Option<String>,
    /// Restrict by error presence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    /// Fetch runs by id; the platform ignores other filters when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_ids: Option<Vec<String>>,
    /// Restrict to root runs, or exclude them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_root: Option<bool>,
    /// Opaque filter expression.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Opaque filter applied to the root run of each trace.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_filter: Option<String>,
    /// Opaque filter applied to any run in each trace tree.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_filter: Option<String>,
    /// Sort field, prefixed with "-" for descending order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<String>,
    /// Maximum number of runs returned.
    pub limit: usize,
}

/// Selector for the run statistics endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsQuery {
    /// Project to aggregate over.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    /// Trace to aggregate over; preferred when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

// ============================================================================
// SECTION: Prompt and Project Queries
// ============================================================================

/// Filters for the prompt listing endpoint.
#[derive(Debug, Clone)]
pub struct PromptQuery {
    /// Include public prompts instead of private ones.
    pub is_public: bool,
    /// Maximum number of prompts returned.
    pub limit: usize,
}

impl PromptQuery {
    /// Builds the GET query pairs for this filter.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("is_public".to_string(), self.is_public.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ]
    }
}

/// Filters for the project listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ProjectQuery {
    /// Substring filter on project names.
    pub name_contains: Option<String>,
    /// Maximum number of projects returned.
    pub limit: usize,
}

impl ProjectQuery {
    /// Builds the GET query pairs for this filter.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(fragment) = self.name_contains.as_ref() {
            pairs.push(("name_contains".to_string(), fragment.clone()));
        }
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }
}

// ============================================================================
// SECTION: Dataset and Example Queries
// ============================================================================

/// Filters for the dataset listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct DatasetQuery {
    /// Dataset ids to fetch.
    pub dataset_ids: Vec<String>,
    /// Restrict by dataset data type (for example "kv", "chat").
    pub data_type: Option<String>,
    /// Restrict by exact dataset name.
    pub dataset_name: Option<String>,
    /// Substring filter on dataset names.
    pub dataset_name_contains: Option<String>,
    /// Metadata object the datasets must carry.
    pub metadata: Option<Value>,
    /// Maximum number of datasets returned.
    pub limit: usize,
}

impl DatasetQuery {
    /// Builds the GET query pairs for this filter.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for id in &self.dataset_ids {
            pairs.push(("id".to_string(), id.clone()));
        }
        if let Some(data_type) = self.data_type.as_ref() {
            pairs.push(("data_type".to_string(), data_type.clone()));
        }
        if let Some(name) = self.dataset_name.as_ref() {
            pairs.push(("name".to_string(), name.clone()));
        }
        if let Some(fragment) = self.dataset_name_contains.as_ref() {
            pairs.push(("name_contains".to_string(), fragment.clone()));
        }
        if let Some(metadata) = self.metadata.as_ref() {
            pairs.push(("metadata".to_string(), metadata.to_string()));
        }
        pairs.push(("limit".to_string(), self.limit.to_string()));
        pairs
    }
}

/// Filters for the example listing endpoint.
#[derive(Debug, Clone, Default)]
pub struct ExampleQuery {
    /// Dataset id to read examples from.
    pub dataset_id: Option<String>,
    /// Dataset name to read examples from.
    pub dataset_name: Option<String>,
    /// Example ids to fetch; takes precedence over dataset selectors.
    pub example_ids: Vec<String>,
    /// Opaque filter expression.
    pub filter: Option<String>,
    /// Metadata object the examples must carry.
    pub metadata: Option<Value>,
    /// Dataset splits to read from.
    pub splits: Vec<String>,
    /// Inline object-store URLs into payloads.
    pub inline_s3_urls: Option<bool>,
    /// Include example attachments in payloads.
    pub include_attachments: Option<bool>,
    /// Dataset version tag or timestamp to read as of.
    pub as_of: Option<String>,
    /// Maximum number of examples returned.
    pub limit: Option<usize>,
    /// Number of examples to skip.
    pub offset: Option<usize>,
}

impl ExampleQuery {
    /// Builds the GET query pairs for this filter.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for id in &self.example_ids {
            pairs.push(("id".to_string(), id.clone()));
        }
        if let Some(dataset_id) = self.dataset_id.as_ref() {
            pairs.push(("dataset_id".to_string(), dataset_id.clone()));
        }
        if let Some(dataset_name) = self.dataset_name.as_ref() {
            pairs.push(("dataset_name".to_string(), dataset_name.clone()));
        }
        if let Some(filter) = self.filter.as_ref() {
            pairs.push(("filter".to_string(), filter.clone()));
        }
        if let Some(metadata) = self.metadata.as_ref() {
            pairs.push(("metadata".to_string(), metadata.to_string()));
        }
        for split in &self.splits {
            pairs.push(("split".to_string(), split.clone()));
        }
        if let Some(inline) = self.inline_s3_urls {
            pairs.push(("inline_s3_urls".to_string(), inline.to_string()));
        }
        if let Some(attachments) = self.include_attachments {
            pairs.push(("include_attachments".to_string(), attachments.to_string()));
        }
        if let Some(as_of) = self.as_of.as_ref() {
            pairs.push(("as_of".to_string(), as_of.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset".to_string(), offset.to_string()));
        }
        pairs
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
