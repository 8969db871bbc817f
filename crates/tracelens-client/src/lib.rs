// crates/tracelens-client/src/lib.rs
// ============================================================================
// Module: TraceLens Client Library
// Description: Blocking HTTP client for the hosted observability platform.
// Purpose: Provide the read-only platform API surface behind the MCP tools.
// Dependencies: reqwest, serde, serde_json, url
// ============================================================================

//! ## Overview
//! `tracelens-client` talks to the hosted observability platform over HTTPS.
//! Every call is bounded: request timeouts, disabled redirects, and a hard
//! response size limit are enforced fail-closed. Responses are decoded to
//! opaque JSON values; field semantics belong to the platform, not to this
//! crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod requests;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ApiClient;
pub use client::ApiClientConfig;
pub use client::ApiError;
pub use client::PlatformApi;
pub use requests::DatasetQuery;
pub use requests::ExampleQuery;
pub use requests::ProjectQuery;
pub use requests::PromptQuery;
pub use requests::RunQuery;
pub use requests::StatsQuery;
