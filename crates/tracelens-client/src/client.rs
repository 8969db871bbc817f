// crates/tracelens-client/src/client.rs
// ============================================================================
// Module: Platform API Client
// Description: Bounded blocking HTTP client for platform query operations.
// Purpose: Provide fail-closed access to prompts, runs, projects, datasets.
// Dependencies: reqwest, serde_json, tracelens-config, url
// ============================================================================

//! ## Overview
//! The client issues bounded requests against the platform's versioned REST
//! surface. Redirects are never followed, every request carries a timeout,
//! and response bodies are read against a hard size limit. The [`PlatformApi`]
//! trait is the seam the tool router consumes, so tool handlers can be
//! exercised against a stub without a network.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::io::Read;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::Url;
use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracelens_config::ApiConfig;

use crate::requests::DatasetQuery;
use crate::requests::ExampleQuery;
use crate::requests::ProjectQuery;
use crate::requests::PromptQuery;
use crate::requests::RunQuery;
use crate::requests::StatsQuery;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Header carrying the platform API key.
const API_KEY_HEADER: &str = "x-api-key";
/// Versioned path prefix for all platform endpoints.
const API_PREFIX_SEGMENTS: [&str; 2] = ["api", "v1"];

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Platform API client errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API key could not be resolved.
    #[error("missing api credentials: {0}")]
    MissingCredentials(String),
    /// The request could not be constructed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The transport failed before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),
    /// The platform rejected the request.
    #[error("platform api returned status {status}")]
    Status {
        /// HTTP status code returned by the platform.
        status: u16,
    },
    /// The requested resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),
    /// The response body exceeded the configured limit.
    #[error("response too large: exceeds {limit} bytes")]
    TooLarge {
        /// Maximum allowed response size in bytes.
        limit: usize,
    },
    /// The response body was not valid JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

// ============================================================================
// SECTION: Platform API Surface
// ============================================================================

/// Read-only platform API surface consumed by the tool router.
pub trait PlatformApi: Send + Sync {
    /// Lists prompts matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn list_prompts(&self, query: &PromptQuery) -> Result<Value, ApiError>;

    /// Reads one prompt by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn get_prompt(&self, prompt_name: &str) -> Result<Value, ApiError>;

    /// Lists tracing projects matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn list_projects(&self, query: &ProjectQuery) -> Result<Value, ApiError>;

    /// Queries runs across one or more projects.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn query_runs(&self, query: &RunQuery) -> Result<Value, ApiError>;

    /// Aggregates run statistics for a project or trace.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn project_runs_stats(&self, query: &StatsQuery) -> Result<Value, ApiError>;

    /// Lists datasets matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn list_datasets(&self, query: &DatasetQuery) -> Result<Value, ApiError>;

    /// Reads one dataset by id.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn read_dataset(&self, dataset_id: &str) -> Result<Value, ApiError>;

    /// Lists dataset examples matching the query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn list_examples(&self, query: &ExampleQuery) -> Result<Value, ApiError>;

    /// Reads one example by id, optionally as of a dataset version.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the platform call fails.
    fn read_example(&self, example_id: &str, as_of: Option<&str>) -> Result<Value, ApiError>;
}

// ============================================================================
// SECTION: Client Configuration
// ============================================================================

/// Resolved configuration for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Platform API endpoint URL.
    pub endpoint: String,
    /// Platform API key sent on every request.
    pub api_key: String,
    /// Request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum response size allowed, in bytes.
    pub max_response_bytes: usize,
    /// User agent string for outbound requests.
    pub user_agent: String,
}

// ============================================================================
// SECTION: Client Implementation
// ============================================================================

/// Blocking platform API client.
///
/// # Invariants
/// - Redirects are not followed.
/// - Responses exceeding the configured limit fail closed.
/// - Every request carries the API key header and a timeout.
pub struct ApiClient {
    /// Parsed endpoint base URL.
    base: Url,
    /// API key sent with every request.
    api_key: String,
    /// Maximum response size in bytes.
    max_response_bytes: usize,
    /// HTTP client used for outbound requests.
    client: Client,
}

impl ApiClient {
    /// Creates a client from resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] when the endpoint is unusable, the key is empty,
    /// or the HTTP client cannot be created.
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let base = Url::parse(&config.endpoint)
            .map_err(|err| ApiError::InvalidRequest(format!("invalid endpoint url: {err}")))?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidRequest("endpoint cannot be a base url".to_string()));
        }
        if config.api_key.is_empty() {
            return Err(ApiError::MissingCredentials("api key is empty".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .redirect(Policy::none())
            .user_agent(config.user_agent)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            base,
            api_key: config.api_key,
            max_response_bytes: config.max_response_bytes,
            client,
        })
    }

    /// Creates a client from the canonical config, resolving the API key
    /// from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MissingCredentials`] when the variable is unset,
    /// plus any [`ApiClient::new`] failure.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiError> {
        let api_key = env::var(&config.api_key_env)
            .map_err(|_| ApiError::MissingCredentials(config.api_key_env.clone()))?;
        Self::new(ApiClientConfig {
            endpoint: config.endpoint.clone(),
            api_key,
            timeout_ms: config.timeout_ms,
            max_response_bytes: config.max_response_bytes,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Builds a full endpoint URL from path segments and query pairs.
    fn endpoint_url(
        &self,
        segments: &[&str],
        pairs: &[(String, String)],
    ) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|()| {
                ApiError::InvalidRequest("endpoint cannot be a base url".to_string())
            })?;
            path.pop_if_empty();
            path.extend(API_PREFIX_SEGMENTS);
            path.extend(segments);
        }
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in pairs {
                query.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues a GET request and decodes the JSON response.
    fn get(&self, segments: &[&str], pairs: &[(String, String)]) -> Result<Value, ApiError> {
        let url = self.endpoint_url(segments, pairs)?;
        let resource = url.path().to_string();
        let response = self
            .client
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.decode(resource, response)
    }

    /// Issues a POST request with a JSON body and decodes the response.
    fn post<B: Serialize>(&self, segments: &[&str], body: &B) -> Result<Value, ApiError> {
        let url = self.endpoint_url(segments, &[])?;
        let resource = url.path().to_string();
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        self.decode(resource, response)
    }

    /// Maps the response status and decodes a bounded JSON body.
    fn decode(&self, resource: String, mut response: Response) -> Result<Value, ApiError> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(resource));
        }
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }
        let body = read_response_limited(&mut response, self.max_response_bytes)?;
        serde_json::from_slice(&body).map_err(|err| ApiError::Decode(err.to_string()))
    }
}

impl PlatformApi for ApiClient {
    fn list_prompts(&self, query: &PromptQuery) -> Result<Value, ApiError> {
        self.get(&["prompts"], &query.query_pairs())
    }

    fn get_prompt(&self, prompt_name: &str) -> Result<Value, ApiError> {
        self.get(&["prompts", prompt_name], &[])
    }

    fn list_projects(&self, query: &ProjectQuery) -> Result<Value, ApiError> {
        self.get(&["projects"], &query.query_pairs())
    }

    fn query_runs(&self, query: &RunQuery) -> Result<Value, ApiError> {
        self.post(&["runs", "query"], query)
    }

    fn project_runs_stats(&self, query: &StatsQuery) -> Result<Value, ApiError> {
        self.post(&["runs", "stats"], query)
    }

    fn list_datasets(&self, query: &DatasetQuery) -> Result<Value, ApiError> {
        self.get(&["datasets"], &query.query_pairs())
    }

    fn read_dataset(&self, dataset_id: &str) -> Result<Value, ApiError> {
        self.get(&["datasets", dataset_id], &[])
    }

    fn list_examples(&self, query: &ExampleQuery) -> Result<Value, ApiError> {
        self.get(&["examples"], &query.query_pairs())
    }

    fn read_example(&self, example_id: &str, as_of: Option<&str>) -> Result<Value, ApiError> {
        let pairs = as_of
            .map(|version| vec![("as_of".to_string(), version.to_string())])
            .unwrap_or_default();
        self.get(&["examples", example_id], &pairs)
    }
}

// ============================================================================
// SECTION: Response Helpers
// ============================================================================

/// Reads a response body up to a hard byte limit.
fn read_response_limited(response: &mut Response, limit: usize) -> Result<Vec<u8>, ApiError> {
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    let mut body = Vec::new();
    response
        .by_ref()
        .take(cap)
        .read_to_end(&mut body)
        .map_err(|err| ApiError::Transport(err.to_string()))?;
    if body.len() > limit {
        return Err(ApiError::TooLarge {
            limit,
        });
    }
    Ok(body)
}

// ============================================================================
// SECTION: Tests
// ============================================================================
