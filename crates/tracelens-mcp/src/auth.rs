// crates/tracelens-mcp/src/auth.rs
// ============================================================================
// Module: MCP Transport Authentication
// Description: Request context and bearer-token policy for HTTP callers.
// Purpose: Keep remote callers out unless explicitly authorized.
// Dependencies: subtle, tracelens-config
// ============================================================================

//! ## Overview
//! Stdio is a trusted local transport and is always allowed. HTTP callers
//! are checked against the configured auth policy: local-only deployments
//! accept every request (a warning is emitted at startup), bearer-token
//! deployments require a matching `Authorization: Bearer` header. Token
//! comparison is constant-time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::IpAddr;

use subtle::ConstantTimeEq;
use thiserror::Error;
use tracelens_config::ServerAuthConfig;
use tracelens_config::ServerAuthMode;
use tracelens_config::ServerTransport;

// ============================================================================
// SECTION: Request Context
// ============================================================================

/// Per-request metadata used for authentication and telemetry.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Transport the request arrived on.
    pub transport: ServerTransport,
    /// Peer IP address when available.
    pub peer: Option<IpAddr>,
    /// Bearer token extracted from the Authorization header.
    pub bearer_token: Option<String>,
}

impl RequestContext {
    /// Creates a context for the trusted stdio transport.
    #[must_use]
    pub const fn stdio() -> Self {
        Self {
            transport: ServerTransport::Stdio,
            peer: None,
            bearer_token: None,
        }
    }

    /// Creates a context for an HTTP request.
    #[must_use]
    pub fn http(peer: Option<IpAddr>, auth_header: Option<&str>) -> Self {
        let bearer_token = auth_header
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::to_string);
        Self {
            transport: ServerTransport::Http,
            peer,
            bearer_token,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authentication failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The request carried no bearer token.
    #[error("missing bearer token")]
    MissingToken,
    /// The request carried a token that matched no configured value.
    #[error("invalid bearer token")]
    InvalidToken,
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Authentication policy applied to incoming requests.
#[derive(Debug, Clone)]
pub struct ServerAuthPolicy {
    /// Configured authentication mode.
    mode: ServerAuthMode,
    /// Accepted bearer tokens for bearer-token mode.
    tokens: Vec<String>,
}

impl ServerAuthPolicy {
    /// Builds the policy from server configuration.
    ///
    /// Absent auth configuration means local-only.
    #[must_use]
    pub fn from_config(auth: Option<&ServerAuthConfig>) -> Self {
        auth.map_or_else(
            || Self {
                mode: ServerAuthMode::LocalOnly,
                tokens: Vec::new(),
            },
            |config| Self {
                mode: config.mode,
                tokens: config.tokens.clone(),
            },
        )
    }

    /// Returns whether the policy runs without explicit authentication.
    #[must_use]
    pub fn is_local_only(&self) -> bool {
        self.mode == ServerAuthMode::LocalOnly
    }

    /// Authorizes a request context against the policy.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError`] when a required bearer token is missing or
    /// matches no configured value.
    pub fn authorize(&self, context: &RequestContext) -> Result<(), AuthError> {
        if context.transport == ServerTransport::Stdio {
            return Ok(());
        }
        match self.mode {
            ServerAuthMode::LocalOnly => Ok(()),
            ServerAuthMode::BearerToken => {
                let presented =
                    context.bearer_token.as_deref().ok_or(AuthError::MissingToken)?;
                if self.tokens.iter().any(|token| token_matches(token, presented)) {
                    Ok(())
                } else {
                    Err(AuthError::InvalidToken)
                }
            }
        }
    }
}

/// Compares two tokens in constant time.
fn token_matches(expected: &str, presented: &str) -> bool {
    expected.as_bytes().ct_eq(presented.as_bytes()).into()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
