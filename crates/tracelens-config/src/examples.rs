// crates/tracelens-config/src/examples.rs
// ============================================================================
// Module: TraceLens Config Examples
// Description: Deterministic example configuration artifacts.
// Purpose: Back the `config example` command with a canonical starter file.
// Dependencies: none
// ============================================================================

//! ## Overview
//! The example generator emits a complete, commented `tracelens.toml` that
//! validates as-is. Output is a fixed string so repeated runs produce
//! byte-identical artifacts.

// ============================================================================
// SECTION: Example Generation
// ============================================================================

/// Returns the canonical example `tracelens.toml`.
#[must_use]
pub const fn config_toml_example() -> &'static str {
    r#"# TraceLens MCP server configuration.
#
# The platform API key is never stored here. Set the environment variable
# named by api.api_key_env before starting the server.

[api]
# Platform API endpoint. Cleartext http requires api.allow_http = true.
endpoint = "https://api.tracelens.io"
# Environment variable holding the platform API key.
api_key_env = "TRACELENS_API_KEY"
# Outbound request timeout in milliseconds.
timeout_ms = 30000
# Maximum platform API response size in bytes.
max_response_bytes = 4194304
# User agent for outbound requests.
user_agent = "tracelens/0.1"

[server]
# Transport: "stdio" (framed stdin/stdout) or "http" (JSON-RPC over POST).
transport = "stdio"
# Bind address, required when transport = "http".
# bind = "127.0.0.1:8700"
# Maximum JSON-RPC request body size in bytes.
max_body_bytes = 1048576

# Bearer auth for HTTP callers. Stdio is treated as trusted local.
# [server.auth]
# mode = "bearer_token"
# tokens = ["replace-with-a-long-random-token"]
"#
}

// ============================================================================
// SECTION: Tests
// ============================================================================
