// crates/tracelens-config/src/lib.rs
// ============================================================================
// Module: TraceLens Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for tracelens.toml semantics.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! `tracelens-config` defines the canonical configuration model for the
//! TraceLens MCP server: the platform API connection and the server
//! transport. Validation is strict and fail-closed, and the example
//! generator emits a deterministic starter file for `config example`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
