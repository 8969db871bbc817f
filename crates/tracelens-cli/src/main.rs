// crates/tracelens-cli/src/main.rs
// ============================================================================
// Module: TraceLens CLI Entry Point
// Description: Command dispatcher for the TraceLens MCP server.
// Purpose: Provide serve, config, and tool-contract commands.
// Dependencies: clap, tokio, tracelens-config, tracelens-mcp
// ============================================================================

//! ## Overview
//! The TraceLens CLI starts the MCP server and provides offline helpers for
//! configuration and tool contracts. All failures map to a single-line
//! stderr message and a failing exit code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::Subcommand;
use tracelens_config::config_toml_example;
use tracelens_config::load_config;
use tracelens_mcp::McpServer;
use tracelens_mcp::tool_definitions;

// ============================================================================
// SECTION: CLI Definition
// ============================================================================

/// TraceLens MCP server and utilities.
#[derive(Debug, Parser)]
#[command(name = "tracelens", version, about = "MCP server for platform query tools")]
struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    command: Command,
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Run the MCP server with the configured transport.
    Serve {
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Configuration utilities.
    Config {
        /// Selected configuration command.
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Tool contract utilities.
    Tools {
        /// Selected tool command.
        #[command(subcommand)]
        command: ToolsCommand,
    },
}

/// Configuration subcommands.
#[derive(Debug, Subcommand)]
enum ConfigCommand {
    /// Print the canonical example configuration.
    Example,
    /// Load and validate a configuration file.
    Validate {
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Tool contract subcommands.
#[derive(Debug, Subcommand)]
enum ToolsCommand {
    /// Print the tool definitions as JSON.
    List,
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Process entry point.
fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            let _ = writeln!(std::io::stderr(), "tracelens: {message}");
            ExitCode::FAILURE
        }
    }
}

/// Executes the CLI command dispatcher.
fn run() -> Result<(), String> {
    let cli = Cli::parse();
    match cli.command {
        Command::Serve {
            config,
        } => serve(config.as_deref()),
        Command::Config {
            command: ConfigCommand::Example,
        } => write_stdout(config_toml_example()),
        Command::Config {
            command: ConfigCommand::Validate {
                config,
            },
        } => validate(config.as_deref()),
        Command::Tools {
            command: ToolsCommand::List,
        } => list_tools(),
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Loads configuration and serves the MCP server.
fn serve(path: Option<&Path>) -> Result<(), String> {
    let config = load_config(path).map_err(|err| err.to_string())?;
    let server = McpServer::from_config(config).map_err(|err| err.to_string())?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| err.to_string())?;
    runtime.block_on(server.serve()).map_err(|err| err.to_string())
}

/// Loads and validates configuration, reporting the resolved source.
fn validate(path: Option<&Path>) -> Result<(), String> {
    load_config(path).map_err(|err| err.to_string())?;
    write_stdout("configuration is valid\n")
}

/// Prints the canonical tool definitions as pretty JSON.
fn list_tools() -> Result<(), String> {
    let rendered = serde_json::to_string_pretty(&tool_definitions())
        .map_err(|err| err.to_string())?;
    write_stdout(&format!("{rendered}\n"))
}

/// Writes text to stdout, mapping failures to a message.
fn write_stdout(text: &str) -> Result<(), String> {
    std::io::stdout()
        .write_all(text.as_bytes())
        .map_err(|err| format!("stdout write failed: {err}"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
