// chain-porter-cli/src/main.rs
// ============================================================================
// Module: Chain Porter CLI Entry Point
// Description: Command dispatcher for the Chain Porter MCP server.
// Purpose: Start the stdio server and inspect configuration and tooling.
// Dependencies: clap, chain-porter-config, chain-porter-mcp
// ============================================================================

//! ## Overview
//! The Chain Porter CLI starts the MCP stdio server and offers offline
//! utilities for inspecting the tool catalog and validating configuration.
//! Stdout is reserved for command output; once `serve` hands the session to
//! the server, stdout carries only framed JSON-RPC responses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use chain_porter_config::PorterConfig;
use chain_porter_core::tool_definitions;
use chain_porter_mcp::McpServer;
use clap::ArgAction;
use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "chain-porter", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue)]
    show_version: bool,
    /// Selected command.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Chain Porter MCP server on stdio.
    Serve(ServeCommand),
    /// Print the tool catalog as JSON.
    Tools,
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Server start command.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Path to the configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Load and validate a configuration file.
    Validate {
        /// Path to the configuration file.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI errors.
#[derive(Debug, Error)]
enum CliError {
    /// Configuration load or validation failure.
    #[error("{0}")]
    Config(String),
    /// Server startup or transport failure.
    #[error("{0}")]
    Server(String),
    /// Output stream failure.
    #[error("failed to write {0}")]
    Output(&'static str),
}

// ============================================================================
// SECTION: Entry Point
// ============================================================================

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "chain-porter: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Executes the CLI command dispatcher.
fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();
    if cli.show_version {
        write_stdout_line(&format!("chain-porter {}", env!("CARGO_PKG_VERSION")))?;
        return Ok(ExitCode::SUCCESS);
    }
    match cli.command {
        Some(Commands::Serve(command)) => serve(command),
        Some(Commands::Tools) => print_tools(),
        Some(Commands::Config {
            command: ConfigCommand::Validate {
                config,
            },
        }) => validate_config(config),
        None => {
            write_stderr_line("usage: chain-porter <serve|tools|config> [options]")?;
            Ok(ExitCode::FAILURE)
        }
    }
}

// ============================================================================
// SECTION: Commands
// ============================================================================

/// Bootstraps the session and serves the stdio transport.
fn serve(command: ServeCommand) -> Result<ExitCode, CliError> {
    let config = PorterConfig::load(command.config.as_deref())
        .map_err(|err| CliError::Config(err.to_string()))?;
    let server =
        McpServer::from_config(config).map_err(|err| CliError::Server(err.to_string()))?;
    server.serve().map_err(|err| CliError::Server(err.to_string()))?;
    Ok(ExitCode::SUCCESS)
}

/// Prints the canonical tool catalog as JSON.
fn print_tools() -> Result<ExitCode, CliError> {
    let catalog = tool_definitions();
    let rendered = serde_json::to_string_pretty(&catalog)
        .map_err(|err| CliError::Config(err.to_string()))?;
    write_stdout_line(&rendered)?;
    Ok(ExitCode::SUCCESS)
}

/// Loads and validates a configuration file.
fn validate_config(path: Option<PathBuf>) -> Result<ExitCode, CliError> {
    PorterConfig::load(path.as_deref()).map_err(|err| CliError::Config(err.to_string()))?;
    write_stdout_line("configuration is valid")?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes one line to stdout.
fn write_stdout_line(line: &str) -> Result<(), CliError> {
    writeln!(std::io::stdout(), "{line}").map_err(|_| CliError::Output("stdout"))
}

/// Writes one line to stderr.
fn write_stderr_line(line: &str) -> Result<(), CliError> {
    writeln!(std::io::stderr(), "{line}").map_err(|_| CliError::Output("stderr"))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
