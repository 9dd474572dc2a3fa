// chain-porter-mcp/src/lib.rs
// ============================================================================
// Module: Chain Porter MCP Server
// Description: MCP tool registry, dispatcher, bootstrap, and stdio transport.
// Purpose: Expose Chain Porter tools via JSON-RPC 2.0 over stdio.
// Dependencies: chain-porter-core, chain-porter-clients, jsonschema
// ============================================================================

//! ## Overview
//! This crate is the MCP layer of Chain Porter. It wires the tool catalog to
//! handlers over the collaborator clients, validates every call payload
//! against the tool's schema before the handler runs, and serves JSON-RPC 2.0
//! over a single framed stdio session. Session bootstrap is all-or-nothing:
//! the server only starts once the wallet, storage session, and working
//! directory preload have all succeeded.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod bootstrap;
pub mod server;
pub mod tools;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::NoopAuditSink;
pub use audit::StderrAuditSink;
pub use audit::ToolAuditSink;
pub use bootstrap::BootstrapError;
pub use bootstrap::BootstrapSteps;
pub use bootstrap::HttpBootstrap;
pub use bootstrap::SessionHandle;
pub use bootstrap::bootstrap;
pub use server::McpServer;
pub use server::McpServerError;
pub use tools::PorterTooling;
pub use tools::ToolError;
pub use tools::ToolRegistry;
pub use tools::ToolRouter;
pub use tools::register_porter_tools;
