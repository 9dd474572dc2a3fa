// chain-porter-core/src/lib.rs
// ============================================================================
// Module: Chain Porter Core
// Description: Canonical tool identifiers, contracts, and response envelope.
// Purpose: Shared contract surface for the MCP server, clients, and CLI.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core contract types for Chain Porter. Tool names and input schemas defined
//! here are the external contract surface; the MCP server validates every
//! invocation against them before any handler runs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod contract;
pub mod envelope;
pub mod tooling;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use contract::ToolDefinition;
pub use contract::tool_definitions;
pub use envelope::ContentItem;
pub use envelope::ResponseEnvelope;
pub use tooling::ToolName;
