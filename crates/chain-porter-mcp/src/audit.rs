// chain-porter-mcp/src/audit.rs
// ============================================================================
// Module: MCP Audit Logging
// Description: Structured audit events for tool call handling.
// Purpose: Emit JSON-line audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! This module defines the audit event payload and sinks for tool call
//! logging. Events carry the tool name, outcome, and timing; argument
//! payloads are never logged because they may contain recipient addresses or
//! stored text. Stdout is reserved for the JSON-RPC stream, so the default
//! sink writes to stderr.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Tool call audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ToolCallAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Tool name as requested by the client.
    pub tool: String,
    /// Call outcome label.
    pub outcome: &'static str,
    /// Normalized error kind label when the call failed.
    pub error_kind: Option<&'static str>,
    /// Handler wall time in milliseconds.
    pub duration_ms: u128,
}

impl ToolCallAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(
        tool: String,
        outcome: &'static str,
        error_kind: Option<&'static str>,
        duration_ms: u128,
    ) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "tool_call",
            timestamp_ms,
            tool,
            outcome,
            error_kind,
            duration_ms,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for tool call events.
pub trait ToolAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ToolCallAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ToolAuditSink for StderrAuditSink {
    fn record(&self, event: &ToolCallAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ToolAuditSink for NoopAuditSink {
    fn record(&self, _event: &ToolCallAuditEvent) {}
}
