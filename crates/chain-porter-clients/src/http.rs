// chain-porter-clients/src/http.rs
// ============================================================================
// Module: HTTP Client Helpers
// Description: Shared bounded HTTP client construction and body reading.
// Purpose: Keep every collaborator request within timeout and size policy.
// Dependencies: reqwest
// ============================================================================

//! ## Overview
//! Common helpers for collaborator HTTP clients: builder with timeout, user
//! agent, and redirects disabled, plus size-limited response body reading.
//! Every collaborator client goes through these so limits apply uniformly.

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::redirect::Policy;

/// Maximum response body size accepted from any collaborator.
pub const MAX_RESPONSE_BYTES: usize = 32 * 1024 * 1024;

/// Builds a bounded blocking HTTP client.
///
/// # Errors
///
/// Returns the builder error message when the client cannot be constructed.
pub fn build_client(timeout_ms: u64, user_agent: &str) -> Result<Client, String> {
    Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .user_agent(user_agent.to_string())
        .redirect(Policy::none())
        .build()
        .map_err(|_| "http client build failed".to_string())
}

/// Reads a response body while enforcing a byte limit.
///
/// # Errors
///
/// Returns a message when the body exceeds the limit or cannot be read.
pub fn read_response_limited(
    response: &mut reqwest::blocking::Response,
    max_bytes: usize,
) -> Result<Vec<u8>, String> {
    let max_bytes_u64 =
        u64::try_from(max_bytes).map_err(|_| "response size limit exceeds u64".to_string())?;
    if let Some(expected) = response.content_length()
        && expected > max_bytes_u64
    {
        return Err("response exceeds size limit".to_string());
    }
    let mut buf = Vec::new();
    let limit = max_bytes_u64.saturating_add(1);
    let mut handle = response.take(limit);
    handle.read_to_end(&mut buf).map_err(|_| "failed to read response".to_string())?;
    if buf.len() > max_bytes {
        return Err("response exceeds size limit".to_string());
    }
    Ok(buf)
}
