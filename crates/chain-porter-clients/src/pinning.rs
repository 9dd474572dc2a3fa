// chain-porter-clients/src/pinning.rs
// ============================================================================
// Module: Pinning Service Client
// Description: Pin requests against an IPFS pinning service.
// Purpose: Provide the content pinning operation tools delegate to.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! The pinning client submits pin requests for content identifiers to a
//! pinning-service style API. Authentication is an optional bearer token
//! resolved from the environment at client construction; the service response
//! yields a request identifier and status.

// ============================================================================
// SECTION: Imports
// ============================================================================

use chain_porter_config::PinningConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

use crate::http::build_client;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// User agent for pinning service requests.
const PINNING_USER_AGENT: &str = "chain-porter/0.1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Pinning service client errors.
#[derive(Debug, Error)]
pub enum PinningError {
    /// Client construction failure.
    #[error("pinning client failed: {0}")]
    Client(String),
    /// Service request failure.
    #[error("pinning request failed: {0}")]
    Request(String),
    /// Unexpected service response payload.
    #[error("pinning response invalid: {0}")]
    Response(String),
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Receipt for an accepted pin request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PinReceipt {
    /// Request identifier assigned by the service.
    #[serde(rename = "requestid")]
    pub request_id: String,
    /// Pin status reported by the service.
    pub status: String,
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// HTTP client for the pinning service.
pub struct PinningClient {
    /// Service base URL.
    endpoint: String,
    /// Bearer token, when the service requires one.
    token: Option<String>,
    /// Bounded HTTP client for service requests.
    client: Client,
}

impl PinningClient {
    /// Builds a pinning client, resolving the bearer token if configured.
    ///
    /// # Errors
    ///
    /// Returns [`PinningError::Client`] when the HTTP client cannot be built.
    pub fn new(config: &PinningConfig) -> Result<Self, PinningError> {
        let client =
            build_client(config.timeout_ms, PINNING_USER_AGENT).map_err(PinningError::Client)?;
        Ok(Self {
            endpoint: config.endpoint.clone(),
            token: config.resolve_token(),
            client,
        })
    }

    /// Submits a pin request for a content identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PinningError`] when the request is rejected or malformed.
    pub fn pin(&self, cid: &str) -> Result<PinReceipt, PinningError> {
        let url = format!("{}/pins", self.endpoint);
        let mut request = self.client.post(&url).json(&json!({
            "cid": cid,
        }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().map_err(|err| PinningError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(PinningError::Request(format!("{url} returned {}", response.status())));
        }
        response.json::<PinReceipt>().map_err(|err| PinningError::Response(err.to_string()))
    }
}
