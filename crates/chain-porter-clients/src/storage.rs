// chain-porter-clients/src/storage.rs
// ============================================================================
// Module: Storage Gateway Client
// Description: File upload, download, and directory listing over the gateway.
// Purpose: Provide the decentralized storage operations tools delegate to.
// Dependencies: reqwest, serde, serde_json
// ============================================================================

//! ## Overview
//! The storage gateway client wraps the decentralized storage HTTP gateway.
//! A session is established by registering a proof of wallet control; after
//! that, uploads, downloads, and directory listings address the wallet's
//! working directory on the gateway. Downloads are size-limited; the gateway
//! itself is an external collaborator and its internals are out of scope.

// ============================================================================
// SECTION: Imports
// ============================================================================

use chain_porter_config::StorageGatewayConfig;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::chain::SessionProof;
use crate::http::MAX_RESPONSE_BYTES;
use crate::http::build_client;
use crate::http::read_response_limited;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Storage gateway client errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Gateway connection or session registration failure.
    #[error("storage session failed: {0}")]
    Session(String),
    /// Gateway request failure.
    #[error("storage request failed: {0}")]
    Request(String),
    /// Unexpected gateway response payload.
    #[error("storage response invalid: {0}")]
    Response(String),
    /// Requested file is absent from the working directory.
    #[error("file not found: {0}")]
    NotFound(String),
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Entry describing one stored file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    /// File name within the working directory.
    pub name: String,
    /// Content identifier assigned by the storage network.
    pub cid: String,
    /// Stored size in bytes.
    pub size_bytes: u64,
}

/// Listing of the wallet's working directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirListing {
    /// Files in the working directory.
    #[serde(default)]
    pub files: Vec<FileDescriptor>,
}

/// Storage account summary reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageAccount {
    /// Purchased capacity in bytes.
    pub capacity_bytes: u64,
    /// Bytes currently consumed.
    pub used_bytes: u64,
}

// ============================================================================
// SECTION: Client Trait
// ============================================================================

/// Storage operations exposed to tool handlers.
pub trait StorageClient: Send + Sync {
    /// Uploads file bytes under `name` in the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the upload fails.
    fn upload(&self, name: &str, bytes: &[u8]) -> Result<FileDescriptor, StorageError>;

    /// Downloads the file stored under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] for absent files and other
    /// [`StorageError`] variants for transport failures.
    fn download(&self, name: &str) -> Result<Vec<u8>, StorageError>;

    /// Lists the working directory.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the listing fails.
    fn list_directory(&self) -> Result<DirListing, StorageError>;
}

// ============================================================================
// SECTION: Gateway Client
// ============================================================================

/// HTTP client for the storage gateway.
pub struct StorageGatewayClient {
    /// Gateway base URL.
    endpoint: String,
    /// Bounded HTTP client for gateway requests.
    client: Client,
    /// Wallet address the session is registered for.
    address: String,
}

impl StorageGatewayClient {
    /// Registers the session key with the gateway and opens the client.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Session`] when registration is rejected.
    pub fn register_session_key(
        config: &StorageGatewayConfig,
        proof: &SessionProof,
    ) -> Result<Self, StorageError> {
        let client =
            build_client(config.timeout_ms, &config.user_agent).map_err(StorageError::Session)?;
        let body = json!({
            "address": proof.address,
            "public_key": proof.public_key,
            "signature": proof.signature,
        });
        let response = client
            .post(format!("{}/session", config.endpoint))
            .json(&body)
            .send()
            .map_err(|err| StorageError::Session(err.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::Session(format!(
                "gateway rejected session registration with {}",
                response.status()
            )));
        }
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client,
            address: proof.address.clone(),
        })
    }

    /// Fetches the storage account summary for the session wallet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the query fails.
    pub fn storage_account(&self) -> Result<StorageAccount, StorageError> {
        let url = format!("{}/accounts/{}", self.endpoint, self.address);
        let response =
            self.client.get(&url).send().map_err(|err| StorageError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::Request(format!("{url} returned {}", response.status())));
        }
        response.json::<StorageAccount>().map_err(|err| StorageError::Response(err.to_string()))
    }
}

impl StorageClient for StorageGatewayClient {
    fn upload(&self, name: &str, bytes: &[u8]) -> Result<FileDescriptor, StorageError> {
        let url = format!("{}/files/{}/{}", self.endpoint, self.address, name);
        let response = self
            .client
            .put(&url)
            .body(bytes.to_vec())
            .send()
            .map_err(|err| StorageError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::Request(format!("{url} returned {}", response.status())));
        }
        response.json::<FileDescriptor>().map_err(|err| StorageError::Response(err.to_string()))
    }

    fn download(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        let url = format!("{}/files/{}/{}", self.endpoint, self.address, name);
        let mut response =
            self.client.get(&url).send().map_err(|err| StorageError::Request(err.to_string()))?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StorageError::NotFound(name.to_string()));
        }
        if !response.status().is_success() {
            return Err(StorageError::Request(format!("{url} returned {}", response.status())));
        }
        read_response_limited(&mut response, MAX_RESPONSE_BYTES).map_err(StorageError::Response)
    }

    fn list_directory(&self) -> Result<DirListing, StorageError> {
        let url = format!("{}/files/{}", self.endpoint, self.address);
        let response =
            self.client.get(&url).send().map_err(|err| StorageError::Request(err.to_string()))?;
        if !response.status().is_success() {
            return Err(StorageError::Request(format!("{url} returned {}", response.status())));
        }
        response.json::<DirListing>().map_err(|err| StorageError::Response(err.to_string()))
    }
}
