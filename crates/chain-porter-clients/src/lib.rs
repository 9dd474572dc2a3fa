// chain-porter-clients/src/lib.rs
// ============================================================================
// Module: Chain Porter Collaborator Clients
// Description: Thin clients for the external systems tools delegate to.
// Purpose: Bound every collaborator call with timeouts and size limits.
// Dependencies: reqwest, ed25519-dalek, sha2, serde, serde_json
// ============================================================================

//! ## Overview
//! Collaborator clients for Chain Porter: the chain wallet client, the storage
//! gateway, the weather API, the pinning service, and the artifact source
//! loader. None of these implement collaborator internals; each is a bounded
//! HTTP wrapper specified at its interface boundary. Handler-facing surfaces
//! are traits so the MCP layer can substitute doubles in tests.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod artifact;
pub mod chain;
pub mod http;
pub mod pinning;
pub mod storage;
pub mod weather;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use artifact::ArtifactError;
pub use artifact::ArtifactSource;
pub use chain::ChainClient;
pub use chain::ChainError;
pub use chain::HttpChainClient;
pub use chain::SessionProof;
pub use chain::TxReceipt;
pub use pinning::PinReceipt;
pub use pinning::PinningClient;
pub use pinning::PinningError;
pub use storage::DirListing;
pub use storage::FileDescriptor;
pub use storage::StorageAccount;
pub use storage::StorageClient;
pub use storage::StorageError;
pub use storage::StorageGatewayClient;
pub use weather::WeatherClient;
pub use weather::WeatherError;
