// chain-porter-mcp/src/bootstrap.rs
// ============================================================================
// Module: Session Bootstrap
// Description: Ordered all-or-nothing startup of the collaborator session.
// Purpose: Produce a ready session handle or a step-attributed failure.
// Dependencies: chain-porter-clients, chain-porter-config
// ============================================================================

//! ## Overview
//! Bootstrap runs four ordered steps before the server accepts any request:
//! resolve the signing mnemonic, connect the wallet and verify the chain
//! identity, register the storage session key, and preload the working
//! directory listing. The sequence is all-or-nothing: a failing step aborts
//! startup with an error naming the step, and later steps never run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use chain_porter_clients::ChainClient;
use chain_porter_clients::DirListing;
use chain_porter_clients::HttpChainClient;
use chain_porter_clients::StorageClient;
use chain_porter_clients::StorageGatewayClient;
use chain_porter_config::PorterConfig;
use chain_porter_config::signer;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Bootstrap errors, one variant per step.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Signing material could not be resolved.
    #[error("signer resolution failed: {0}")]
    Signer(String),
    /// Wallet connection or chain verification failed.
    #[error("wallet connect failed: {0}")]
    Wallet(String),
    /// Storage session registration failed.
    #[error("storage session failed: {0}")]
    Storage(String),
    /// Working directory preload failed.
    #[error("working directory preload failed: {0}")]
    Preload(String),
}

// ============================================================================
// SECTION: Session Handle
// ============================================================================

/// Collaborator handles produced by a successful bootstrap.
pub struct SessionHandle {
    /// Connected chain wallet client.
    pub chain: Arc<dyn ChainClient>,
    /// Registered storage gateway session.
    pub storage: Arc<dyn StorageClient>,
    /// Working directory listing captured at startup.
    pub initial_listing: DirListing,
}

// ============================================================================
// SECTION: Steps
// ============================================================================

/// The ordered bootstrap steps.
///
/// Implementations supply the real collaborators; tests substitute doubles
/// to exercise failure ordering.
pub trait BootstrapSteps {
    /// Step 1: resolves the signing mnemonic.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Signer`] when no usable mnemonic exists.
    fn resolve_signer(&self) -> Result<String, BootstrapError>;

    /// Step 2: connects the wallet and verifies the chain identity.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Wallet`] when the connection fails.
    fn connect_wallet(&self, mnemonic: &str) -> Result<Arc<dyn ChainClient>, BootstrapError>;

    /// Step 3: registers the storage session key for the wallet.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Storage`] when registration fails.
    fn open_storage(
        &self,
        chain: &Arc<dyn ChainClient>,
    ) -> Result<Arc<dyn StorageClient>, BootstrapError>;

    /// Step 4: preloads the working directory listing.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::Preload`] when the listing fails.
    fn preload_working_directory(
        &self,
        storage: &Arc<dyn StorageClient>,
    ) -> Result<DirListing, BootstrapError>;
}

/// Runs the bootstrap sequence in order, stopping at the first failure.
///
/// # Errors
///
/// Returns the failing step's [`BootstrapError`].
pub fn bootstrap(steps: &dyn BootstrapSteps) -> Result<SessionHandle, BootstrapError> {
    let mnemonic = steps.resolve_signer()?;
    let chain = steps.connect_wallet(&mnemonic)?;
    let storage = steps.open_storage(&chain)?;
    let initial_listing = steps.preload_working_directory(&storage)?;
    Ok(SessionHandle {
        chain,
        storage,
        initial_listing,
    })
}

// ============================================================================
// SECTION: Production Steps
// ============================================================================

/// Bootstrap steps backed by the real collaborators.
pub struct HttpBootstrap {
    /// Validated runtime configuration.
    config: PorterConfig,
}

impl HttpBootstrap {
    /// Wraps a validated configuration.
    #[must_use]
    pub const fn new(config: PorterConfig) -> Self {
        Self {
            config,
        }
    }
}

impl BootstrapSteps for HttpBootstrap {
    fn resolve_signer(&self) -> Result<String, BootstrapError> {
        signer::resolve_mnemonic(&self.config.signer)
            .map_err(|err| BootstrapError::Signer(err.to_string()))
    }

    fn connect_wallet(&self, mnemonic: &str) -> Result<Arc<dyn ChainClient>, BootstrapError> {
        let client = HttpChainClient::connect(&self.config.network, mnemonic)
            .map_err(|err| BootstrapError::Wallet(err.to_string()))?;
        client
            .balance(&self.config.network.fee_denom)
            .map_err(|err| BootstrapError::Wallet(err.to_string()))?;
        Ok(Arc::new(client))
    }

    fn open_storage(
        &self,
        chain: &Arc<dyn ChainClient>,
    ) -> Result<Arc<dyn StorageClient>, BootstrapError> {
        let proof =
            chain.session_proof().map_err(|err| BootstrapError::Storage(err.to_string()))?;
        let client = StorageGatewayClient::register_session_key(&self.config.storage, &proof)
            .map_err(|err| BootstrapError::Storage(err.to_string()))?;
        client.storage_account().map_err(|err| BootstrapError::Storage(err.to_string()))?;
        Ok(Arc::new(client))
    }

    fn preload_working_directory(
        &self,
        storage: &Arc<dyn StorageClient>,
    ) -> Result<DirListing, BootstrapError> {
        storage.list_directory().map_err(|err| BootstrapError::Preload(err.to_string()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;
    use std::sync::atomic::Ordering;

    use chain_porter_clients::ChainClient;
    use chain_porter_clients::ChainError;
    use chain_porter_clients::DirListing;
    use chain_porter_clients::FileDescriptor;
    use chain_porter_clients::SessionProof;
    use chain_porter_clients::StorageClient;
    use chain_porter_clients::StorageError;
    use chain_porter_clients::TxReceipt;

    use super::BootstrapError;
    use super::BootstrapSteps;
    use super::bootstrap;

    /// Chain double that never broadcasts.
    struct FakeChain;

    impl ChainClient for FakeChain {
        fn address(&self) -> &str {
            "jkl1test"
        }

        fn balance(&self, _denom: &str) -> Result<u128, ChainError> {
            Ok(0)
        }

        fn send_tokens(&self, _recipient: &str, _micro: u128) -> Result<TxReceipt, ChainError> {
            Err(ChainError::Request("not wired".to_string()))
        }

        fn buy_storage(&self, _gigabytes: u64, _days: u64) -> Result<TxReceipt, ChainError> {
            Err(ChainError::Request("not wired".to_string()))
        }

        fn session_proof(&self) -> Result<SessionProof, ChainError> {
            Ok(SessionProof {
                address: "jkl1test".to_string(),
                public_key: String::new(),
                signature: String::new(),
            })
        }
    }

    /// Storage double with one stored file.
    struct FakeStorage;

    impl StorageClient for FakeStorage {
        fn upload(&self, _name: &str, _bytes: &[u8]) -> Result<FileDescriptor, StorageError> {
            Err(StorageError::Request("not wired".to_string()))
        }

        fn download(&self, name: &str) -> Result<Vec<u8>, StorageError> {
            Err(StorageError::NotFound(name.to_string()))
        }

        fn list_directory(&self) -> Result<DirListing, StorageError> {
            Ok(DirListing {
                files: vec![FileDescriptor {
                    name: "seed.txt".to_string(),
                    cid: "bafyseed".to_string(),
                    size_bytes: 4,
                }],
            })
        }
    }

    /// Steps double failing at a chosen step, counting how far it got.
    struct CountingSteps {
        /// Step number to fail at; zero means never fail.
        fail_at: usize,
        /// Highest step reached.
        reached: Arc<AtomicUsize>,
    }

    impl BootstrapSteps for CountingSteps {
        fn resolve_signer(&self) -> Result<String, BootstrapError> {
            self.reached.store(1, Ordering::SeqCst);
            if self.fail_at == 1 {
                return Err(BootstrapError::Signer("missing".to_string()));
            }
            Ok("word ".repeat(12).trim().to_string())
        }

        fn connect_wallet(
            &self,
            _mnemonic: &str,
        ) -> Result<Arc<dyn ChainClient>, BootstrapError> {
            self.reached.store(2, Ordering::SeqCst);
            if self.fail_at == 2 {
                return Err(BootstrapError::Wallet("chain id mismatch".to_string()));
            }
            Ok(Arc::new(FakeChain))
        }

        fn open_storage(
            &self,
            _chain: &Arc<dyn ChainClient>,
        ) -> Result<Arc<dyn StorageClient>, BootstrapError> {
            self.reached.store(3, Ordering::SeqCst);
            if self.fail_at == 3 {
                return Err(BootstrapError::Storage("gateway rejected".to_string()));
            }
            Ok(Arc::new(FakeStorage))
        }

        fn preload_working_directory(
            &self,
            storage: &Arc<dyn StorageClient>,
        ) -> Result<DirListing, BootstrapError> {
            self.reached.store(4, Ordering::SeqCst);
            if self.fail_at == 4 {
                return Err(BootstrapError::Preload("listing failed".to_string()));
            }
            storage.list_directory().map_err(|err| BootstrapError::Preload(err.to_string()))
        }
    }

    #[test]
    fn all_steps_succeed_yields_session() {
        let reached = Arc::new(AtomicUsize::new(0));
        let steps = CountingSteps {
            fail_at: 0,
            reached: Arc::clone(&reached),
        };
        let session = bootstrap(&steps).unwrap();
        assert_eq!(reached.load(Ordering::SeqCst), 4);
        assert_eq!(session.chain.address(), "jkl1test");
        assert_eq!(session.initial_listing.files.len(), 1);
    }

    #[test]
    fn storage_failure_stops_before_preload() {
        let reached = Arc::new(AtomicUsize::new(0));
        let steps = CountingSteps {
            fail_at: 3,
            reached: Arc::clone(&reached),
        };
        let result = bootstrap(&steps);
        assert!(matches!(result, Err(BootstrapError::Storage(_))));
        assert_eq!(reached.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn signer_failure_stops_before_wallet() {
        let reached = Arc::new(AtomicUsize::new(0));
        let steps = CountingSteps {
            fail_at: 1,
            reached: Arc::clone(&reached),
        };
        let result = bootstrap(&steps);
        assert!(matches!(result, Err(BootstrapError::Signer(_))));
        assert_eq!(reached.load(Ordering::SeqCst), 1);
    }
}
