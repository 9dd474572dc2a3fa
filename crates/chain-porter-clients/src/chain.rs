// chain-porter-clients/src/chain.rs
// ============================================================================
// Module: Chain Wallet Client
// Description: Wallet client for balance queries and signed broadcasts.
// Purpose: Provide the funded-transfer and storage-plan operations.
// Dependencies: reqwest, ed25519-dalek, sha2, base64, serde_json
// ============================================================================

//! ## Overview
//! The chain wallet client derives a signing identity from the configured
//! mnemonic, verifies the RPC endpoint serves the expected chain, and signs
//! broadcast payloads over canonical JSON bytes. Transfer amounts are checked
//! against the on-chain balance before broadcast. The chain itself is an
//! external collaborator; this client stops at its HTTP boundary.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chain_porter_config::NetworkConfig;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use serde_json::json;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

use crate::http::build_client;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// RPC request timeout in milliseconds.
const RPC_TIMEOUT_MS: u64 = 10_000;
/// User agent for RPC requests.
const RPC_USER_AGENT: &str = "chain-porter/0.1";
/// Micro units per whole token.
pub const MICRO_PER_TOKEN: u128 = 1_000_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Chain wallet client errors.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Connection or chain identity verification failure.
    #[error("chain connect failed: {0}")]
    Connect(String),
    /// RPC request failure.
    #[error("chain request failed: {0}")]
    Request(String),
    /// Unexpected RPC response payload.
    #[error("chain response invalid: {0}")]
    Response(String),
    /// Broadcast accepted by the endpoint but rejected by the chain.
    #[error("broadcast rejected with code {code}: {log}")]
    Broadcast {
        /// Chain error code.
        code: u64,
        /// Raw chain log line.
        log: String,
    },
    /// Balance below the requested amount plus fee.
    #[error("insufficient funds: need {needed} {denom}, have {available}")]
    InsufficientFunds {
        /// Micro units required including the fee.
        needed: u128,
        /// Micro units available.
        available: u128,
        /// Fee token denomination.
        denom: String,
    },
}

// ============================================================================
// SECTION: Types
// ============================================================================

/// Broadcast receipt returned by the RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub hash: String,
    /// Chain result code; zero means accepted.
    #[serde(default)]
    pub code: u64,
    /// Raw chain log line.
    #[serde(default)]
    pub raw_log: String,
}

/// Proof of wallet control used to register a storage session key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProof {
    /// Wallet address the proof covers.
    pub address: String,
    /// Base64 verifying key.
    pub public_key: String,
    /// Base64 signature over the address bytes.
    pub signature: String,
}

/// Chain status payload returned by the RPC endpoint.
#[derive(Debug, Deserialize)]
struct ChainStatus {
    /// Chain identifier reported by the node.
    chain_id: String,
}

/// Balance payload returned by the RPC endpoint.
#[derive(Debug, Deserialize)]
struct BalanceResponse {
    /// Balance amount in micro units, as a decimal string.
    amount: String,
}

// ============================================================================
// SECTION: Client Trait
// ============================================================================

/// Wallet operations exposed to tool handlers.
pub trait ChainClient: Send + Sync {
    /// Returns the wallet address derived at connect time.
    fn address(&self) -> &str;

    /// Fetches the wallet balance for a denomination, in micro units.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] when the query fails.
    fn balance(&self, denom: &str) -> Result<u128, ChainError>;

    /// Broadcasts a funded transfer of `micro_amount` to `recipient`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on insufficient funds or broadcast failure.
    fn send_tokens(&self, recipient: &str, micro_amount: u128) -> Result<TxReceipt, ChainError>;

    /// Purchases a storage plan of `gigabytes` capacity for `days`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] when the purchase broadcast fails.
    fn buy_storage(&self, gigabytes: u64, days: u64) -> Result<TxReceipt, ChainError>;

    /// Produces a proof of wallet control for session key registration.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] when signing fails.
    fn session_proof(&self) -> Result<SessionProof, ChainError>;
}

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// RPC-backed chain wallet client.
pub struct HttpChainClient {
    /// Network parameters validated at connect time.
    network: NetworkConfig,
    /// Bounded HTTP client for RPC requests.
    client: Client,
    /// Signing key derived from the mnemonic.
    signing_key: SigningKey,
    /// Derived wallet address.
    address: String,
}

impl HttpChainClient {
    /// Connects to the RPC endpoint and verifies the chain identity.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] on unreachable endpoints, chain id mismatch, or
    /// malformed key material.
    pub fn connect(network: &NetworkConfig, mnemonic: &str) -> Result<Self, ChainError> {
        let signing_key = derive_signing_key(mnemonic)?;
        let address = derive_address(&network.address_prefix, &signing_key);
        let client = build_client(RPC_TIMEOUT_MS, RPC_USER_AGENT).map_err(ChainError::Connect)?;
        let status: ChainStatus = get_json(&client, &format!("{}/status", network.rpc_endpoint))?;
        if status.chain_id != network.chain_id {
            return Err(ChainError::Connect(format!(
                "endpoint serves chain {} but config expects {}",
                status.chain_id, network.chain_id
            )));
        }
        Ok(Self {
            network: network.clone(),
            client,
            signing_key,
            address,
        })
    }

    /// Signs and broadcasts a message payload.
    fn broadcast(&self, msg: Value) -> Result<TxReceipt, ChainError> {
        let body = json!({
            "chain_id": self.network.chain_id,
            "fee": {
                "denom": self.network.fee_denom,
                "amount": self.network.fee_amount.to_string(),
                "gas": self.network.gas_limit.to_string(),
            },
            "msg": msg,
        });
        let sign_bytes = serde_json::to_vec(&body)
            .map_err(|_| ChainError::Response("broadcast serialization failed".to_string()))?;
        let signature = self.signing_key.sign(&sign_bytes);
        let envelope = json!({
            "tx": body,
            "public_key": BASE64.encode(self.signing_key.verifying_key().to_bytes()),
            "signature": BASE64.encode(signature.to_bytes()),
        });
        let receipt: TxReceipt = post_json(
            &self.client,
            &format!("{}/txs", self.network.rpc_endpoint),
            &envelope,
        )?;
        if receipt.code != 0 {
            return Err(ChainError::Broadcast {
                code: receipt.code,
                log: receipt.raw_log,
            });
        }
        Ok(receipt)
    }
}

impl ChainClient for HttpChainClient {
    fn address(&self) -> &str {
        &self.address
    }

    fn balance(&self, denom: &str) -> Result<u128, ChainError> {
        let url =
            format!("{}/balances/{}/{}", self.network.rpc_endpoint, self.address, denom);
        let response: BalanceResponse = get_json(&self.client, &url)?;
        response
            .amount
            .parse::<u128>()
            .map_err(|_| ChainError::Response("balance amount is not numeric".to_string()))
    }

    fn send_tokens(&self, recipient: &str, micro_amount: u128) -> Result<TxReceipt, ChainError> {
        let available = self.balance(&self.network.fee_denom)?;
        let needed = micro_amount.saturating_add(u128::from(self.network.fee_amount));
        if available < needed {
            return Err(ChainError::InsufficientFunds {
                needed,
                available,
                denom: self.network.fee_denom.clone(),
            });
        }
        self.broadcast(json!({
            "type": "bank/send",
            "from": self.address,
            "to": recipient,
            "amount": [{
                "denom": self.network.fee_denom,
                "amount": micro_amount.to_string(),
            }],
        }))
    }

    fn buy_storage(&self, gigabytes: u64, days: u64) -> Result<TxReceipt, ChainError> {
        self.broadcast(json!({
            "type": "storage/buy",
            "owner": self.address,
            "gigabytes": gigabytes,
            "duration_days": days,
        }))
    }

    fn session_proof(&self) -> Result<SessionProof, ChainError> {
        let signature = self.signing_key.sign(self.address.as_bytes());
        Ok(SessionProof {
            address: self.address.clone(),
            public_key: BASE64.encode(self.signing_key.verifying_key().to_bytes()),
            signature: BASE64.encode(signature.to_bytes()),
        })
    }
}

// ============================================================================
// SECTION: Key Derivation
// ============================================================================

/// Derives the signing key from a validated mnemonic phrase.
fn derive_signing_key(mnemonic: &str) -> Result<SigningKey, ChainError> {
    let normalized = mnemonic.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(ChainError::Connect("mnemonic must be non-empty".to_string()));
    }
    let seed: [u8; 32] = Sha256::digest(normalized.as_bytes()).into();
    Ok(SigningKey::from_bytes(&seed))
}

/// Derives the wallet address from the verifying key.
fn derive_address(prefix: &str, signing_key: &SigningKey) -> String {
    let digest: [u8; 32] = Sha256::digest(signing_key.verifying_key().to_bytes()).into();
    format!("{prefix}1{}", hex_lower(&digest[..20]))
}

/// Encodes bytes as lowercase hex.
fn hex_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// ============================================================================
// SECTION: Request Helpers
// ============================================================================

/// Issues a GET request and decodes the JSON response.
fn get_json<T: for<'de> Deserialize<'de>>(client: &Client, url: &str) -> Result<T, ChainError> {
    let response =
        client.get(url).send().map_err(|err| ChainError::Request(err.to_string()))?;
    if !response.status().is_success() {
        return Err(ChainError::Request(format!("{url} returned {}", response.status())));
    }
    response.json::<T>().map_err(|err| ChainError::Response(err.to_string()))
}

/// Issues a POST request with a JSON body and decodes the JSON response.
fn post_json<T: for<'de> Deserialize<'de>>(
    client: &Client,
    url: &str,
    body: &Value,
) -> Result<T, ChainError> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .map_err(|err| ChainError::Request(err.to_string()))?;
    if !response.status().is_success() {
        return Err(ChainError::Request(format!("{url} returned {}", response.status())));
    }
    response.json::<T>().map_err(|err| ChainError::Response(err.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only assertions.")]

    use super::derive_address;
    use super::derive_signing_key;
    use super::hex_lower;

    const PHRASE: &str =
        "alpha bravo charlie delta echo foxtrot golf hotel india juliet kilo lima";

    #[test]
    fn key_derivation_is_deterministic() {
        let first = derive_signing_key(PHRASE).unwrap();
        let second = derive_signing_key(PHRASE).unwrap();
        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    #[test]
    fn key_derivation_normalizes_whitespace() {
        let spaced = PHRASE.replace(' ', "  ");
        let first = derive_signing_key(PHRASE).unwrap();
        let second = derive_signing_key(&spaced).unwrap();
        assert_eq!(first.to_bytes(), second.to_bytes());
    }

    #[test]
    fn address_carries_prefix_and_fixed_length() {
        let key = derive_signing_key(PHRASE).unwrap();
        let address = derive_address("jkl", &key);
        assert!(address.starts_with("jkl1"));
        assert_eq!(address.len(), "jkl1".len() + 40);
    }

    #[test]
    fn hex_encoding_is_lowercase() {
        assert_eq!(hex_lower(&[0x00, 0xAB, 0xFF]), "00abff");
    }
}
