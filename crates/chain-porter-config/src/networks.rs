// chain-porter-config/src/networks.rs
// ============================================================================
// Module: Network Presets
// Description: Built-in chain network parameter sets.
// Purpose: Provide working testnet/mainnet defaults for the wallet client.
// Dependencies: chain-porter-config::config
// ============================================================================

//! ## Overview
//! Preset network parameters for the supported chain environments. Values
//! follow the public chain registry entries for the storage network; a local
//! preset supports development against a single-node chain.

use crate::config::NetworkConfig;

/// Storage gateway endpoint paired with the testnet preset.
pub const TESTNET_STORAGE_GATEWAY: &str = "https://testnet-gateway.chainporter.dev";
/// Pinning service endpoint paired with the testnet preset.
pub const TESTNET_PINNING_SERVICE: &str = "https://pins.chainporter.dev";

/// Returns the testnet network preset.
#[must_use]
pub fn testnet() -> NetworkConfig {
    NetworkConfig {
        chain_id: "lupulella-2".to_string(),
        rpc_endpoint: "https://testnet-rpc.chainporter.dev".to_string(),
        address_prefix: "jkl".to_string(),
        fee_denom: "ujkl".to_string(),
        fee_amount: 5_000,
        gas_limit: 200_000,
    }
}

/// Returns the mainnet network preset.
#[must_use]
pub fn mainnet() -> NetworkConfig {
    NetworkConfig {
        chain_id: "jackal-1".to_string(),
        rpc_endpoint: "https://rpc.chainporter.dev".to_string(),
        address_prefix: "jkl".to_string(),
        fee_denom: "ujkl".to_string(),
        fee_amount: 5_000,
        gas_limit: 200_000,
    }
}

/// Returns a local single-node development preset.
#[must_use]
pub fn local() -> NetworkConfig {
    NetworkConfig {
        chain_id: "localporter-1".to_string(),
        rpc_endpoint: "http://localhost:26657".to_string(),
        address_prefix: "porter".to_string(),
        fee_denom: "uport".to_string(),
        fee_amount: 5_000,
        gas_limit: 200_000,
    }
}

#[cfg(test)]
mod tests {
    use super::local;
    use super::mainnet;
    use super::testnet;

    #[test]
    fn presets_use_distinct_chain_ids() {
        let ids = [testnet().chain_id, mainnet().chain_id, local().chain_id];
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert_ne!(ids[0], ids[2]);
    }
}
