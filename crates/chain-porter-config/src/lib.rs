// chain-porter-config/src/lib.rs
// ============================================================================
// Module: Chain Porter Configuration
// Description: Canonical configuration model for the Chain Porter server.
// Purpose: Single validated configuration pass at process start.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded and validated exactly once at process start and
//! injected into the bootstrapper. Handlers never re-read configuration or
//! environment state; the only environment access is the one-time signing
//! mnemonic resolution performed during bootstrap step 1.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod networks;
pub mod signer;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::NetworkConfig;
pub use config::PinningConfig;
pub use config::PorterConfig;
pub use config::StorageGatewayConfig;
pub use config::TextStoreSettings;
pub use config::WeatherConfig;
pub use signer::SignerConfig;
pub use signer::SignerError;
pub use signer::resolve_mnemonic;
