// chain-porter-store-sqlite/src/lib.rs
// ============================================================================
// Module: Chain Porter SQLite Store
// Description: Local relational text store backed by SQLite.
// Purpose: Persist text records with per-operation connections.
// Dependencies: rusqlite, serde, thiserror, time
// ============================================================================

//! ## Overview
//! Durable text record store used by the `text_*` tools. Connections are
//! opened and closed per operation, trading a small per-call cost for
//! eliminating cross-call locking concerns. The schema is created on first
//! open and loads fail closed on invalid rows.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::TextRecord;
pub use store::TextStore;
pub use store::TextStoreConfig;
pub use store::TextStoreError;
