//! `latch-vault` — Key lifecycle and entry model for LATCH.
//!
//! Bridges the pure crypto core to its two external collaborators: platform
//! secure storage (behind the [`SecureKeyStore`] capability trait) and the
//! entry store, which persists [`VaultEntry`] fields verbatim and never
//! interprets the encrypted blobs it holds.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;
pub mod keystore;

pub mod entry;

pub mod import;

pub use entry::VaultEntry;
pub use error::VaultError;
pub use import::secret_from_scan;
pub use keystore::{
    delete_key, obtain_key, KeyStoreError, MemoryKeyStore, PlatformKeyStore, SecureKeyStore,
    KEY_ACCOUNT,
};
