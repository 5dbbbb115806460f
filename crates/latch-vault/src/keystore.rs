//! Long-lived cipher key acquisition against platform secure storage.
//!
//! The cipher key is created once per installation, persisted under a fixed
//! application-scoped account, and read back on every subsequent start. The
//! crypto core never sees the storage mechanism — only [`SecureKeyStore`],
//! with one implementation per target ([`PlatformKeyStore`] over the OS
//! keychain/keyring, [`MemoryKeyStore`] for tests and headless use).
//!
//! [`obtain_key`] is expected to run once at process start, on one thread.
//! Its failure is fatal to the encrypted-storage feature: the caller must
//! not fall back to a zero key and keep treating stored secrets as
//! trustworthy.

use std::collections::HashMap;
use std::sync::Mutex;

use keyring::{Entry, Error as KeyringError};
use latch_crypto_core::{CipherError, SecretKey};
use thiserror::Error;
use zeroize::Zeroize;

/// Fixed application-scoped account under which the cipher key is stored.
pub const KEY_ACCOUNT: &str = "dev.latch.vault.cipher-key";

/// Service name presented to the platform keychain/keyring.
const SERVICE_NAME: &str = "dev.latch.vault";

/// Errors produced by key acquisition and storage.
#[derive(Debug, Error)]
pub enum KeyStoreError {
    /// Platform secure storage unreachable or returned an unexpected status.
    #[error("secure storage error: {0}")]
    Storage(String),

    /// The key read back after enrollment does not match the key written.
    /// Fatal: the storage layer cannot be trusted with key material.
    #[error("stored key does not match the key written during enrollment")]
    RoundTripMismatch,

    /// Stored material cannot be used as a cipher key.
    #[error(transparent)]
    Key(#[from] CipherError),
}

/// Capability interface over one named secure-storage record.
///
/// Implementations map to the platform's tri-state semantics: success,
/// not-found (`Ok(None)` on read, success on delete), and other errors.
pub trait SecureKeyStore {
    /// Read the record stored under `account`. `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Storage`] when the backing store fails.
    fn read(&self, account: &str) -> Result<Option<Vec<u8>>, KeyStoreError>;

    /// Store `data` under `account`.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Storage`] when the backing store fails.
    fn store(&self, account: &str, data: &[u8]) -> Result<(), KeyStoreError>;

    /// Delete the record under `account`. Not-found is success.
    ///
    /// # Errors
    ///
    /// Returns [`KeyStoreError::Storage`] when the backing store fails.
    fn delete(&self, account: &str) -> Result<(), KeyStoreError>;
}

/// Acquire the installation's cipher key, enrolling one on first run.
///
/// An existing key is returned as-is — this function never overwrites it.
/// On first run a fresh 256-bit key is generated, written (the only write
/// this function ever performs), and read back to confirm the storage round
/// trip before it is trusted for encryption.
///
/// # Errors
///
/// - [`KeyStoreError::Storage`] — secure storage unreachable
/// - [`KeyStoreError::RoundTripMismatch`] — the read-back differs from what
///   was written
/// - [`KeyStoreError::Key`] — stored material is too short to key the cipher
pub fn obtain_key(store: &dyn SecureKeyStore) -> Result<SecretKey, KeyStoreError> {
    if let Some(mut existing) = store.read(KEY_ACCOUNT)? {
        let key = SecretKey::new(&existing);
        existing.zeroize();
        return Ok(key?);
    }

    let key = SecretKey::random()?;
    store.store(KEY_ACCOUNT, key.expose())?;

    let Some(mut read_back) = store.read(KEY_ACCOUNT)? else {
        return Err(KeyStoreError::RoundTripMismatch);
    };
    let confirmed = read_back.as_slice() == key.expose();
    read_back.zeroize();
    if !confirmed {
        return Err(KeyStoreError::RoundTripMismatch);
    }
    Ok(key)
}

/// Remove the installation's cipher key. Idempotent — deleting a key that
/// was never enrolled (or was already deleted) succeeds.
///
/// # Errors
///
/// Returns [`KeyStoreError::Storage`] when the backing store fails.
pub fn delete_key(store: &dyn SecureKeyStore) -> Result<(), KeyStoreError> {
    store.delete(KEY_ACCOUNT)
}

// ---------------------------------------------------------------------------
// Platform implementation
// ---------------------------------------------------------------------------

/// OS keychain/keyring-backed store.
pub struct PlatformKeyStore {
    service: String,
}

impl PlatformKeyStore {
    /// Store scoped to the application's fixed service name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_owned(),
        }
    }

    /// Store scoped to a custom service name (parallel installs, tests).
    #[must_use]
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, account: &str) -> Result<Entry, KeyStoreError> {
        Entry::new(&self.service, account).map_err(|e| KeyStoreError::Storage(e.to_string()))
    }
}

impl Default for PlatformKeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SecureKeyStore for PlatformKeyStore {
    fn read(&self, account: &str) -> Result<Option<Vec<u8>>, KeyStoreError> {
        match self.entry(account)?.get_secret() {
            Ok(data) => Ok(Some(data)),
            Err(KeyringError::NoEntry) => Ok(None),
            Err(e) => Err(KeyStoreError::Storage(e.to_string())),
        }
    }

    fn store(&self, account: &str, data: &[u8]) -> Result<(), KeyStoreError> {
        self.entry(account)?
            .set_secret(data)
            .map_err(|e| KeyStoreError::Storage(e.to_string()))
    }

    fn delete(&self, account: &str) -> Result<(), KeyStoreError> {
        match self.entry(account)?.delete_credential() {
            Ok(()) | Err(KeyringError::NoEntry) => Ok(()),
            Err(e) => Err(KeyStoreError::Storage(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

/// In-process store for tests and headless environments.
#[derive(Default)]
pub struct MemoryKeyStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryKeyStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureKeyStore for MemoryKeyStore {
    fn read(&self, account: &str) -> Result<Option<Vec<u8>>, KeyStoreError> {
        let records = self
            .records
            .lock()
            .map_err(|_| KeyStoreError::Storage("memory store lock poisoned".into()))?;
        Ok(records.get(account).cloned())
    }

    fn store(&self, account: &str, data: &[u8]) -> Result<(), KeyStoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| KeyStoreError::Storage("memory store lock poisoned".into()))?;
        records.insert(account.to_owned(), data.to_vec());
        Ok(())
    }

    fn delete(&self, account: &str) -> Result<(), KeyStoreError> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| KeyStoreError::Storage("memory store lock poisoned".into()))?;
        records.remove(account);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
