//! Vault error types for `latch-vault`.

use latch_crypto_core::{CipherError, OtpError};
use thiserror::Error;

use crate::keystore::KeyStoreError;

/// Errors produced by vault operations.
///
/// Cipher and OTP failures are local and recoverable — the caller treats the
/// affected field as absent and keeps operating on the rest of the entry.
/// Keystore failures during initialization degrade the whole
/// encrypted-storage feature instead.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Encryption or decryption failure (delegated from the crypto core).
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// Key acquisition or storage failure.
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),

    /// Code derivation failure.
    #[error(transparent)]
    Otp(#[from] OtpError),
}
