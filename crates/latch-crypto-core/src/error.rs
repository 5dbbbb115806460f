//! Cryptographic error types for `latch-crypto-core`.

use thiserror::Error;

/// Errors produced by the cipher engine and key material handling.
#[derive(Debug, Error)]
pub enum CipherError {
    /// Blob too short to carry an IV — not produced by [`crate::Cipher::encrypt`].
    #[error("cipher blob too short: {len} bytes (minimum 16 for the IV)")]
    MalformedBlob {
        /// Observed blob length in bytes.
        len: usize,
    },

    /// The OS CSPRNG failed to produce bytes.
    #[error("secure random generation failed: {0}")]
    RandomSource(String),

    /// Key material too short to key the block cipher.
    #[error("invalid key material: {0} bytes (minimum 16)")]
    InvalidKeyLength(usize),

    /// Cipher setup or encryption failure.
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Padding check rejected the ciphertext — tampered data or wrong key.
    #[error("decryption failed: padding check rejected the ciphertext")]
    Decryption,

    /// Decrypted bytes could not be interpreted as text.
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

/// Text-encoding failures surfaced by decryption.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The decrypted byte sequence is not valid UTF-8.
    #[error("decrypted bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// TOTP generation or verification error.
#[derive(Debug, Error)]
pub enum OtpError {
    /// No usable secret — an empty string cannot key the derivation.
    #[error("TOTP secret must not be empty")]
    EmptySecret,
}
