//! Symmetric key material for the cipher engine.
//!
//! A [`SecretKey`] is created once per installation (see `latch-vault`'s
//! keystore) and passed by reference into every [`crate::Cipher`] that needs
//! it — there is no ambient/global key lookup. The raw material is zeroized
//! on drop and masked in `Debug` output.

use std::fmt;

use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CipherError;

/// AES-128 key length in bytes.
pub const AES_128_KEY_LEN: usize = 16;

/// AES-256 key length in bytes.
pub const AES_256_KEY_LEN: usize = 32;

/// Opaque symmetric key material.
///
/// The stored bytes may be longer than an AES key; the cipher engine resolves
/// them deterministically (see [`SecretKey::aes_key`]) so that the same
/// material always keys the same cipher. The same key must be used for every
/// decrypt as was used for the corresponding encrypt.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Wrap raw key material.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] for material shorter than
    /// 16 bytes — there is no way to key AES with it.
    pub fn new(bytes: &[u8]) -> Result<Self, CipherError> {
        if bytes.len() < AES_128_KEY_LEN {
            return Err(CipherError::InvalidKeyLength(bytes.len()));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Generate a fresh 256-bit key from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if the CSPRNG fails.
    pub fn random() -> Result<Self, CipherError> {
        let mut bytes = vec![0u8; AES_256_KEY_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CipherError::RandomSource(format!("key generation failed: {e}")))?;
        Ok(Self { bytes })
    }

    /// Expose the raw material — only for storage round trips.
    #[must_use]
    pub fn expose(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes of raw material.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false` — construction rejects empty material.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Resolve the raw material to a valid AES key, deterministically.
    ///
    /// Exactly 16 or 32 bytes are used as-is. Every other length — longer
    /// or in between — falls back to the first 16 bytes. Existing encrypted
    /// data was written under oversized key material with exactly this
    /// fallback, so it must hold for blobs to keep opening.
    pub(crate) fn aes_key(&self) -> &[u8] {
        match self.bytes.len() {
            AES_128_KEY_LEN | AES_256_KEY_LEN => &self.bytes,
            _ => &self.bytes[..AES_128_KEY_LEN],
        }
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(***)")
    }
}
