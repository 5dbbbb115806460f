//! AES-CBC cipher engine for per-field secrets.
//!
//! This module provides:
//! - [`Cipher`] — encrypt/decrypt UTF-8 strings with a borrowed [`SecretKey`]
//! - [`CipherBlob`] — the self-describing binary container (IV + ciphertext)
//!
//! # Framing
//!
//! Wire format: `iv (16 bytes) || ciphertext`, where the ciphertext is
//! AES-CBC/PKCS#7 over `preamble (16 random bytes) || plaintext`. The
//! preamble is folded into the plaintext *before* encryption — it raises the
//! entropy of short, low-variance secrets and is discarded on decrypt.
//!
//! # No authentication tag
//!
//! CBC with padding provides confidentiality only. Tampered ciphertext is
//! caught by the padding check or by UTF-8 validation, both surfaced as
//! decrypt errors. This framing is kept for compatibility with existing
//! encrypted data; it is not an authenticated construction.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::error::{CipherError, EncodingError};
use crate::key::{SecretKey, AES_128_KEY_LEN};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Random preamble length in bytes, prepended to the plaintext.
pub const PREAMBLE_LEN: usize = 16;

/// CBC initialization vector length in bytes (one AES block).
pub const IV_LEN: usize = 16;

/// Minimum length of a well-formed blob: the IV plus one ciphertext block.
pub const MIN_BLOB_LEN: usize = 32;

// ---------------------------------------------------------------------------
// CipherBlob
// ---------------------------------------------------------------------------

/// Opaque encrypted container — `iv || ciphertext`.
///
/// Produced by [`Cipher::encrypt`]; the external entry store persists it
/// verbatim with no interpretation. Every blob produced by `encrypt` is at
/// least [`MIN_BLOB_LEN`] bytes.
#[must_use = "encrypted data must be stored or it is lost"]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CipherBlob(Vec<u8>);

impl CipherBlob {
    /// Wrap raw bytes read back from the entry store.
    ///
    /// No validation happens here — [`Cipher::decrypt`] rejects malformed
    /// input, so stored blobs from any source can be carried around.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw wire bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume the blob, yielding the raw wire bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Blob length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` for a zero-length blob.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for CipherBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CipherBlob({} bytes)", self.0.len())
    }
}

// ---------------------------------------------------------------------------
// Cipher
// ---------------------------------------------------------------------------

/// Symmetric cipher engine over a borrowed process-wide key.
///
/// Construct one per call site with [`Cipher::new`]; the engine is stateless
/// per call and safe to use from multiple threads as long as the key is
/// immutable after acquisition.
pub struct Cipher<'k> {
    key: &'k SecretKey,
}

impl<'k> Cipher<'k> {
    /// Bind the engine to the key obtained at startup.
    #[must_use]
    pub const fn new(key: &'k SecretKey) -> Self {
        Self { key }
    }

    /// Encrypt a UTF-8 string into a [`CipherBlob`].
    ///
    /// Generates a random 16-byte preamble and a random 16-byte IV per call,
    /// so encrypting the same plaintext twice yields different blobs.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::RandomSource`] if the CSPRNG fails and
    /// [`CipherError::Encryption`] if cipher setup fails.
    pub fn encrypt(&self, plaintext: &str) -> Result<CipherBlob, CipherError> {
        let mut preamble = [0u8; PREAMBLE_LEN];
        OsRng
            .try_fill_bytes(&mut preamble)
            .map_err(|e| CipherError::RandomSource(format!("preamble generation failed: {e}")))?;

        let mut iv = [0u8; IV_LEN];
        OsRng
            .try_fill_bytes(&mut iv)
            .map_err(|e| CipherError::RandomSource(format!("IV generation failed: {e}")))?;

        let capacity = PREAMBLE_LEN.saturating_add(plaintext.len());
        let mut combined = Vec::with_capacity(capacity);
        combined.extend_from_slice(&preamble);
        combined.extend_from_slice(plaintext.as_bytes());

        let key = self.key.aes_key();
        let ciphertext = if key.len() == AES_128_KEY_LEN {
            Aes128CbcEnc::new_from_slices(key, &iv)
                .map_err(|_| CipherError::Encryption("cipher key setup failed".into()))?
                .encrypt_padded_vec_mut::<Pkcs7>(&combined)
        } else {
            Aes256CbcEnc::new_from_slices(key, &iv)
                .map_err(|_| CipherError::Encryption("cipher key setup failed".into()))?
                .encrypt_padded_vec_mut::<Pkcs7>(&combined)
        };
        combined.zeroize();
        preamble.zeroize();

        let mut out = Vec::with_capacity(IV_LEN.saturating_add(ciphertext.len()));
        out.extend_from_slice(&iv);
        out.extend_from_slice(&ciphertext);
        Ok(CipherBlob(out))
    }

    /// Decrypt a [`CipherBlob`] back into the original string.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MalformedBlob`] — blob shorter than the 16-byte IV
    /// - [`CipherError::Decryption`] — padding check rejected the ciphertext
    ///   (tampered data or wrong key), or the plaintext lost its preamble
    /// - [`CipherError::Encoding`] — decrypted bytes are not valid UTF-8
    pub fn decrypt(&self, blob: &CipherBlob) -> Result<String, CipherError> {
        let bytes = blob.as_bytes();
        if bytes.len() < IV_LEN {
            return Err(CipherError::MalformedBlob { len: bytes.len() });
        }
        let (iv, ciphertext) = bytes.split_at(IV_LEN);

        let key = self.key.aes_key();
        let mut decrypted = if key.len() == AES_128_KEY_LEN {
            Aes128CbcDec::new_from_slices(key, iv)
                .map_err(|_| CipherError::Encryption("cipher key setup failed".into()))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CipherError::Decryption)?
        } else {
            Aes256CbcDec::new_from_slices(key, iv)
                .map_err(|_| CipherError::Encryption("cipher key setup failed".into()))?
                .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
                .map_err(|_| CipherError::Decryption)?
        };

        if decrypted.len() < PREAMBLE_LEN {
            decrypted.zeroize();
            return Err(CipherError::Decryption);
        }

        // The leading 16 bytes are the random preamble; only the tail is
        // the caller's plaintext.
        let plaintext_bytes = decrypted.split_off(PREAMBLE_LEN);
        decrypted.zeroize();

        String::from_utf8(plaintext_bytes).map_err(|e| {
            let mut garbled = e.into_bytes();
            garbled.zeroize();
            CipherError::Encoding(EncodingError::InvalidUtf8)
        })
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
