//! The entry data contract the two engines operate on.
//!
//! A [`VaultEntry`] owns plaintext metadata (website, display name,
//! username, notes) and up to two encrypted blobs: the login password and
//! the TOTP seed. The entry never holds decrypted plaintext as persistent
//! state — decrypted values are transient, produced for the duration of a
//! read and zeroized where intermediate buffers exist.

use latch_crypto_core::cipher::{Cipher, CipherBlob};
use latch_crypto_core::totp::{self, TotpState};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::VaultError;

/// One stored credential.
///
/// Serde round-trips every field verbatim; the external entry store persists
/// the struct with no interpretation of the blob fields.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VaultEntry {
    /// Opaque identity, assigned at creation.
    pub id: String,
    /// Optional display name shown instead of the website.
    pub name: Option<String>,
    /// The site this credential belongs to.
    pub website: String,
    /// Optional login name.
    pub username: Option<String>,
    /// Free-text notes.
    pub notes: String,
    password: Option<CipherBlob>,
    totp_secret: Option<CipherBlob>,
}

impl VaultEntry {
    /// Fresh entry for a website, with no secrets set.
    #[must_use]
    pub fn new(website: impl Into<String>) -> Self {
        Self {
            id: generate_uuid(),
            name: None,
            website: website.into(),
            username: None,
            notes: String::new(),
            password: None,
            totp_secret: None,
        }
    }

    /// Seal a new login password onto the entry.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Cipher`] when encryption fails; the previous
    /// blob (if any) is left untouched in that case.
    pub fn set_password(&mut self, cipher: &Cipher<'_>, plaintext: &str) -> Result<(), VaultError> {
        self.password = Some(cipher.encrypt(plaintext)?);
        Ok(())
    }

    /// Drop the stored password blob.
    pub fn clear_password(&mut self) {
        self.password = None;
    }

    /// Decrypt the stored password.
    ///
    /// `Ok(None)` means no password was ever set; an error means a blob is
    /// present but could not be opened — the two cases stay distinguishable.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Cipher`] for malformed, tampered, or
    /// wrongly-keyed blobs.
    pub fn password(&self, cipher: &Cipher<'_>) -> Result<Option<String>, VaultError> {
        match &self.password {
            Some(blob) => Ok(Some(cipher.decrypt(blob)?)),
            None => Ok(None),
        }
    }

    /// `true` when a password blob is stored.
    #[must_use]
    pub const fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Seal a new TOTP seed onto the entry.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Cipher`] when encryption fails.
    pub fn set_totp_secret(
        &mut self,
        cipher: &Cipher<'_>,
        secret: &str,
    ) -> Result<(), VaultError> {
        self.totp_secret = Some(cipher.encrypt(secret)?);
        Ok(())
    }

    /// Drop the stored TOTP seed blob.
    pub fn clear_totp_secret(&mut self) {
        self.totp_secret = None;
    }

    /// Decrypt the stored TOTP seed. `Ok(None)` when none was ever set.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Cipher`] for malformed, tampered, or
    /// wrongly-keyed blobs.
    pub fn totp_secret(&self, cipher: &Cipher<'_>) -> Result<Option<String>, VaultError> {
        match &self.totp_secret {
            Some(blob) => Ok(Some(cipher.decrypt(blob)?)),
            None => Ok(None),
        }
    }

    /// `true` when a TOTP seed blob is stored.
    #[must_use]
    pub const fn has_totp_secret(&self) -> bool {
        self.totp_secret.is_some()
    }

    /// Derive the current one-time code from the sealed seed.
    ///
    /// Decrypts the seed transiently, derives the code for `now_unix`, and
    /// zeroizes the plaintext seed before returning. `Ok(None)` when the
    /// entry has no seed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Cipher`] when the seed cannot be decrypted and
    /// [`VaultError::Otp`] when a decrypted seed is unusable (empty).
    pub fn current_totp(
        &self,
        cipher: &Cipher<'_>,
        now_unix: u64,
    ) -> Result<Option<TotpState>, VaultError> {
        let Some(blob) = &self.totp_secret else {
            return Ok(None);
        };
        let mut seed = cipher.decrypt(blob)?;
        let state = totp::current_code(&seed, now_unix);
        seed.zeroize();
        Ok(Some(state?))
    }
}

/// Random RFC 4122 version-4 identifier for a fresh entry.
fn generate_uuid() -> String {
    let mut raw = [0u8; 16];
    OsRng.fill_bytes(&mut raw);

    // Version nibble 4, variant bits 10.
    raw[6] = (raw[6] & 0x0F) | 0x40;
    raw[8] = (raw[8] & 0x3F) | 0x80;

    let hex: String = raw.iter().map(|b| format!("{b:02x}")).collect();
    format!(
        "{}-{}-{}-{}-{}",
        &hex[..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..]
    )
}
