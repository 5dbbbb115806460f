//! `latch-crypto-core` — Pure cryptographic primitives for LATCH.
//!
//! This crate is the audit target: zero platform storage, zero async, zero
//! UI dependencies. The only ambient resource it touches is the OS CSPRNG.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod error;

pub mod key;

pub mod cipher;

pub mod totp;

pub use cipher::{Cipher, CipherBlob, IV_LEN, MIN_BLOB_LEN, PREAMBLE_LEN};
pub use error::{CipherError, EncodingError, OtpError};
pub use key::{SecretKey, AES_128_KEY_LEN, AES_256_KEY_LEN};
pub use totp::{current_code, verify_code, TotpState, CODE_DIGITS, PERIOD_SECS};
