//! Time-based one-time code derivation.
//!
//! Fixed parameters: 30-second period, 6 digits, HMAC-SHA1 via `ring::hmac`.
//!
//! The derivation deliberately diverges from RFC 6238 in two preserved ways:
//! the secret is used as a raw UTF-8 string (never base32-decoded), and the
//! rolling counter keys the HMAC while the secret is the message — the
//! reverse of the canonical assignment. Every secret already enrolled was
//! generated against this scheme, so both generation and verification keep it.

use ring::hmac;

use crate::error::OtpError;

/// Code refresh period in seconds.
pub const PERIOD_SECS: u64 = 30;

/// Number of digits in a derived code.
pub const CODE_DIGITS: usize = 6;

/// Truncation modulus (10^6).
const CODE_MODULUS: u32 = 1_000_000;

/// One derived code plus the countdown signal for its display.
///
/// Pure value: the same `(secret, 30-second window)` pair always yields the
/// same code. Recomputed on every tick; callers typically update the UI only
/// when `code` changes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TotpState {
    /// Six-digit, zero-padded code.
    pub code: String,
    /// Seconds until the next code, biased by one (range `2..=31`).
    pub seconds_remaining: u64,
}

/// Constant-time byte comparison for derived codes.
///
/// The early return on length mismatch is fine — the digit count is public.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Derive the code for the current 30-second window.
///
/// `now_unix` is seconds since the UNIX epoch. The countdown is biased by
/// one second so a ticking display never reads 0 while the current code is
/// still valid — it reads 31 exactly on a period boundary and 2 one second
/// before the next one.
///
/// # Errors
///
/// Returns [`OtpError::EmptySecret`] if `secret` is empty — there is no key
/// material to derive from.
#[must_use = "derived code should be displayed or verified"]
pub fn current_code(secret: &str, now_unix: u64) -> Result<TotpState, OtpError> {
    if secret.is_empty() {
        return Err(OtpError::EmptySecret);
    }

    // counter = floor(now / period); PERIOD_SECS is a nonzero constant.
    #[allow(clippy::arithmetic_side_effects)]
    let counter = now_unix / PERIOD_SECS;
    let code = derive_code(secret.as_bytes(), counter);

    #[allow(clippy::arithmetic_side_effects)]
    let elapsed = now_unix % PERIOD_SECS;
    let seconds_remaining = PERIOD_SECS.saturating_sub(elapsed).saturating_add(1);

    Ok(TotpState {
        code,
        seconds_remaining,
    })
}

/// Check a candidate code against the current window in constant time.
///
/// Matches only the window containing `now_unix` — no ±1 step tolerance,
/// mirroring how enrolled secrets have always been verified.
///
/// # Errors
///
/// Returns [`OtpError::EmptySecret`] if `secret` is empty.
#[must_use = "verification result should be checked"]
pub fn verify_code(secret: &str, now_unix: u64, candidate: &str) -> Result<bool, OtpError> {
    let state = current_code(secret, now_unix)?;
    Ok(constant_time_eq(state.code.as_bytes(), candidate.as_bytes()))
}

/// HMAC-SHA1 dynamic truncation over the reversed key/message assignment.
fn derive_code(secret: &[u8], counter: u64) -> String {
    // The counter keys the HMAC; the enrolled secret is the message.
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, &counter.to_be_bytes());
    let tag = hmac::sign(&key, secret);
    let mac = tag.as_ref();

    // Offset from the last byte's low nibble; SHA-1 MACs are 20 bytes, so
    // the 4-byte window at offset <= 15 always fits.
    let offset = usize::from(mac[mac.len().wrapping_sub(1)] & 0x0F);
    let binary_code = u32::from_be_bytes([
        mac[offset] & 0x7F,
        mac[offset.wrapping_add(1)],
        mac[offset.wrapping_add(2)],
        mac[offset.wrapping_add(3)],
    ]);

    // CODE_MODULUS is never zero.
    #[allow(clippy::arithmetic_side_effects)]
    let code = binary_code % CODE_MODULUS;
    format!("{code:06}")
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "12345678901234567890";

    #[test]
    fn same_inputs_yield_same_code() {
        let a = current_code(SECRET, 1_234_567_890).unwrap();
        let b = current_code(SECRET, 1_234_567_890).unwrap();
        assert_eq!(a, b, "derivation must be a pure function");
    }

    #[test]
    fn code_is_six_zero_padded_digits() {
        let state = current_code(SECRET, 59).unwrap();
        assert_eq!(state.code.len(), CODE_DIGITS);
        assert!(state.code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn code_is_stable_within_a_window() {
        // Window [1_234_567_890 - aligned): 1_234_567_890 / 30 = 41_152_263,
        // so seconds 1_234_567_890..=1_234_567_919 share a counter.
        let base = 1_234_567_890;
        assert_eq!(base % PERIOD_SECS, 0, "test anchor must be window-aligned");
        let first = current_code(SECRET, base).unwrap();
        let last = current_code(SECRET, base + 29).unwrap();
        assert_eq!(first.code, last.code);
    }

    #[test]
    fn code_changes_across_window_boundary() {
        let base = 1_234_567_890;
        let before = current_code(SECRET, base + 29).unwrap();
        let after = current_code(SECRET, base + 30).unwrap();
        // Adjacent windows colliding on the same 6 digits is a one-in-a-million
        // accident; treat equality as a failure.
        assert_ne!(before.code, after.code);
    }

    #[test]
    fn different_secrets_yield_different_codes() {
        let a = current_code("secret-a", 1_234_567_890).unwrap();
        let b = current_code("secret-b", 1_234_567_890).unwrap();
        assert_ne!(a.code, b.code);
    }

    #[test]
    fn countdown_reads_31_on_a_period_boundary() {
        let state = current_code(SECRET, 1_234_567_890).unwrap();
        assert_eq!(state.seconds_remaining, 31);
    }

    #[test]
    fn countdown_reads_2_one_second_before_the_boundary() {
        let state = current_code(SECRET, 1_234_567_890 + 29).unwrap();
        assert_eq!(state.seconds_remaining, 2);
    }

    #[test]
    fn countdown_at_epoch_start() {
        let state = current_code(SECRET, 0).unwrap();
        assert_eq!(state.seconds_remaining, 31);
    }

    #[test]
    fn countdown_never_reaches_zero_or_one() {
        for now in 0..120 {
            let state = current_code(SECRET, now).unwrap();
            assert!(
                (2..=31).contains(&state.seconds_remaining),
                "countdown {} out of range at t={now}",
                state.seconds_remaining
            );
        }
    }

    #[test]
    fn empty_secret_returns_error() {
        let result = current_code("", 1_000_000);
        assert!(
            matches!(result, Err(OtpError::EmptySecret)),
            "empty secret should yield OtpError::EmptySecret, got: {result:?}"
        );
    }

    #[test]
    fn verify_accepts_current_code() {
        let now = 1_234_567_890;
        let state = current_code(SECRET, now).unwrap();
        assert!(verify_code(SECRET, now, &state.code).unwrap());
    }

    #[test]
    fn verify_rejects_altered_code() {
        let now = 1_234_567_890;
        let state = current_code(SECRET, now).unwrap();
        // Flip the first digit deterministically.
        let mut altered: Vec<char> = state.code.chars().collect();
        altered[0] = if altered[0] == '0' { '1' } else { '0' };
        let altered: String = altered.into_iter().collect();
        assert!(!verify_code(SECRET, now, &altered).unwrap());
    }

    #[test]
    fn verify_rejects_wrong_length_code() {
        assert!(!verify_code(SECRET, 1_234_567_890, "12345").unwrap());
    }

    #[test]
    fn verify_empty_secret_returns_error() {
        let result = verify_code("", 1_000_000, "123456");
        assert!(matches!(result, Err(OtpError::EmptySecret)));
    }
}
