#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Property-based tests for time-based code derivation.

use proptest::prelude::*;

use latch_crypto_core::totp::{current_code, verify_code, CODE_DIGITS, PERIOD_SECS};

proptest! {
    /// Derivation is a pure function of (secret, window).
    #[test]
    fn derivation_is_deterministic(secret in ".{1,64}", now in 0u64..=4_000_000_000) {
        let a = current_code(&secret, now).expect("non-empty secret");
        let b = current_code(&secret, now).expect("non-empty secret");
        prop_assert_eq!(a, b);
    }

    /// Codes are always six ASCII digits, countdown always in 2..=31.
    #[test]
    fn output_shape_holds(secret in ".{1,64}", now in 0u64..=4_000_000_000) {
        let state = current_code(&secret, now).expect("non-empty secret");
        prop_assert_eq!(state.code.len(), CODE_DIGITS);
        prop_assert!(state.code.chars().all(|c| c.is_ascii_digit()));
        prop_assert!((2..=31).contains(&state.seconds_remaining));
    }

    /// Any two instants inside one 30-second window share a code.
    #[test]
    fn window_stability(secret in ".{1,64}", window in 0u64..=100_000_000, offset in 0u64..PERIOD_SECS) {
        let aligned = window * PERIOD_SECS;
        let at_start = current_code(&secret, aligned).expect("non-empty secret");
        let within = current_code(&secret, aligned + offset).expect("non-empty secret");
        prop_assert_eq!(at_start.code, within.code);
    }

    /// The freshly derived code always verifies at the same instant.
    #[test]
    fn derived_code_verifies(secret in ".{1,64}", now in 0u64..=4_000_000_000) {
        let state = current_code(&secret, now).expect("non-empty secret");
        prop_assert!(verify_code(&secret, now, &state.code).expect("non-empty secret"));
    }
}
