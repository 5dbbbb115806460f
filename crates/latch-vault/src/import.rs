//! Scanner-input boundary for TOTP enrollment.
//!
//! An external QR scanner hands over either a raw secret string or an
//! otpauth-style URI. Parsing the surrounding URI is the scanner's concern;
//! this module owns only the extraction rule for the final secret string.

/// Extract the shared secret from scanned text.
///
/// If the text carries a query string with a non-empty `secret` parameter,
/// that value is the secret; otherwise the raw text itself is. This rule is
/// what enrollment QR codes have always been generated against, so it must
/// hold for both plain secrets and full `otpauth://` URIs.
///
/// The parameter value is taken literally — no percent-decoding. Base32
/// secrets never need escaping, and a URI that percent-encodes its secret
/// would have enrolled the literal text under this rule too, so decoding
/// here would break code derivation for it.
#[must_use]
pub fn secret_from_scan(raw: &str) -> String {
    if let Some((_, query)) = raw.split_once('?') {
        for pair in query.split('&') {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            if name == "secret" && !value.is_empty() {
                return value.to_owned();
            }
        }
    }
    raw.to_owned()
}
