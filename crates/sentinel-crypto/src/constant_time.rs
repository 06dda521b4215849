//! Timing-safe comparison for signatures, hashes, and other secret-adjacent
//! strings.
//!
//! Length is compared up front (lengths are not secret — both the caller
//! and an attacker already know the expected signature format), and the
//! byte contents are compared via [`subtle::ConstantTimeEq`] so branch
//! timing does not leak the position of the first differing byte.

use sentinel_types::Signature;
use subtle::ConstantTimeEq;

/// Constant-time equality for two byte slices of the same length.
/// Slices of differing length are unequal (checked in non-constant time,
/// since the length itself is not treated as secret here).
#[must_use]
pub fn bytes_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && bool::from(a.ct_eq(b))
}

/// Constant-time equality between two signatures.
#[must_use]
pub fn signature_eq(a: &Signature, b: &Signature) -> bool {
    bytes_eq(a.as_str().as_bytes(), b.as_str().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_eq_matches_equal_slices() {
        assert!(bytes_eq(b"abcdef", b"abcdef"));
    }

    #[test]
    fn bytes_eq_rejects_unequal_slices() {
        assert!(!bytes_eq(b"abcdef", b"abcdeg"));
        assert!(!bytes_eq(b"abc", b"abcd"));
    }

    #[test]
    fn signature_eq_matches_constant_time_comparison() {
        let hex = "c".repeat(64);
        let a = Signature::parse(format!("malware:{hex}")).unwrap();
        let b = Signature::parse(format!("malware:{hex}")).unwrap();
        assert!(signature_eq(&a, &b));
    }

    #[test]
    fn signature_eq_rejects_different_signatures() {
        let hex = "c".repeat(64);
        let a = Signature::parse(format!("malware:{hex}")).unwrap();
        let b = Signature::parse(format!("spam:{hex}")).unwrap();
        assert!(!signature_eq(&a, &b));
    }

    // Statistical timing-independence check for invariant 8: run time
    // should not correlate with the position of the first differing byte.
    // This is a coarse smoke test, not a rigorous timing oracle — true
    // side-channel measurement needs a dedicated harness outside unit tests.
    #[test]
    fn bytes_eq_runtime_does_not_depend_on_mismatch_position() {
        use std::time::Instant;

        let base = vec![0xAAu8; 4096];
        let mut early_diff = base.clone();
        early_diff[0] = 0xAB;
        let mut late_diff = base.clone();
        late_diff[4095] = 0xAB;

        let iterations = 2000;
        let time = |other: &[u8]| {
            let start = Instant::now();
            for _ in 0..iterations {
                std::hint::black_box(bytes_eq(&base, std::hint::black_box(other)));
            }
            start.elapsed()
        };

        let early = time(&early_diff);
        let late = time(&late_diff);
        let ratio = early.as_secs_f64().max(1e-9) / late.as_secs_f64().max(1e-9);
        // Generous bound: a short-circuiting comparator would show a ratio
        // far from 1.0 (early mismatch returns almost instantly). This only
        // guards against a gross regression back to `==`, not sub-percent
        // timing leaks.
        assert!(ratio > 0.2 && ratio < 5.0, "suspicious timing ratio: {ratio}");
    }
}
