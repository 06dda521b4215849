//! SHA-256 helpers.

use sha2::{Digest, Sha256};

/// SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256(bytes: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Lowercase hex-encoded SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex_encode(&sha256(bytes))
}

/// Lowercase hex encoding, written by hand to avoid pulling in a dedicated
/// hex crate for a one-line need.
#[must_use]
pub fn hex_encode(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for &b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}

/// The all-zero genesis hash used as the audit chain's `previousHash` for
/// its first record.
#[must_use]
pub fn genesis_hex() -> String {
    "0".repeat(64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_hex_matches_known_vector() {
        // Standard test vector for the empty string.
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn sha256_is_deterministic() {
        assert_eq!(sha256(b"hello world"), sha256(b"hello world"));
    }

    #[test]
    fn sha256_differs_for_different_input() {
        assert_ne!(sha256(b"a"), sha256(b"b"));
    }

    #[test]
    fn genesis_hex_is_64_zero_chars() {
        let g = genesis_hex();
        assert_eq!(g.len(), 64);
        assert!(g.chars().all(|c| c == '0'));
    }

    #[test]
    fn hex_encode_round_trips_length() {
        let digest = sha256(b"abc");
        assert_eq!(hex_encode(&digest).len(), 64);
    }
}
