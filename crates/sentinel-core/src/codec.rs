//! The `Codec` interface the evidence factory optionally compresses
//! through.
//!
//! A real compressing hot-path codec (and its read-capable cold-path
//! counterpart) is an external collaborator per spec §1/§4.8 and is not
//! implemented here. `IdentityCodec` exists only so the `compressed` path
//! through [`crate::factory::EvidenceFactory`] has something non-empty to
//! exercise in tests.

use sentinel_types::SentinelError;

/// A transform applied to already-canonicalized, already-hashed evidence
/// bytes before they are stored. `encode` is required; `decode` is
/// optional — a "hot-path" codec deliberately omits it so compressed
/// evidence cannot be read back inside the hot process (spec §4.8).
pub trait Codec: Send + Sync {
    fn encode(&self, bytes: &[u8]) -> Result<Vec<u8>, SentinelError>;

    /// Default: unsupported. Override only on a "cold-path" codec meant
    /// for forensic access outside the hot process.
    fn decode(&self, _bytes: &[u8]) -> Result<Vec<u8>, SentinelError> {
        Err(SentinelError::Internal("this codec does not support decode".into()))
    }
}

/// A no-op codec: `encode`/`decode` both return the input unchanged. Stands
/// in for "a codec is configured" in tests without depending on a real
/// compression crate; the evidence factory still marks evidence produced
/// through it as `compressed = true`, since compression configuration (not
/// the achieved ratio) is what the flag tracks.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityCodec;

impl Codec for IdentityCodec {
    fn encode(&self, bytes: &[u8]) -> Result<Vec<u8>, SentinelError> {
        Ok(bytes.to_vec())
    }

    fn decode(&self, bytes: &[u8]) -> Result<Vec<u8>, SentinelError> {
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_codec_round_trips() {
        let codec = IdentityCodec;
        let encoded = codec.encode(b"hello").unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), b"hello");
    }

    struct WriteOnlyCodec;
    impl Codec for WriteOnlyCodec {
        fn encode(&self, bytes: &[u8]) -> Result<Vec<u8>, SentinelError> {
            Ok(bytes.to_vec())
        }
    }

    #[test]
    fn codecs_may_omit_decode() {
        let codec = WriteOnlyCodec;
        assert!(codec.encode(b"x").is_ok());
        assert!(codec.decode(b"x").is_err());
    }
}
