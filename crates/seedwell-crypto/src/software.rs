//! Pure-software provider backed by the RustCrypto primitives.

use crate::aes::AesCipher;
use crate::hash::{self, SoftDigest};
use crate::provider::{BlockCipher, CryptoProvider, Digest};
use seedwell_types::{CryptoError, DigestSpec, StreamKeySpec, StreamKeyType, SymKeySpec, SymKeyType};

/// SHA-1, SHA-2, SHA-3 digests, AES block ciphers, and ChaCha20/Salsa20
/// family stream keys.
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareProvider;

impl CryptoProvider for SoftwareProvider {
    fn name(&self) -> &str {
        "software"
    }

    fn supports_digest(&self, spec: &DigestSpec) -> bool {
        hash::is_supported(spec)
    }

    fn create_digest(&self, spec: &DigestSpec) -> Result<Box<dyn Digest>, CryptoError> {
        Ok(Box::new(SoftDigest::new(spec)?))
    }

    fn supports_sym_key(&self, spec: &SymKeySpec) -> bool {
        spec.is_valid() && spec.key_type() == SymKeyType::Aes
    }

    fn create_block_cipher(&self, spec: &SymKeySpec) -> Result<Box<dyn BlockCipher>, CryptoError> {
        if !spec.is_valid() {
            return Err(CryptoError::InvalidSpec(spec.to_string()));
        }
        if !self.supports_sym_key(spec) {
            return Err(CryptoError::UnsupportedSpec(spec.to_string()));
        }
        Ok(Box::new(AesCipher::new(spec.key_length())))
    }

    fn supports_stream_key(&self, spec: &StreamKeySpec) -> bool {
        spec.is_valid()
            && matches!(
                spec.key_type(),
                StreamKeyType::ChaCha20 | StreamKeyType::XChaCha20 | StreamKeyType::Salsa20
            )
    }
}
