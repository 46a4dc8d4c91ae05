//! Trait-based provider mechanism for cryptographic primitives.
//!
//! The primitive traits (`Digest`, `Mac`, `BlockCipher`) are what the
//! generators drive. `CryptoProvider` is the capability set a
//! `RandomFactory` negotiates against: every capability is an explicit
//! predicate paired with a constructor, so support is enumerated per
//! provider rather than discovered at runtime.

use crate::hmac::Hmac;
use crate::keys::{StreamKey, SymKey};
use seedwell_types::{CryptoError, DigestSpec, MacSpec, StreamKeySpec, SymKeySpec};

/// A hash / message digest algorithm.
pub trait Digest: Send + Sync {
    /// The specification this digest implements.
    fn spec(&self) -> &DigestSpec;

    /// The output size in bytes.
    fn output_size(&self) -> usize;

    /// The internal block size in bytes.
    fn block_size(&self) -> usize;

    /// Feed data into the hash state.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize the hash, write the digest to `out` and reset the state.
    /// The length of `out` must be at least `output_size()`.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// Reset the hash state to process a new message.
    fn reset(&mut self);

    /// A fresh context for the same algorithm.
    fn new_instance(&self) -> Box<dyn Digest>;

    /// Hash the concatenation of `parts` into a new buffer.
    fn digest_parts(&mut self, parts: &[&[u8]]) -> Result<Vec<u8>, CryptoError> {
        self.reset();
        for part in parts {
            self.update(part)?;
        }
        let mut out = vec![0u8; self.output_size()];
        self.finish(&mut out)?;
        Ok(out)
    }
}

/// A Message Authentication Code (MAC) algorithm.
pub trait Mac: Send + Sync {
    /// The output size of the MAC in bytes.
    fn output_size(&self) -> usize;

    /// Re-key the MAC. Any buffered input is discarded.
    fn init(&mut self, key: &[u8]) -> Result<(), CryptoError>;

    /// Feed data into the MAC computation.
    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError>;

    /// Finalize, write the MAC value to `out` and reset for reuse with the same key.
    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError>;

    /// Reset the MAC state for reuse with the same key.
    fn reset(&mut self) -> Result<(), CryptoError>;

    /// Human-readable algorithm name.
    fn algorithm_name(&self) -> String;
}

/// A block cipher (e.g., AES).
pub trait BlockCipher: Send + Sync {
    /// Block size in bytes.
    fn block_size(&self) -> usize;

    /// Key size in bytes.
    fn key_size(&self) -> usize;

    /// Set the encryption key.
    fn set_encrypt_key(&mut self, key: &[u8]) -> Result<(), CryptoError>;

    /// Set the decryption key.
    fn set_decrypt_key(&mut self, key: &[u8]) -> Result<(), CryptoError>;

    /// Encrypt a single block in-place.
    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;

    /// Decrypt a single block in-place.
    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError>;
}

/// The capability set of a cryptographic provider.
pub trait CryptoProvider: Send + Sync {
    /// Provider name, used in log output.
    fn name(&self) -> &str;

    /// Whether `spec` is implemented by this provider.
    fn supports_digest(&self, spec: &DigestSpec) -> bool;

    /// Create a digest context for `spec`.
    fn create_digest(&self, spec: &DigestSpec) -> Result<Box<dyn Digest>, CryptoError>;

    /// Whether block ciphers of `spec` are implemented by this provider.
    fn supports_sym_key(&self, spec: &SymKeySpec) -> bool;

    /// Create an unkeyed block cipher for `spec`.
    fn create_block_cipher(&self, spec: &SymKeySpec) -> Result<Box<dyn BlockCipher>, CryptoError>;

    /// Whether keys for stream cipher `spec` can be issued.
    fn supports_stream_key(&self, spec: &StreamKeySpec) -> bool;

    /// Whether MAC `spec` is implemented by this provider.
    fn supports_mac(&self, spec: &MacSpec) -> bool {
        match spec {
            MacSpec::Hmac { digest, .. } => spec.is_valid() && self.supports_digest(digest),
        }
    }

    /// Create a MAC for `spec` keyed with `key`.
    fn create_mac(&self, spec: &MacSpec, key: &[u8]) -> Result<Box<dyn Mac>, CryptoError> {
        if !self.supports_mac(spec) {
            return Err(CryptoError::UnsupportedSpec(spec.to_string()));
        }
        match spec {
            MacSpec::Hmac { digest, .. } => Ok(Box::new(Hmac::new(self.create_digest(digest)?, key)?)),
        }
    }

    /// Materialize a symmetric key from raw key bytes.
    fn create_sym_key(&self, spec: &SymKeySpec, material: &[u8]) -> Result<SymKey, CryptoError> {
        if !spec.is_valid() {
            return Err(CryptoError::InvalidSpec(spec.to_string()));
        }
        if !self.supports_sym_key(spec) {
            return Err(CryptoError::UnsupportedSpec(spec.to_string()));
        }
        SymKey::new(*spec, material)
    }

    /// Materialize a stream cipher key from raw key bytes.
    fn create_stream_key(
        &self,
        spec: &StreamKeySpec,
        material: &[u8],
    ) -> Result<StreamKey, CryptoError> {
        if !spec.is_valid() {
            return Err(CryptoError::InvalidSpec(spec.to_string()));
        }
        if !self.supports_stream_key(spec) {
            return Err(CryptoError::UnsupportedSpec(spec.to_string()));
        }
        StreamKey::new(*spec, material)
    }
}
