//! Unified hash module.
//!
//! `SoftDigest` adapts the RustCrypto hash implementations (SHA-1, SHA-2,
//! SHA-3) to the provider [`Digest`] trait. Any other digest family is
//! reported as unsupported.

use digest::DynDigest;
use seedwell_types::{CryptoError, DigestLength, DigestSpec, DigestType};

pub use crate::provider::Digest;

/// Whether `spec` has a software implementation.
pub fn is_supported(spec: &DigestSpec) -> bool {
    spec.is_valid() && matches!(spec.digest_type(), DigestType::Sha1 | DigestType::Sha2 | DigestType::Sha3)
}

fn new_inner(spec: &DigestSpec) -> Option<Box<dyn DynDigest + Send + Sync>> {
    use DigestLength::*;
    let inner: Box<dyn DynDigest + Send + Sync> = match (spec.digest_type(), spec.length()) {
        (DigestType::Sha1, Len160) => Box::new(sha1::Sha1::default()),
        (DigestType::Sha2, Len224) => Box::new(sha2::Sha224::default()),
        (DigestType::Sha2, Len256) => Box::new(sha2::Sha256::default()),
        (DigestType::Sha2, Len384) => Box::new(sha2::Sha384::default()),
        (DigestType::Sha2, Len512) => Box::new(sha2::Sha512::default()),
        (DigestType::Sha3, Len224) => Box::new(sha3::Sha3_224::default()),
        (DigestType::Sha3, Len256) => Box::new(sha3::Sha3_256::default()),
        (DigestType::Sha3, Len384) => Box::new(sha3::Sha3_384::default()),
        (DigestType::Sha3, Len512) => Box::new(sha3::Sha3_512::default()),
        _ => return None,
    };
    Some(inner)
}

/// Software digest context.
pub struct SoftDigest {
    spec: DigestSpec,
    inner: Box<dyn DynDigest + Send + Sync>,
}

impl SoftDigest {
    pub fn new(spec: &DigestSpec) -> Result<Self, CryptoError> {
        if !spec.is_valid() {
            return Err(CryptoError::InvalidSpec(spec.to_string()));
        }
        let inner = new_inner(spec).ok_or_else(|| CryptoError::UnsupportedSpec(spec.to_string()))?;
        Ok(SoftDigest { spec: *spec, inner })
    }
}

impl Digest for SoftDigest {
    fn spec(&self) -> &DigestSpec {
        &self.spec
    }

    fn output_size(&self) -> usize {
        self.inner.output_size()
    }

    fn block_size(&self) -> usize {
        self.spec.digest_type().block_size(self.spec.length())
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data);
        Ok(())
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let size = self.inner.output_size();
        if out.len() < size {
            return Err(CryptoError::BufferTooSmall {
                need: size,
                got: out.len(),
            });
        }
        self.inner
            .finalize_into_reset(&mut out[..size])
            .map_err(|_| CryptoError::BufferTooSmall {
                need: size,
                got: out.len(),
            })
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn new_instance(&self) -> Box<dyn Digest> {
        // `new` already accepted this digest.
        match new_inner(&self.spec) {
            Some(inner) => Box::new(SoftDigest {
                spec: self.spec,
                inner,
            }),
            None => unreachable!("spec {} was validated at construction", self.spec),
        }
    }
}
