//! Key material issued by a provider.
//!
//! Keys own their bytes, compare in constant time and wipe themselves on drop.

use seedwell_types::{CryptoError, StreamKeySpec, SymKeySpec};
use std::fmt;
use subtle::ConstantTimeEq;
use zeroize::Zeroize;

/// A block cipher key.
pub struct SymKey {
    spec: SymKeySpec,
    material: Vec<u8>,
}

impl SymKey {
    pub(crate) fn new(spec: SymKeySpec, material: &[u8]) -> Result<Self, CryptoError> {
        let expected = spec.key_length().bytes();
        if material.len() != expected {
            return Err(CryptoError::InvalidKeyLength {
                expected,
                got: material.len(),
            });
        }
        Ok(SymKey {
            spec,
            material: material.to_vec(),
        })
    }

    pub fn spec(&self) -> &SymKeySpec {
        &self.spec
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.material
    }
}

impl PartialEq for SymKey {
    fn eq(&self, other: &Self) -> bool {
        self.spec == other.spec && bool::from(self.material.ct_eq(&other.material))
    }
}

impl Eq for SymKey {}

impl fmt::Debug for SymKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymKey").field("spec", &self.spec).finish_non_exhaustive()
    }
}

impl Drop for SymKey {
    fn drop(&mut self) {
        self.material.zeroize();
    }
}

/// A stream cipher key.
pub struct StreamKey {
    spec: StreamKeySpec,
    material: Vec<u8>,
}

impl StreamKey {
    pub(crate) fn new(spec: StreamKeySpec, material: &[u8]) -> Result<Self, CryptoError> {
        let expected = spec.key_length().bytes();
        if material.len() != expected {
            return Err(CryptoError::InvalidKeyLength {
                expected,
                got: material.len(),
            });
        }
        Ok(StreamKey {
            spec,
            material: material.to_vec(),
        })
    }

    pub fn spec(&self) -> &StreamKeySpec {
        &self.spec
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.material
    }
}

impl PartialEq for StreamKey {
    fn eq(&self, other: &Self) -> bool {
        self.spec == other.spec && bool::from(self.material.ct_eq(&other.material))
    }
}

impl Eq for StreamKey {}

impl fmt::Debug for StreamKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamKey").field("spec", &self.spec).finish_non_exhaustive()
    }
}

impl Drop for StreamKey {
    fn drop(&mut self) {
        self.material.zeroize();
    }
}
