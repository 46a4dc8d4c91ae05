//! HMAC (Hash-based Message Authentication Code) implementation.
//!
//! HMAC provides message authentication using a cryptographic hash function
//! combined with a secret key, as defined in RFC 2104.
//!
//! HMAC(K, m) = H((K' XOR opad) || H((K' XOR ipad) || m))
//!
//! where K' is the key padded/hashed to block size, ipad = 0x36, opad = 0x5c.

use crate::provider::{Digest, Mac};
use seedwell_types::CryptoError;
use zeroize::Zeroize;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// HMAC context over any provider digest.
pub struct Hmac {
    /// Inner hash context (initialized with ipad-xored key).
    inner: Box<dyn Digest>,
    /// Outer hash context (initialized with opad-xored key).
    outer: Box<dyn Digest>,
    /// Processed key block (for reset).
    key_block: Vec<u8>,
}

impl Hmac {
    /// Create a new HMAC instance keyed with `key` over `digest`.
    pub fn new(digest: Box<dyn Digest>, key: &[u8]) -> Result<Self, CryptoError> {
        let block_size = digest.block_size();
        let outer = digest.new_instance();
        let mut hmac = Hmac {
            inner: digest,
            outer,
            key_block: vec![0u8; block_size],
        };
        hmac.init(key)?;
        Ok(hmac)
    }

    /// Load `key_block XOR pad` into both contexts.
    fn prime(&mut self) -> Result<(), CryptoError> {
        self.inner.reset();
        self.outer.reset();

        let mut padded: Vec<u8> = self.key_block.iter().map(|b| b ^ IPAD).collect();
        self.inner.update(&padded)?;
        padded
            .iter_mut()
            .zip(&self.key_block)
            .for_each(|(p, k)| *p = k ^ OPAD);
        self.outer.update(&padded)?;
        padded.zeroize();
        Ok(())
    }

    /// One-shot HMAC computation.
    pub fn mac(digest: Box<dyn Digest>, key: &[u8], data: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut ctx = Self::new(digest, key)?;
        ctx.update(data)?;
        let mut out = vec![0u8; ctx.output_size()];
        ctx.finish(&mut out)?;
        Ok(out)
    }
}

impl Mac for Hmac {
    fn output_size(&self) -> usize {
        self.inner.output_size()
    }

    fn init(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        let block_size = self.key_block.len();
        self.key_block.zeroize();
        self.key_block.resize(block_size, 0);

        // Keys longer than a block are hashed first.
        if key.len() > block_size {
            let mut hashed_key = self.inner.digest_parts(&[key])?;
            self.key_block[..hashed_key.len()].copy_from_slice(&hashed_key);
            hashed_key.zeroize();
        } else {
            self.key_block[..key.len()].copy_from_slice(key);
        }
        self.prime()
    }

    fn update(&mut self, data: &[u8]) -> Result<(), CryptoError> {
        self.inner.update(data)
    }

    fn finish(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        let output_size = self.inner.output_size();
        if out.len() < output_size {
            return Err(CryptoError::BufferTooSmall {
                need: output_size,
                got: out.len(),
            });
        }
        let mut inner_hash = vec![0u8; output_size];
        self.inner.finish(&mut inner_hash)?;

        self.outer.update(&inner_hash)?;
        inner_hash.zeroize();

        self.outer.finish(out)?;
        self.prime()
    }

    fn reset(&mut self) -> Result<(), CryptoError> {
        self.prime()
    }

    fn algorithm_name(&self) -> String {
        format!("HMAC-{}", self.inner.spec())
    }
}

impl Drop for Hmac {
    fn drop(&mut self) {
        self.key_block.zeroize();
    }
}
