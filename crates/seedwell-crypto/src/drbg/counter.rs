//! Fixed-width big-endian counter arithmetic for DRBG state.

use std::fmt;
use zeroize::Zeroize;

/// A fixed-length byte array read as a big-endian unsigned integer.
///
/// All arithmetic is modulo 2^(8 * len): carries out of the most significant
/// byte are discarded, as SP 800-90A requires for `V` and `C`.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteCounter {
    buf: Vec<u8>,
}

impl ByteCounter {
    /// A zeroed counter of `len` bytes.
    pub fn new(len: usize) -> Self {
        ByteCounter { buf: vec![0u8; len] }
    }

    /// A counter holding a copy of `bytes`.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        ByteCounter {
            buf: bytes.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Overwrite the value with `bytes`, which must be exactly `len()` long.
    pub fn set(&mut self, bytes: &[u8]) {
        debug_assert_eq!(bytes.len(), self.buf.len());
        self.buf.copy_from_slice(bytes);
    }

    /// Add one, wrapping to zero on overflow.
    pub fn iterate(&mut self) {
        for byte in self.buf.iter_mut().rev() {
            *byte = byte.wrapping_add(1);
            if *byte != 0 {
                break;
            }
        }
    }

    /// Add `other`, aligned at the least significant end.
    ///
    /// Bytes of `other` beyond this counter's width only contribute to bits
    /// that are discarded anyway, so only its trailing `len()` bytes are read.
    pub fn add_to(&mut self, other: &[u8]) {
        let other = &other[other.len().saturating_sub(self.buf.len())..];
        let mut carry = 0u16;
        let mut addend = other.iter().rev();
        for byte in self.buf.iter_mut().rev() {
            let a = addend.next().copied();
            if a.is_none() && carry == 0 {
                break;
            }
            let sum = *byte as u16 + a.unwrap_or(0) as u16 + carry;
            *byte = sum as u8;
            carry = sum >> 8;
        }
    }

    /// Add a 64-bit value.
    pub fn add_u64(&mut self, value: u64) {
        self.add_to(&value.to_be_bytes());
    }

    /// Whether the counter's value is at least `limit`.
    pub fn compare_limit(&self, limit: u64) -> bool {
        let split = self.buf.len().saturating_sub(8);
        let (high, low) = self.buf.split_at(split);
        if high.iter().any(|&b| b != 0) {
            return true;
        }
        let value = low.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64);
        value >= limit
    }

    /// Set the value to zero, keeping the width.
    pub fn reset(&mut self) {
        self.buf.as_mut_slice().zeroize();
    }
}

impl fmt::Debug for ByteCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteCounter")
            .field("len", &self.buf.len())
            .finish_non_exhaustive()
    }
}

impl Zeroize for ByteCounter {
    fn zeroize(&mut self) {
        self.buf.as_mut_slice().zeroize();
    }
}

impl Drop for ByteCounter {
    fn drop(&mut self) {
        self.buf.zeroize();
    }
}
