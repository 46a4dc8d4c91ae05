//! Deterministic Random Bit Generators (NIST SP 800-90A, ANSI X9.31).
//!
//! Provides four generator constructions behind the common [`Drbg`] trait:
//! - Hash-DRBG (SP 800-90A §10.1.1) over any provider digest
//! - HMAC-DRBG (SP 800-90A §10.1.2) over any provider digest
//! - CTR-DRBG (SP 800-90A §10.2, with derivation function) over any provider block cipher
//! - X9.31 (ANSI X9.31 A.2.4) over any provider block cipher
//!
//! plus [`CombinedDrbg`], which XORs a cipher-based and a hash-based generator.
//!
//! Generators are mutable state with a single owner. They are `Send` but
//! take `&mut self` everywhere; callers that share one across threads must
//! wrap it in their own lock.

mod counter;
pub use counter::ByteCounter;

pub mod hash_drbg;
pub use hash_drbg::HashDrbg;

mod hmac_drbg;
pub use hmac_drbg::HmacDrbg;

pub mod ctr_drbg;
pub use ctr_drbg::CtrDrbg;

mod x931;
pub use x931::X931Rng;

mod combined;
pub use combined::CombinedDrbg;

use seedwell_types::CryptoError;

/// Default maximum number of generate requests between reseeds (SP 800-90A table 2).
pub const DEFAULT_RESEED_INTERVAL: u64 = 1 << 48;

/// Default maximum bits per generate request (SP 800-90A table 2).
pub const DEFAULT_MAX_BITS_PER_REQUEST: usize = 1 << 19;

/// Outcome of a generate request that did not fail fatally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// The output buffer was filled with this many bits.
    Generated(usize),
    /// The reseed interval is exhausted; nothing was produced and the
    /// generator state is unchanged. Call `reseed` and retry.
    ReseedRequired,
}

impl GenerateOutcome {
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

/// Per-generator limits.
///
/// The right values depend on the deployment's compliance target, so they
/// are configuration rather than constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrbgConfig {
    /// Number of successful generate requests allowed between reseeds.
    pub reseed_interval: u64,
    /// Largest single request, in bits.
    pub max_bits_per_request: usize,
}

impl Default for DrbgConfig {
    fn default() -> Self {
        DrbgConfig {
            reseed_interval: DEFAULT_RESEED_INTERVAL,
            max_bits_per_request: DEFAULT_MAX_BITS_PER_REQUEST,
        }
    }
}

impl DrbgConfig {
    /// X9.31 limits for a cipher with `block_len`-byte blocks.
    pub fn x931(block_len: usize) -> Self {
        if block_len == 8 {
            DrbgConfig {
                reseed_interval: 1 << 15,
                max_bits_per_request: 1 << 12,
            }
        } else {
            DrbgConfig {
                reseed_interval: 1 << 23,
                max_bits_per_request: 1 << 19,
            }
        }
    }

    /// Maximum request size in whole bytes.
    pub fn max_request_bytes(&self) -> usize {
        self.max_bits_per_request / 8
    }

    /// Reject requests larger than the configured maximum.
    pub(crate) fn check_request(&self, len: usize) -> Result<(), CryptoError> {
        let requested = len.saturating_mul(8);
        if requested > self.max_bits_per_request {
            return Err(CryptoError::RequestTooLarge {
                requested,
                max: self.max_bits_per_request,
            });
        }
        Ok(())
    }
}

/// A deterministic random bit generator.
pub trait Drbg: Send {
    /// Fill `output` with pseudorandom bytes.
    ///
    /// With `prediction_resistant` set, fresh entropy is injected before any
    /// output is produced. Requests above the configured maximum are a
    /// programming error and fail with `RequestTooLarge`.
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: Option<&[u8]>,
        prediction_resistant: bool,
    ) -> Result<GenerateOutcome, CryptoError>;

    /// Mix fresh entropy (and optional additional input) into the state and
    /// restart the reseed interval.
    fn reseed(&mut self, additional_input: Option<&[u8]>) -> Result<(), CryptoError>;

    /// Whether the next generate request would report `ReseedRequired`.
    fn needs_reseed(&self) -> bool;

    /// Largest request accepted by `generate`, in bytes.
    fn max_request_bytes(&self) -> usize;

    /// Human-readable construction name, e.g. `SHA2-256/Hash_DRBG`.
    fn algorithm_name(&self) -> String;
}

impl<D: Drbg + ?Sized> Drbg for Box<D> {
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: Option<&[u8]>,
        prediction_resistant: bool,
    ) -> Result<GenerateOutcome, CryptoError> {
        (**self).generate(output, additional_input, prediction_resistant)
    }

    fn reseed(&mut self, additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
        (**self).reseed(additional_input)
    }

    fn needs_reseed(&self) -> bool {
        (**self).needs_reseed()
    }

    fn max_request_bytes(&self) -> usize {
        (**self).max_request_bytes()
    }

    fn algorithm_name(&self) -> String {
        (**self).algorithm_name()
    }
}

/// Security strength in bytes for a digest of `output_size` bytes (SP 800-57).
pub(crate) fn hash_security_strength(output_size: usize) -> usize {
    if output_size <= 20 {
        16
    } else if output_size <= 28 {
        24
    } else {
        32
    }
}
