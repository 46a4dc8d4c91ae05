//! Random generator selection and the caller-facing generator handle.
//!
//! [`RandomSpec`] describes the generator a caller wants, [`RandomFactory`]
//! checks it against a provider and builds it, and [`SecureRandom`] wraps the
//! resulting [`Drbg`] with request chunking and automatic reseeding.

pub mod factory;
pub mod spec;

pub use factory::{FactoryConfig, RandomFactory};
pub use spec::{AlgorithmSpec, RandomSpec, RandomSpecBuilder, RandomType};

use crate::drbg::{Drbg, GenerateOutcome};
use seedwell_types::CryptoError;

/// An owned generator ready for use.
///
/// Requests of any length are split into chunks the underlying generator
/// accepts. When the reseed interval runs out, the generator is reseeded and
/// the chunk retried once; entropy and provider failures are returned as-is.
pub struct SecureRandom {
    label: String,
    drbg: Box<dyn Drbg>,
    prediction_resistant: bool,
}

impl SecureRandom {
    pub fn new(label: impl Into<String>, drbg: Box<dyn Drbg>, prediction_resistant: bool) -> Self {
        SecureRandom {
            label: label.into(),
            drbg,
            prediction_resistant,
        }
    }

    /// The name of the spec this generator was built from.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn algorithm_name(&self) -> String {
        self.drbg.algorithm_name()
    }

    pub fn is_prediction_resistant(&self) -> bool {
        self.prediction_resistant
    }

    /// Fill `out` with random bytes.
    pub fn fill_bytes(&mut self, out: &mut [u8]) -> Result<(), CryptoError> {
        self.fill_bytes_with(out, None)
    }

    /// Fill `out`, mixing `additional_input` into every underlying request.
    pub fn fill_bytes_with(
        &mut self,
        out: &mut [u8],
        additional_input: Option<&[u8]>,
    ) -> Result<(), CryptoError> {
        let max = self.drbg.max_request_bytes().max(1);
        for chunk in out.chunks_mut(max) {
            self.generate_chunk(chunk, additional_input)?;
        }
        Ok(())
    }

    fn generate_chunk(
        &mut self,
        chunk: &mut [u8],
        additional_input: Option<&[u8]>,
    ) -> Result<(), CryptoError> {
        let pr = self.prediction_resistant;
        if let GenerateOutcome::Generated(_) = self.drbg.generate(chunk, additional_input, pr)? {
            return Ok(());
        }

        log::warn!("{}: reseed interval exhausted, reseeding", self.label);
        self.drbg.reseed(additional_input)?;
        match self.drbg.generate(chunk, additional_input, pr)? {
            GenerateOutcome::Generated(_) => Ok(()),
            GenerateOutcome::ReseedRequired => Err(CryptoError::DrbgInvalidState),
        }
    }

    /// `len` fresh random bytes.
    pub fn generate_bytes(&mut self, len: usize) -> Result<Vec<u8>, CryptoError> {
        let mut out = vec![0u8; len];
        self.fill_bytes(&mut out)?;
        Ok(out)
    }

    /// Reseed the underlying generator now.
    pub fn reseed(&mut self, additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
        self.drbg.reseed(additional_input)
    }

    pub fn next_u32(&mut self) -> Result<u32, CryptoError> {
        let mut buf = [0u8; 4];
        self.fill_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    pub fn next_u64(&mut self) -> Result<u64, CryptoError> {
        let mut buf = [0u8; 8];
        self.fill_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// A uniformly distributed index in `0..bound`.
    pub fn gen_index(&mut self, bound: usize) -> Result<usize, CryptoError> {
        if bound == 0 {
            return Err(CryptoError::InvalidArg);
        }
        let bound = bound as u64;
        // Largest multiple of `bound` that fits, to avoid modulo bias.
        let zone = u64::MAX - (u64::MAX % bound);
        loop {
            let x = self.next_u64()?;
            if x < zone {
                return Ok((x % bound) as usize);
            }
        }
    }
}

impl std::fmt::Debug for SecureRandom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureRandom")
            .field("label", &self.label)
            .field("prediction_resistant", &self.prediction_resistant)
            .finish_non_exhaustive()
    }
}

impl rand_core::TryRngCore for SecureRandom {
    type Error = CryptoError;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        self.next_u32()
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        self.next_u64()
    }

    fn try_fill_bytes(&mut self, dst: &mut [u8]) -> Result<(), Self::Error> {
        self.fill_bytes(dst)
    }
}

impl rand_core::TryCryptoRng for SecureRandom {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drbg::test_support::CountingEntropy;
    use crate::drbg::{DrbgConfig, HashDrbg};
    use crate::hash::SoftDigest;
    use rand_core::TryRngCore;
    use seedwell_types::{DigestLength, DigestSpec};

    fn hash_drbg(config: DrbgConfig) -> Box<dyn Drbg> {
        Box::new(
            HashDrbg::new(
                Box::new(SoftDigest::new(&DigestSpec::sha2(DigestLength::Len256)).unwrap()),
                Box::new(CountingEntropy(0)),
                None,
                None,
                config,
            )
            .unwrap(),
        )
    }

    /// Reports `ReseedRequired` forever.
    struct Stuck;

    impl Drbg for Stuck {
        fn generate(
            &mut self,
            _output: &mut [u8],
            _additional_input: Option<&[u8]>,
            _prediction_resistant: bool,
        ) -> Result<GenerateOutcome, CryptoError> {
            Ok(GenerateOutcome::ReseedRequired)
        }

        fn reseed(&mut self, _additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
            Ok(())
        }

        fn needs_reseed(&self) -> bool {
            true
        }

        fn max_request_bytes(&self) -> usize {
            16
        }

        fn algorithm_name(&self) -> String {
            "stuck".into()
        }
    }

    #[test]
    fn test_chunks_large_requests() {
        let config = DrbgConfig {
            reseed_interval: 1 << 20,
            max_bits_per_request: 128,
        };
        let mut rng = SecureRandom::new("HASH-SHA2-256", hash_drbg(config), false);
        let out = rng.generate_bytes(100).unwrap();
        assert_eq!(out.len(), 100);
        assert_ne!(&out[..16], &out[16..32]);
    }

    #[test]
    fn test_auto_reseed() {
        let config = DrbgConfig {
            reseed_interval: 2,
            ..DrbgConfig::default()
        };
        let mut rng = SecureRandom::new("HASH-SHA2-256", hash_drbg(config), false);
        for _ in 0..10 {
            rng.generate_bytes(32).unwrap();
        }
    }

    #[test]
    fn test_gives_up_after_one_retry() {
        let mut rng = SecureRandom::new("stuck", Box::new(Stuck), false);
        let mut buf = [0u8; 8];
        assert!(matches!(rng.fill_bytes(&mut buf), Err(CryptoError::DrbgInvalidState)));
    }

    #[test]
    fn test_gen_index_in_range() {
        let mut rng = SecureRandom::new("HASH-SHA2-256", hash_drbg(DrbgConfig::default()), false);
        for bound in [1usize, 2, 3, 7, 100] {
            for _ in 0..20 {
                assert!(rng.gen_index(bound).unwrap() < bound);
            }
        }
        assert!(matches!(rng.gen_index(0), Err(CryptoError::InvalidArg)));
    }

    #[test]
    fn test_try_rng_core() {
        let mut rng = SecureRandom::new("HASH-SHA2-256", hash_drbg(DrbgConfig::default()), true);
        let a = rng.try_next_u64().unwrap();
        let b = rng.try_next_u64().unwrap();
        assert_ne!(a, b);
        let mut buf = [0u8; 24];
        rng.try_fill_bytes(&mut buf).unwrap();
        assert!(rng.is_prediction_resistant());
    }
}
