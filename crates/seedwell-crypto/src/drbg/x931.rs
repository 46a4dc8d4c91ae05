//! ANSI X9.31 Appendix A.2.4 random number generator.
//!
//! Each output block is produced from the date/time vector DT and the seed
//! vector V:
//!
//! ```text
//! I = E(DT)
//! R = E(I ^ V)
//! V = E(R ^ I)
//! ```
//!
//! after which DT is incremented as a big-endian counter. X9.31 has no notion
//! of additional input or personalization; both are ignored.

use super::{ByteCounter, Drbg, DrbgConfig, GenerateOutcome};
use crate::entropy::EntropySource;
use crate::provider::BlockCipher;
use seedwell_types::{CryptoError, SymKeySpec};
use zeroize::Zeroize;

/// X9.31 generator context.
pub struct X931Rng {
    spec: SymKeySpec,
    /// Keyed once at construction.
    cipher: Box<dyn BlockCipher>,
    entropy: Box<dyn EntropySource>,
    /// Seed vector V.
    v: Vec<u8>,
    /// Date/time vector DT.
    dt: ByteCounter,
    /// Number of generate requests since last (re)seed, plus one.
    reseed_counter: u64,
    config: DrbgConfig,
}

impl Drop for X931Rng {
    fn drop(&mut self) {
        self.v.zeroize();
    }
}

fn xor_into(dst: &mut [u8], a: &[u8], b: &[u8]) {
    for ((d, x), y) in dst.iter_mut().zip(a).zip(b) {
        *d = x ^ y;
    }
}

impl X931Rng {
    /// Key the cipher and draw V from `entropy`; DT starts from `nonce`
    /// (right-aligned, zero-padded), or from entropy when no nonce is given.
    pub fn new(
        spec: SymKeySpec,
        mut cipher: Box<dyn BlockCipher>,
        mut entropy: Box<dyn EntropySource>,
        nonce: Option<&[u8]>,
        config: DrbgConfig,
    ) -> Result<Self, CryptoError> {
        let block_len = cipher.block_size();

        let mut key = vec![0u8; cipher.key_size()];
        let keyed = entropy
            .get_entropy(&mut key)
            .and_then(|()| cipher.set_encrypt_key(&key));
        key.zeroize();
        keyed?;

        let mut dt = vec![0u8; block_len];
        match nonce {
            Some(nonce) if !nonce.is_empty() => {
                for (d, n) in dt.iter_mut().rev().zip(nonce.iter().rev()) {
                    *d = *n;
                }
            }
            _ => entropy.get_entropy(&mut dt)?,
        }

        let mut rng = X931Rng {
            spec,
            cipher,
            entropy,
            v: vec![0u8; block_len],
            dt: ByteCounter::from_bytes(&dt),
            reseed_counter: 0,
            config,
        };
        rng.refresh_v()?;
        rng.reseed_counter = 1;

        log::debug!(
            "instantiated {} (source '{}')",
            rng.algorithm_name(),
            rng.entropy.name()
        );
        Ok(rng)
    }

    fn refresh_v(&mut self) -> Result<(), CryptoError> {
        self.entropy.get_entropy(&mut self.v)
    }

    /// One A.2.4 step, writing R into `r`.
    fn process(&mut self, r: &mut [u8]) -> Result<(), CryptoError> {
        let mut i = self.dt.as_bytes().to_vec();
        self.cipher.encrypt_block(&mut i)?;

        xor_into(r, &i, &self.v);
        self.cipher.encrypt_block(r)?;

        xor_into(&mut self.v, r, &i);
        self.cipher.encrypt_block(&mut self.v)?;

        self.dt.iterate();
        i.zeroize();
        Ok(())
    }

    pub fn spec(&self) -> &SymKeySpec {
        &self.spec
    }
}

impl Drbg for X931Rng {
    fn generate(
        &mut self,
        output: &mut [u8],
        _additional_input: Option<&[u8]>,
        prediction_resistant: bool,
    ) -> Result<GenerateOutcome, CryptoError> {
        self.config.check_request(output.len())?;
        if self.needs_reseed() {
            log::debug!("{}: reseed interval exhausted", self.algorithm_name());
            return Ok(GenerateOutcome::ReseedRequired);
        }

        if prediction_resistant {
            self.refresh_v()?;
        }

        let mut r = vec![0u8; self.v.len()];
        for chunk in output.chunks_mut(self.v.len()) {
            self.process(&mut r)?;
            chunk.copy_from_slice(&r[..chunk.len()]);
        }
        r.zeroize();
        self.reseed_counter += 1;

        log::trace!("{}: generated {} bytes", self.algorithm_name(), output.len());
        Ok(GenerateOutcome::Generated(output.len() * 8))
    }

    /// Draw a fresh V from the entropy source.
    fn reseed(&mut self, _additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
        self.refresh_v()?;
        self.reseed_counter = 1;
        log::debug!("{}: reseeded", self.algorithm_name());
        Ok(())
    }

    fn needs_reseed(&self) -> bool {
        self.reseed_counter > self.config.reseed_interval
    }

    fn max_request_bytes(&self) -> usize {
        self.config.max_request_bytes()
    }

    fn algorithm_name(&self) -> String {
        format!("{}/X9.31", self.spec)
    }
}
