//! HMAC-DRBG (Deterministic Random Bit Generator) implementation.
//!
//! NIST SP 800-90A Section 10.1.2 over HMAC with any provider digest.

use super::{hash_security_strength, Drbg, DrbgConfig, GenerateOutcome};
use crate::entropy::EntropySource;
use crate::hmac::Hmac;
use crate::provider::{Digest, Mac};
use seedwell_types::CryptoError;
use zeroize::Zeroize;

/// HMAC(K, parts...) into `out`.
fn hmac_into(mac: &mut Hmac, parts: &[&[u8]], out: &mut [u8]) -> Result<(), CryptoError> {
    mac.reset()?;
    for part in parts {
        mac.update(part)?;
    }
    mac.finish(out)
}

/// HMAC-DRBG context (NIST SP 800-90A Section 10.1.2).
pub struct HmacDrbg {
    /// HMAC keyed with the current K.
    mac: Hmac,
    /// HMAC key K (output_size bytes).
    k: Vec<u8>,
    /// HMAC value V (output_size bytes).
    v: Vec<u8>,
    entropy: Box<dyn EntropySource>,
    /// Number of generate requests since last (re)seed, plus one.
    reseed_counter: u64,
    security_strength: usize,
    config: DrbgConfig,
}

impl Drop for HmacDrbg {
    fn drop(&mut self) {
        self.k.zeroize();
        self.v.zeroize();
    }
}

impl HmacDrbg {
    /// Instantiate a new HMAC-DRBG (SP 800-90A §10.1.2.3).
    pub fn new(
        digest: Box<dyn Digest>,
        entropy: Box<dyn EntropySource>,
        personalization: Option<&[u8]>,
        nonce: Option<&[u8]>,
        config: DrbgConfig,
    ) -> Result<Self, CryptoError> {
        let size = digest.output_size();
        // K = 0x00...00, V = 0x01...01
        let k = vec![0x00u8; size];
        let mac = Hmac::new(digest, &k)?;
        let mut drbg = HmacDrbg {
            mac,
            k,
            v: vec![0x01u8; size],
            entropy,
            reseed_counter: 0,
            security_strength: hash_security_strength(size),
            config,
        };

        let mut entropy_input = drbg.draw_entropy()?;
        let updated = drbg.update(&[
            entropy_input.as_slice(),
            nonce.unwrap_or_default(),
            personalization.unwrap_or_default(),
        ]);
        entropy_input.zeroize();
        updated?;
        drbg.reseed_counter = 1;

        log::debug!(
            "instantiated {} (source '{}')",
            drbg.algorithm_name(),
            drbg.entropy.name()
        );
        Ok(drbg)
    }

    fn draw_entropy(&mut self) -> Result<Vec<u8>, CryptoError> {
        let mut buf = vec![0u8; self.security_strength];
        if let Err(e) = self.entropy.get_entropy(&mut buf) {
            buf.zeroize();
            return Err(e);
        }
        Ok(buf)
    }

    /// V = HMAC(K, V).
    fn step_v(&mut self) -> Result<(), CryptoError> {
        let mut input = self.v.clone();
        let result = hmac_into(&mut self.mac, &[input.as_slice()], &mut self.v);
        input.zeroize();
        result
    }

    /// HMAC-DRBG Update function (SP 800-90A Section 10.1.2.2).
    ///
    /// `provided_data` is the concatenation of `parts`.
    fn update(&mut self, parts: &[&[u8]]) -> Result<(), CryptoError> {
        let has_data = parts.iter().any(|p| !p.is_empty());
        for round in [0x00u8, 0x01] {
            if round == 0x01 && !has_data {
                break;
            }
            // K = HMAC(K, V || round || provided_data)
            let mut v = self.v.clone();
            let mut msg: Vec<&[u8]> = Vec::with_capacity(parts.len() + 2);
            msg.push(v.as_slice());
            msg.push(std::slice::from_ref(&round));
            msg.extend_from_slice(parts);
            let result = hmac_into(&mut self.mac, &msg, &mut self.k);
            v.zeroize();
            result?;
            self.mac.init(&self.k)?;

            // V = HMAC(K, V)
            self.step_v()?;
        }
        Ok(())
    }
}

impl Drbg for HmacDrbg {
    /// Generate pseudorandom bytes (SP 800-90A Section 10.1.2.5).
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: Option<&[u8]>,
        prediction_resistant: bool,
    ) -> Result<GenerateOutcome, CryptoError> {
        self.config.check_request(output.len())?;
        if self.needs_reseed() {
            log::debug!("{}: reseed interval exhausted", self.algorithm_name());
            return Ok(GenerateOutcome::ReseedRequired);
        }

        let mut additional_input = additional_input.filter(|data| !data.is_empty());
        if prediction_resistant {
            self.reseed(additional_input)?;
            additional_input = None;
        } else if let Some(data) = additional_input {
            self.update(&[data])?;
        }

        for chunk in output.chunks_mut(self.v.len()) {
            self.step_v()?;
            chunk.copy_from_slice(&self.v[..chunk.len()]);
        }

        self.update(&[additional_input.unwrap_or_default()])?;
        self.reseed_counter += 1;

        log::trace!("{}: generated {} bytes", self.algorithm_name(), output.len());
        Ok(GenerateOutcome::Generated(output.len() * 8))
    }

    /// Reseed the DRBG with fresh entropy (SP 800-90A Section 10.1.2.4).
    fn reseed(&mut self, additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
        let mut entropy_input = self.draw_entropy()?;
        let updated = self.update(&[
            entropy_input.as_slice(),
            additional_input.unwrap_or_default(),
        ]);
        entropy_input.zeroize();
        updated?;
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
        format!("{}/HMAC_DRBG", self.mac.algorithm_name())
    }
}
