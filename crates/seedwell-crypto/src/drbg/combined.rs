//! XOR combination of a cipher-based and a hash-based generator.

use super::{Drbg, GenerateOutcome};
use seedwell_types::CryptoError;
use zeroize::Zeroize;

/// Output is `cipher_based ^ hash_based`, so it stays unpredictable as long
/// as either half does.
pub struct CombinedDrbg {
    cipher_based: Box<dyn Drbg>,
    hash_based: Box<dyn Drbg>,
}

impl CombinedDrbg {
    /// `cipher_based` is a CTR or X9.31 generator, `hash_based` a Hash or
    /// HMAC generator.
    pub fn new(cipher_based: Box<dyn Drbg>, hash_based: Box<dyn Drbg>) -> Self {
        log::debug!(
            "combining {} with {}",
            cipher_based.algorithm_name(),
            hash_based.algorithm_name()
        );
        CombinedDrbg {
            cipher_based,
            hash_based,
        }
    }
}

impl Drbg for CombinedDrbg {
    fn generate(
        &mut self,
        output: &mut [u8],
        additional_input: Option<&[u8]>,
        prediction_resistant: bool,
    ) -> Result<GenerateOutcome, CryptoError> {
        let max = self.max_request_bytes();
        if output.len() > max {
            return Err(CryptoError::RequestTooLarge {
                requested: output.len().saturating_mul(8),
                max: max * 8,
            });
        }
        // Neither half may advance unless both can.
        if self.needs_reseed() {
            return Ok(GenerateOutcome::ReseedRequired);
        }

        let outcome = self
            .cipher_based
            .generate(output, additional_input, prediction_resistant)?;
        if !outcome.is_generated() {
            return Ok(outcome);
        }

        let mut other = vec![0u8; output.len()];
        let outcome = self
            .hash_based
            .generate(&mut other, additional_input, prediction_resistant)?;
        if outcome.is_generated() {
            for (o, h) in output.iter_mut().zip(&other) {
                *o ^= *h;
            }
        }
        other.zeroize();
        Ok(outcome)
    }

    fn reseed(&mut self, additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
        self.cipher_based.reseed(additional_input)?;
        self.hash_based.reseed(additional_input)
    }

    fn needs_reseed(&self) -> bool {
        self.cipher_based.needs_reseed() || self.hash_based.needs_reseed()
    }

    fn max_request_bytes(&self) -> usize {
        self.cipher_based
            .max_request_bytes()
            .min(self.hash_based.max_request_bytes())
    }

    fn algorithm_name(&self) -> String {
        format!(
            "{}+{}",
            self.cipher_based.algorithm_name(),
            self.hash_based.algorithm_name()
        )
    }
}
