//! Hash-DRBG (Hash-based Deterministic Random Bit Generator).
//!
//! Implements NIST SP 800-90A Section 10.1.1 over any provider [`Digest`].

use super::{hash_security_strength, ByteCounter, Drbg, DrbgConfig, GenerateOutcome};
use crate::entropy::EntropySource;
use crate::provider::Digest;
use seedwell_types::CryptoError;
use zeroize::Zeroize;

/// Seed length in bytes for digests with output up to 256 bits (SP 800-90A Table 2).
pub const SHORT_SEED_LEN: usize = 55;
/// Seed length in bytes for digests with output above 256 bits.
pub const LONG_SEED_LEN: usize = 111;

/// Width of the reseed counter.
const RESEED_COUNTER_LEN: usize = 8;

/// Seed length in bytes for a digest of `output_size` bytes.
pub fn seed_len(output_size: usize) -> usize {
    if output_size <= 32 {
        SHORT_SEED_LEN
    } else {
        LONG_SEED_LEN
    }
}

/// Hash_df: Hash derivation function (SP 800-90A §10.3.1).
///
/// Hashes `counter || no_of_bits_to_return || input` with a one-byte counter
/// starting at 1 until `output_len` bytes are available. `input` is the
/// concatenation of `parts`.
pub fn hash_df(
    digest: &mut dyn Digest,
    parts: &[&[u8]],
    output_len: usize,
) -> Result<Vec<u8>, CryptoError> {
    let hash_size = digest.output_size();
    let bits = (output_len as u32).wrapping_mul(8).to_be_bytes();
    let mut temp = Vec::with_capacity(output_len + hash_size);
    let mut block = vec![0u8; hash_size];
    let mut counter: u8 = 1;

    while temp.len() < output_len {
        digest.reset();
        digest.update(&[counter])?;
        digest.update(&bits)?;
        for part in parts {
            digest.update(part)?;
        }
        digest.finish(&mut block)?;
        temp.extend_from_slice(&block);
        counter = counter.wrapping_add(1);
    }

    block.zeroize();
    temp.truncate(output_len);
    Ok(temp)
}

/// Hash-DRBG context (NIST SP 800-90A Section 10.1.1).
pub struct HashDrbg {
    digest: Box<dyn Digest>,
    entropy: Box<dyn EntropySource>,
    /// State value V (seed_len bytes).
    v: ByteCounter,
    /// Constant C (seed_len bytes).
    c: ByteCounter,
    /// Successful generate requests since the last (re)seed, plus one.
    reseed_counter: ByteCounter,
    seed_len: usize,
    /// Entropy drawn per (re)seed, in bytes.
    security_strength: usize,
    config: DrbgConfig,
}

impl HashDrbg {
    /// Instantiate a new Hash-DRBG (SP 800-90A §10.1.1.2).
    ///
    /// Draws entropy immediately; `nonce` and `personalization` may be empty.
    pub fn new(
        digest: Box<dyn Digest>,
        entropy: Box<dyn EntropySource>,
        personalization: Option<&[u8]>,
        nonce: Option<&[u8]>,
        config: DrbgConfig,
    ) -> Result<Self, CryptoError> {
        let output_size = digest.output_size();
        let seed_len = seed_len(output_size);
        let mut drbg = HashDrbg {
            digest,
            entropy,
            v: ByteCounter::new(seed_len),
            c: ByteCounter::new(seed_len),
            reseed_counter: ByteCounter::new(RESEED_COUNTER_LEN),
            seed_len,
            security_strength: hash_security_strength(output_size),
            config,
        };

        let mut entropy_input = drbg.draw_entropy()?;
        let seeded = drbg.seed(&[
            entropy_input.as_slice(),
            nonce.unwrap_or_default(),
            personalization.unwrap_or_default(),
        ]);
        entropy_input.zeroize();
        seeded?;

        log::debug!(
            "instantiated {} (seed_len {} bytes, source '{}')",
            drbg.algorithm_name(),
            seed_len,
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

    /// V = Hash_df(seed_material), C = Hash_df(0x00 || V), counter = 1.
    fn seed(&mut self, seed_material: &[&[u8]]) -> Result<(), CryptoError> {
        let mut v = hash_df(self.digest.as_mut(), seed_material, self.seed_len)?;
        let mut c = hash_df(
            self.digest.as_mut(),
            &[&[0x00u8][..], v.as_slice()],
            self.seed_len,
        )?;
        self.v.set(&v);
        self.c.set(&c);
        v.zeroize();
        c.zeroize();

        self.reseed_counter.reset();
        self.reseed_counter.iterate();
        Ok(())
    }

    /// Hash(prefix || V).
    fn hash_v(&mut self, prefix: u8, extra: &[u8]) -> Result<Vec<u8>, CryptoError> {
        self.digest.digest_parts(&[&[prefix][..], self.v.as_bytes(), extra])
    }

    /// Hashgen (SP 800-90A §10.1.1.4): hash successive values of V into `output`.
    fn hashgen(&mut self, output: &mut [u8]) -> Result<(), CryptoError> {
        let mut data = self.v.clone();
        for chunk in output.chunks_mut(self.digest.output_size()) {
            let mut w = self.digest.digest_parts(&[data.as_bytes()])?;
            chunk.copy_from_slice(&w[..chunk.len()]);
            w.zeroize();
            data.iterate();
        }
        Ok(())
    }

    /// The digest driving this generator.
    pub fn digest(&self) -> &dyn Digest {
        self.digest.as_ref()
    }

    /// Seed length in bytes.
    pub fn seed_len(&self) -> usize {
        self.seed_len
    }
}

impl Drbg for HashDrbg {
    /// Generate pseudorandom bytes (SP 800-90A §10.1.1.4).
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

        let additional_input = additional_input.filter(|data| !data.is_empty());
        if prediction_resistant {
            self.reseed(additional_input)?;
        } else if let Some(data) = additional_input {
            // V = (V + Hash(0x02 || V || additional_input)) mod 2^seedlen
            let mut w = self.hash_v(0x02, data)?;
            self.v.add_to(&w);
            w.zeroize();
        }

        self.hashgen(output)?;

        // V = (V + Hash(0x03 || V) + C + reseed_counter) mod 2^seedlen
        let mut h = self.hash_v(0x03, &[])?;
        self.v.add_to(&h);
        h.zeroize();
        self.v.add_to(self.c.as_bytes());
        self.v.add_to(self.reseed_counter.as_bytes());
        self.reseed_counter.iterate();

        log::trace!("{}: generated {} bytes", self.algorithm_name(), output.len());
        Ok(GenerateOutcome::Generated(output.len() * 8))
    }

    /// Reseed (SP 800-90A §10.1.1.3): V = Hash_df(0x01 || V || entropy || additional_input).
    fn reseed(&mut self, additional_input: Option<&[u8]>) -> Result<(), CryptoError> {
        let mut entropy_input = self.draw_entropy()?;
        let mut old_v = self.v.as_bytes().to_vec();
        let seeded = self.seed(&[
            &[0x01u8][..],
            old_v.as_slice(),
            entropy_input.as_slice(),
            additional_input.unwrap_or_default(),
        ]);
        entropy_input.zeroize();
        old_v.zeroize();
        seeded?;

        log::debug!("{}: reseeded", self.algorithm_name());
        Ok(())
    }

    fn needs_reseed(&self) -> bool {
        self.reseed_counter
            .compare_limit(self.config.reseed_interval.saturating_add(1))
    }

    fn max_request_bytes(&self) -> usize {
        self.config.max_request_bytes()
    }

    fn algorithm_name(&self) -> String {
        format!("{}/Hash_DRBG", self.digest.spec())
    }
}
