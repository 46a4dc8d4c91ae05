//! Negotiates [`RandomSpec`]s against a provider and builds generators.

use super::spec::{AlgorithmSpec, RandomSpec, RandomType};
use super::SecureRandom;
use crate::drbg::{
    hash_security_strength, CombinedDrbg, CtrDrbg, Drbg, DrbgConfig, HashDrbg, HmacDrbg, X931Rng,
};
use crate::entropy::{self, EntropyConfig, EntropySource};
use crate::keys::{StreamKey, SymKey};
use crate::provider::{CryptoProvider, Digest, Mac};
use seedwell_types::{
    CryptoError, DigestSpec, KeyLength, MacSpec, StreamKeySpec, SymKeySpec,
};
use std::sync::Arc;
use zeroize::Zeroize;

/// Builds a fresh entropy source for each generator.
pub type EntropyFactory = dyn Fn() -> Box<dyn EntropySource> + Send + Sync;

/// Settings applied to every generator a [`RandomFactory`] builds.
#[derive(Debug, Clone)]
pub struct FactoryConfig {
    /// Limits for Hash, HMAC and CTR generators.
    pub drbg: DrbgConfig,
    /// Limits for X9.31 generators. Default: derived from the cipher block size.
    pub x931: Option<DrbgConfig>,
    /// Personalization string mixed into every instantiation.
    pub personalization: Option<Vec<u8>>,
    /// Whether system entropy is health-tested. Default: true.
    pub health_tested_entropy: bool,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        FactoryConfig {
            drbg: DrbgConfig::default(),
            x931: None,
            personalization: None,
            health_tested_entropy: true,
        }
    }
}

/// Bridges [`RandomSpec`] values to generators backed by one provider.
///
/// Holds no generator state; safe to share across threads.
pub struct RandomFactory {
    provider: Arc<dyn CryptoProvider>,
    entropy: Arc<EntropyFactory>,
    config: FactoryConfig,
}

impl RandomFactory {
    pub fn new(provider: Arc<dyn CryptoProvider>) -> Self {
        Self::with_config(provider, FactoryConfig::default())
    }

    /// A factory drawing system entropy per `config`.
    pub fn with_config(provider: Arc<dyn CryptoProvider>, config: FactoryConfig) -> Self {
        let entropy_config = EntropyConfig {
            enable_health_tests: config.health_tested_entropy,
            ..EntropyConfig::default()
        };
        log::debug!(
            "random factory over provider '{}' (health tests: {})",
            provider.name(),
            config.health_tested_entropy
        );
        RandomFactory {
            provider,
            entropy: Arc::new(move || entropy::from_config(&entropy_config)),
            config,
        }
    }

    /// Replace the entropy source used for new generators.
    pub fn with_entropy_source<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn EntropySource> + Send + Sync + 'static,
    {
        self.entropy = Arc::new(factory);
        self
    }

    pub fn provider(&self) -> &dyn CryptoProvider {
        self.provider.as_ref()
    }

    pub fn config(&self) -> &FactoryConfig {
        &self.config
    }

    /// Whether `spec` is valid and its primitive is available from the provider.
    pub fn supports_random_spec(&self, spec: &RandomSpec) -> bool {
        spec.is_valid()
            && match spec.algorithm_spec() {
                AlgorithmSpec::Digest(d) => self.provider.supports_digest(d),
                AlgorithmSpec::SymKey(k) => self.provider.supports_sym_key(k),
            }
    }

    /// Whether a cipher-based and a hash-based spec can be combined.
    pub fn supports_combined_specs(&self, ctr: &RandomSpec, hash: &RandomSpec) -> bool {
        !ctr.random_type().is_digest_based()
            && hash.random_type().is_digest_based()
            && ctr != hash
            && self.supports_random_spec(ctr)
            && self.supports_random_spec(hash)
    }

    fn check_supported(&self, spec: &RandomSpec) -> Result<(), CryptoError> {
        if !spec.is_valid() {
            return Err(CryptoError::InvalidSpec(spec.name().to_string()));
        }
        if !self.supports_random_spec(spec) {
            return Err(CryptoError::UnsupportedSpec(spec.name().to_string()));
        }
        Ok(())
    }

    /// Build a generator for `spec`.
    pub fn create_random(&self, spec: &RandomSpec) -> Result<SecureRandom, CryptoError> {
        self.check_supported(spec)?;
        let drbg = self.build_drbg(spec)?;
        log::debug!("created {} for {}", drbg.algorithm_name(), spec);
        Ok(SecureRandom::new(
            spec.name(),
            drbg,
            spec.is_prediction_resistant(),
        ))
    }

    /// Build a generator XORing a CTR/X931 generator with a HASH/HMAC one.
    pub fn create_combined_random(
        &self,
        ctr: &RandomSpec,
        hash: &RandomSpec,
    ) -> Result<SecureRandom, CryptoError> {
        self.check_supported(ctr)?;
        self.check_supported(hash)?;
        if !self.supports_combined_specs(ctr, hash) {
            return Err(CryptoError::UnsupportedSpec(format!("{ctr}+{hash}")));
        }
        let drbg = CombinedDrbg::new(self.build_drbg(ctr)?, self.build_drbg(hash)?);
        Ok(SecureRandom::new(
            format!("{ctr}+{hash}"),
            Box::new(drbg),
            ctr.is_prediction_resistant() || hash.is_prediction_resistant(),
        ))
    }

    fn build_drbg(&self, spec: &RandomSpec) -> Result<Box<dyn Drbg>, CryptoError> {
        let mut entropy = (self.entropy)();
        let personalization = self.config.personalization.as_deref();

        let drbg: Box<dyn Drbg> = match (spec.random_type(), spec.algorithm_spec()) {
            (RandomType::Hash, AlgorithmSpec::Digest(d)) => {
                let digest = self.provider.create_digest(d)?;
                let nonce = draw_nonce(
                    entropy.as_mut(),
                    hash_security_strength(digest.output_size()) / 2,
                )?;
                Box::new(HashDrbg::new(
                    digest,
                    entropy,
                    personalization,
                    Some(nonce.as_slice()),
                    self.config.drbg,
                )?)
            }
            (RandomType::Hmac, AlgorithmSpec::Digest(d)) => {
                let digest = self.provider.create_digest(d)?;
                let nonce = draw_nonce(
                    entropy.as_mut(),
                    hash_security_strength(digest.output_size()) / 2,
                )?;
                Box::new(HmacDrbg::new(
                    digest,
                    entropy,
                    personalization,
                    Some(nonce.as_slice()),
                    self.config.drbg,
                )?)
            }
            (RandomType::Ctr, AlgorithmSpec::SymKey(k)) => {
                let cipher = self.provider.create_block_cipher(k)?;
                let nonce = draw_nonce(entropy.as_mut(), cipher.key_size() / 2)?;
                Box::new(CtrDrbg::new(
                    *k,
                    cipher,
                    entropy,
                    personalization,
                    Some(nonce.as_slice()),
                    self.config.drbg,
                )?)
            }
            (RandomType::X931, AlgorithmSpec::SymKey(k)) => {
                let cipher = self.provider.create_block_cipher(k)?;
                let block_len = cipher.block_size();
                let config = self
                    .config
                    .x931
                    .unwrap_or_else(|| DrbgConfig::x931(block_len));
                Box::new(X931Rng::new(*k, cipher, entropy, None, config)?)
            }
            _ => return Err(CryptoError::InvalidSpec(spec.name().to_string())),
        };
        Ok(drbg)
    }

    /// Instantiate a randomly chosen supported digest.
    ///
    /// With `large_data`, only digests suitable for streaming input qualify.
    pub fn generate_random_digest(
        &self,
        rng: &mut SecureRandom,
        large_data: bool,
    ) -> Result<Box<dyn Digest>, CryptoError> {
        let candidates: Vec<DigestSpec> = DigestSpec::list_all()
            .into_iter()
            .filter(|d| self.provider.supports_digest(d))
            .filter(|d| !large_data || d.digest_type().supports_large_data())
            .collect();
        let spec = pick(rng, &candidates)?;
        log::debug!("picked digest {spec}");
        self.provider.create_digest(&spec)
    }

    /// A randomly chosen supported MAC, keyed with fresh random bytes.
    pub fn generate_random_mac(
        &self,
        rng: &mut SecureRandom,
        key_length: KeyLength,
        large_data: bool,
    ) -> Result<Box<dyn Mac>, CryptoError> {
        let candidates: Vec<MacSpec> = DigestSpec::list_all()
            .into_iter()
            .map(|d| MacSpec::hmac(d, key_length))
            .filter(|m| self.provider.supports_mac(m))
            .filter(|m| !large_data || m.supports_large_data())
            .collect();
        let spec = pick(rng, &candidates)?;
        log::debug!("picked MAC {spec}");
        let mut key = rng.generate_bytes(key_length.bytes())?;
        let mac = self.provider.create_mac(&spec, &key);
        key.zeroize();
        mac
    }

    /// A randomly chosen supported block cipher key of `key_length`.
    pub fn generate_random_sym_key(
        &self,
        rng: &mut SecureRandom,
        key_length: KeyLength,
    ) -> Result<SymKey, CryptoError> {
        let candidates: Vec<SymKeySpec> = SymKeySpec::list_all(key_length)
            .into_iter()
            .filter(|k| self.provider.supports_sym_key(k))
            .collect();
        let spec = pick(rng, &candidates)?;
        log::debug!("picked block cipher key {spec}");
        let mut material = rng.generate_bytes(key_length.bytes())?;
        let key = self.provider.create_sym_key(&spec, &material);
        material.zeroize();
        key
    }

    /// A randomly chosen supported stream cipher key of `key_length`.
    pub fn generate_random_stream_key(
        &self,
        rng: &mut SecureRandom,
        key_length: KeyLength,
        large_data: bool,
    ) -> Result<StreamKey, CryptoError> {
        let candidates: Vec<StreamKeySpec> = StreamKeySpec::list_all(key_length)
            .into_iter()
            .filter(|k| self.provider.supports_stream_key(k))
            .filter(|k| !large_data || k.key_type().supports_large_data())
            .collect();
        let spec = pick(rng, &candidates)?;
        log::debug!("picked stream key {spec}");
        let mut material = rng.generate_bytes(key_length.bytes())?;
        let key = self.provider.create_stream_key(&spec, &material);
        material.zeroize();
        key
    }

    /// Every catalog entry this factory can build.
    pub fn list_all_supported_random_specs(&self) -> Vec<RandomSpec> {
        RandomSpec::list_all()
            .into_iter()
            .filter(|s| self.supports_random_spec(s))
            .collect()
    }

    /// Supported catalog entries of one family.
    pub fn list_all_supported_random_specs_of_type(
        &self,
        random_type: RandomType,
    ) -> Vec<RandomSpec> {
        self.list_all_supported_random_specs()
            .into_iter()
            .filter(|s| s.random_type() == random_type)
            .collect()
    }

    /// Supported catalog entries of one cipher-based family and key length.
    ///
    /// Always empty for HASH and HMAC, which have no key length.
    pub fn list_all_supported_random_specs_for(
        &self,
        random_type: RandomType,
        key_length: KeyLength,
    ) -> Vec<RandomSpec> {
        if random_type.is_digest_based() {
            return Vec::new();
        }
        self.list_all_supported_random_specs_of_type(random_type)
            .into_iter()
            .filter(|s| s.sym_key_spec().map(|k| k.key_length()) == Some(key_length))
            .collect()
    }
}

impl std::fmt::Debug for RandomFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomFactory")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn draw_nonce(entropy: &mut dyn EntropySource, len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut nonce = vec![0u8; len];
    entropy.get_entropy(&mut nonce)?;
    Ok(nonce)
}

fn pick<T: Copy>(rng: &mut SecureRandom, candidates: &[T]) -> Result<T, CryptoError> {
    if candidates.is_empty() {
        return Err(CryptoError::NoCandidateSpec);
    }
    Ok(candidates[rng.gen_index(candidates.len())?])
}
