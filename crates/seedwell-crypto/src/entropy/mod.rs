//! Entropy sources feeding the DRBGs.
//!
//! A generator only needs "N fresh bytes on demand". [`SystemEntropy`]
//! reads the operating system pool through `getrandom`; wrapping any source
//! in [`HealthTestedEntropy`] runs the SP 800-90B continuous tests on every
//! byte before it reaches a generator.
//!
//! # Example
//!
//! ```
//! use seedwell_crypto::entropy::{EntropyConfig, EntropySource};
//!
//! let mut es = seedwell_crypto::entropy::from_config(&EntropyConfig::default());
//! let mut buf = [0u8; 32];
//! es.get_entropy(&mut buf).expect("entropy acquisition failed");
//! ```

pub mod health;

pub use health::{AdaptiveProportionTest, HealthMonitor, RepetitionCountTest};

use seedwell_types::CryptoError;

/// A source of fresh, unpredictable bytes.
///
/// Reads may block on the underlying pool. Failures are fatal to the caller
/// and are never retried by the generators.
pub trait EntropySource: Send {
    /// Human-readable name of the source.
    fn name(&self) -> &str;

    /// Fill `buf` completely with fresh entropy.
    fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), CryptoError>;
}

impl<S: EntropySource + ?Sized> EntropySource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        (**self).get_entropy(buf)
    }
}

/// Operating system entropy via `getrandom`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEntropy;

impl EntropySource for SystemEntropy {
    fn name(&self) -> &str {
        "system"
    }

    fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::getrandom(buf).map_err(|e| {
            log::warn!("system entropy read failed: {e}");
            CryptoError::DrbgEntropyFail
        })
    }
}

/// Configuration for entropy sources built by [`from_config`].
#[derive(Debug, Clone)]
pub struct EntropyConfig {
    /// Whether to run health tests on each byte. Default: true.
    pub enable_health_tests: bool,
    /// RCT cutoff threshold. Default: 21.
    pub rct_cutoff: u32,
    /// APT window size. Default: 512.
    pub apt_window_size: u32,
    /// APT cutoff threshold. Default: 410.
    pub apt_cutoff: u32,
}

impl Default for EntropyConfig {
    fn default() -> Self {
        EntropyConfig {
            enable_health_tests: true,
            rct_cutoff: health::DEFAULT_RCT_CUTOFF,
            apt_window_size: health::DEFAULT_APT_WINDOW,
            apt_cutoff: health::DEFAULT_APT_CUTOFF,
        }
    }
}

/// Wraps a source and health-tests every byte it yields.
pub struct HealthTestedEntropy<S> {
    source: S,
    monitor: HealthMonitor,
}

impl<S: EntropySource> HealthTestedEntropy<S> {
    pub fn new(source: S, config: &EntropyConfig) -> Self {
        HealthTestedEntropy {
            source,
            monitor: HealthMonitor::new(
                config.rct_cutoff,
                config.apt_window_size,
                config.apt_cutoff,
            ),
        }
    }

    pub fn into_inner(self) -> S {
        self.source
    }
}

impl<S: EntropySource> EntropySource for HealthTestedEntropy<S> {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn get_entropy(&mut self, buf: &mut [u8]) -> Result<(), CryptoError> {
        self.source.get_entropy(buf)?;
        if let Err(e) = self.monitor.check_all(buf) {
            log::warn!("entropy source '{}' failed health test: {e}", self.source.name());
            self.monitor.reset();
            return Err(e);
        }
        Ok(())
    }
}

/// System entropy, health-tested when the config asks for it.
pub fn from_config(config: &EntropyConfig) -> Box<dyn EntropySource> {
    if config.enable_health_tests {
        Box::new(HealthTestedEntropy::new(SystemEntropy, config))
    } else {
        Box::new(SystemEntropy)
    }
}
