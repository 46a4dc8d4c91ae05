//! Continuous entropy health tests (NIST SP 800-90B §4.4).
//!
//! - **Repetition Count Test** detects a source stuck on one value.
//! - **Adaptive Proportion Test** detects a source biased towards one value.
//!
//! Both operate on single-byte samples.

use seedwell_types::CryptoError;

/// Default RCT cutoff for H=1.0, α=2⁻²⁰: C = 1 + ⌈20/1.0⌉ = 21.
pub const DEFAULT_RCT_CUTOFF: u32 = 21;

/// Default APT window size.
pub const DEFAULT_APT_WINDOW: u32 = 512;

/// Default APT cutoff for H=1.0, W=512, α=2⁻²⁰.
pub const DEFAULT_APT_CUTOFF: u32 = 410;

/// Repetition Count Test (SP 800-90B §4.4.1).
#[derive(Debug, Clone)]
pub struct RepetitionCountTest {
    cutoff: u32,
    last: Option<u8>,
    run: u32,
}

impl RepetitionCountTest {
    pub fn new(cutoff: u32) -> Self {
        RepetitionCountTest {
            cutoff,
            last: None,
            run: 0,
        }
    }

    /// Fails once the same sample has been seen `cutoff` times in a row.
    pub fn check(&mut self, sample: u8) -> Result<(), CryptoError> {
        if self.last == Some(sample) {
            self.run += 1;
            if self.run >= self.cutoff {
                return Err(CryptoError::EntropyRctFailure);
            }
        } else {
            self.last = Some(sample);
            self.run = 1;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.last = None;
        self.run = 0;
    }
}

/// Adaptive Proportion Test (SP 800-90B §4.4.2).
///
/// The first sample of each window is the reference value; the window fails
/// when the reference value occurs `cutoff` times within it.
#[derive(Debug, Clone)]
pub struct AdaptiveProportionTest {
    window: u32,
    cutoff: u32,
    reference: Option<u8>,
    hits: u32,
    seen: u32,
}

impl AdaptiveProportionTest {
    pub fn new(window: u32, cutoff: u32) -> Self {
        AdaptiveProportionTest {
            window,
            cutoff,
            reference: None,
            hits: 0,
            seen: 0,
        }
    }

    pub fn check(&mut self, sample: u8) -> Result<(), CryptoError> {
        let Some(reference) = self.reference else {
            self.reference = Some(sample);
            self.hits = 1;
            self.seen = 1;
            return Ok(());
        };

        if sample == reference {
            self.hits += 1;
            if self.hits >= self.cutoff {
                return Err(CryptoError::EntropyAptFailure);
            }
        }

        self.seen += 1;
        if self.seen >= self.window {
            self.reset();
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.reference = None;
        self.hits = 0;
        self.seen = 0;
    }
}

/// Runs both continuous tests over every byte handed to it.
#[derive(Debug, Clone)]
pub struct HealthMonitor {
    rct: RepetitionCountTest,
    apt: AdaptiveProportionTest,
}

impl HealthMonitor {
    pub fn new(rct_cutoff: u32, apt_window: u32, apt_cutoff: u32) -> Self {
        HealthMonitor {
            rct: RepetitionCountTest::new(rct_cutoff),
            apt: AdaptiveProportionTest::new(apt_window, apt_cutoff),
        }
    }

    pub fn check_all(&mut self, samples: &[u8]) -> Result<(), CryptoError> {
        for &sample in samples {
            self.rct.check(sample)?;
            self.apt.check(sample)?;
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.rct.reset();
        self.apt.reset();
    }
}

impl Default for HealthMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_RCT_CUTOFF, DEFAULT_APT_WINDOW, DEFAULT_APT_CUTOFF)
    }
}
