#![forbid(unsafe_code)]
#![doc = "SP 800-90A random bit generators with algorithm spec negotiation."]

// Core traits
pub mod provider;

// Primitives
pub mod aes;
pub mod hash;
pub mod hmac;
pub mod keys;

pub mod mac {
    //! Unified MAC interface.
    pub use super::provider::Mac;
}

// Entropy, DRBG and generator selection
pub mod drbg;
pub mod entropy;
pub mod random;

pub mod software;

pub use drbg::{ByteCounter, Drbg, DrbgConfig, GenerateOutcome, HashDrbg};
pub use random::{RandomFactory, RandomSpec, RandomSpecBuilder, RandomType, SecureRandom};
pub use software::SoftwareProvider;
