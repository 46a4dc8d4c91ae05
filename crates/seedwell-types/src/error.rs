/// Cryptographic operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    // General errors
    #[error("invalid argument")]
    InvalidArg,
    #[error("operation not supported")]
    NotSupported,

    // Buffer errors
    #[error("buffer length not enough: need {need}, got {got}")]
    BufferTooSmall { need: usize, got: usize },

    // Specification errors
    #[error("invalid specification: {0}")]
    InvalidSpec(String),
    #[error("unsupported specification: {0}")]
    UnsupportedSpec(String),
    #[error("no supported specification matches the request")]
    NoCandidateSpec,

    // Symmetric cipher errors
    #[error("invalid key length: expected {expected}, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
    #[error("invalid block length: expected {expected}, got {got}")]
    InvalidBlockLength { expected: usize, got: usize },
    #[error("cipher key not set")]
    KeyNotSet,

    // DRBG errors
    #[error("drbg: invalid state")]
    DrbgInvalidState,
    #[error("drbg: failed to obtain entropy")]
    DrbgEntropyFail,
    #[error("drbg: request of {requested} bits exceeds maximum of {max} bits")]
    RequestTooLarge { requested: usize, max: usize },

    // Entropy health test errors
    #[error("entropy: repetition count test failed")]
    EntropyRctFailure,
    #[error("entropy: adaptive proportion test failed")]
    EntropyAptFailure,
}
