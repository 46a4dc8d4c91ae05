//! Random generator specifications.
//!
//! A [`RandomSpec`] names a generator construction independently of any
//! provider. Validity is computed once at construction and exposed as a
//! predicate; invalid specs can be built, listed and displayed, and are only
//! rejected when a factory is asked to use them.

use seedwell_types::{DigestSpec, KeyLength, SymKeySpec};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Generator construction family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RandomType {
    /// SP 800-90A Hash_DRBG.
    Hash,
    /// SP 800-90A HMAC_DRBG.
    Hmac,
    /// SP 800-90A CTR_DRBG.
    Ctr,
    /// ANSI X9.31.
    X931,
}

impl RandomType {
    pub const ALL: [RandomType; 4] = [Self::Hash, Self::Hmac, Self::Ctr, Self::X931];

    /// Whether the family is driven by a digest (as opposed to a block cipher).
    pub fn is_digest_based(self) -> bool {
        matches!(self, Self::Hash | Self::Hmac)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Hash => "HASH",
            Self::Hmac => "HMAC",
            Self::Ctr => "CTR",
            Self::X931 => "X931",
        }
    }
}

impl fmt::Display for RandomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The primitive backing a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmSpec {
    Digest(DigestSpec),
    SymKey(SymKeySpec),
}

impl From<DigestSpec> for AlgorithmSpec {
    fn from(spec: DigestSpec) -> Self {
        Self::Digest(spec)
    }
}

impl From<SymKeySpec> for AlgorithmSpec {
    fn from(spec: SymKeySpec) -> Self {
        Self::SymKey(spec)
    }
}

impl fmt::Display for AlgorithmSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Digest(d) => fmt::Display::fmt(d, f),
            Self::SymKey(k) => fmt::Display::fmt(k, f),
        }
    }
}

/// A requested generator: family, backing primitive and prediction resistance.
#[derive(Debug, Clone)]
pub struct RandomSpec {
    random_type: RandomType,
    algorithm_spec: AlgorithmSpec,
    prediction_resistant: bool,
    valid: bool,
    name: String,
}

fn check_validity(random_type: RandomType, algorithm_spec: &AlgorithmSpec) -> bool {
    match (random_type, algorithm_spec) {
        (RandomType::Hash | RandomType::Hmac, AlgorithmSpec::Digest(d)) => {
            d.is_valid() && d.digest_type().supports_large_data()
        }
        (RandomType::Ctr | RandomType::X931, AlgorithmSpec::SymKey(k)) => k.is_valid(),
        _ => false,
    }
}

impl RandomSpec {
    pub fn new(
        random_type: RandomType,
        algorithm_spec: impl Into<AlgorithmSpec>,
        prediction_resistant: bool,
    ) -> Self {
        let algorithm_spec = algorithm_spec.into();
        let valid = check_validity(random_type, &algorithm_spec);
        let suffix = if prediction_resistant { "-resistant" } else { "" };
        let base = format!("{random_type}-{algorithm_spec}{suffix}");
        let name = if valid {
            base
        } else {
            format!("InvalidRandomSpec: {base}")
        };
        RandomSpec {
            random_type,
            algorithm_spec,
            prediction_resistant,
            valid,
            name,
        }
    }

    pub fn random_type(&self) -> RandomType {
        self.random_type
    }

    pub fn algorithm_spec(&self) -> &AlgorithmSpec {
        &self.algorithm_spec
    }

    /// The digest, for HASH/HMAC specs.
    pub fn digest_spec(&self) -> Option<&DigestSpec> {
        match &self.algorithm_spec {
            AlgorithmSpec::Digest(d) => Some(d),
            AlgorithmSpec::SymKey(_) => None,
        }
    }

    /// The block cipher, for CTR/X931 specs.
    pub fn sym_key_spec(&self) -> Option<&SymKeySpec> {
        match &self.algorithm_spec {
            AlgorithmSpec::SymKey(k) => Some(k),
            AlgorithmSpec::Digest(_) => None,
        }
    }

    pub fn is_prediction_resistant(&self) -> bool {
        self.prediction_resistant
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every combination of family, primitive and resistance.
    ///
    /// Four entries per [`DigestSpec::list_all`] entry, then four per
    /// (key length, [`SymKeySpec::list_all`]) pair. Entries may be invalid.
    pub fn list_all() -> Vec<RandomSpec> {
        let mut all = Vec::new();
        for digest in DigestSpec::list_all() {
            all.push(RandomSpecBuilder::hash(digest));
            all.push(RandomSpecBuilder::hash_resist(digest));
            all.push(RandomSpecBuilder::hmac(digest));
            all.push(RandomSpecBuilder::hmac_resist(digest));
        }
        for key_length in KeyLength::ALL {
            for key in SymKeySpec::list_all(key_length) {
                all.push(RandomSpecBuilder::ctr(key));
                all.push(RandomSpecBuilder::ctr_resist(key));
                all.push(RandomSpecBuilder::x931(key));
                all.push(RandomSpecBuilder::x931_resist(key));
            }
        }
        all
    }
}

impl PartialEq for RandomSpec {
    fn eq(&self, other: &Self) -> bool {
        self.random_type == other.random_type
            && self.algorithm_spec == other.algorithm_spec
            && self.prediction_resistant == other.prediction_resistant
    }
}

impl Eq for RandomSpec {}

impl Hash for RandomSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.random_type.hash(state);
        self.algorithm_spec.hash(state);
        self.prediction_resistant.hash(state);
    }
}

impl fmt::Display for RandomSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Named constructors for every [`RandomSpec`] combination.
pub struct RandomSpecBuilder;

impl RandomSpecBuilder {
    pub fn hash(digest: DigestSpec) -> RandomSpec {
        RandomSpec::new(RandomType::Hash, digest, false)
    }

    pub fn hash_resist(digest: DigestSpec) -> RandomSpec {
        RandomSpec::new(RandomType::Hash, digest, true)
    }

    pub fn hmac(digest: DigestSpec) -> RandomSpec {
        RandomSpec::new(RandomType::Hmac, digest, false)
    }

    pub fn hmac_resist(digest: DigestSpec) -> RandomSpec {
        RandomSpec::new(RandomType::Hmac, digest, true)
    }

    pub fn ctr(key: SymKeySpec) -> RandomSpec {
        RandomSpec::new(RandomType::Ctr, key, false)
    }

    pub fn ctr_resist(key: SymKeySpec) -> RandomSpec {
        RandomSpec::new(RandomType::Ctr, key, true)
    }

    pub fn x931(key: SymKeySpec) -> RandomSpec {
        RandomSpec::new(RandomType::X931, key, false)
    }

    pub fn x931_resist(key: SymKeySpec) -> RandomSpec {
        RandomSpec::new(RandomType::X931, key, true)
    }

    /// Same as [`RandomSpec::list_all`].
    pub fn list_all() -> Vec<RandomSpec> {
        RandomSpec::list_all()
    }
}
