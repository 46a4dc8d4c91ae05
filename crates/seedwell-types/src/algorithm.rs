//! Algorithm identifiers and immutable algorithm specifications.
//!
//! A specification names an algorithm and its parameters independently of
//! any provider. Validity is a predicate on the value, never an error: a
//! spec describing an impossible combination (for example SHA-1 with a
//! 512-bit output) can be built, listed and compared, and reports
//! `is_valid() == false`.

use std::fmt;

/// Digest output lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestLength {
    Len128,
    Len160,
    Len224,
    Len256,
    Len384,
    Len512,
}

impl DigestLength {
    pub const ALL: [DigestLength; 6] = [
        Self::Len128,
        Self::Len160,
        Self::Len224,
        Self::Len256,
        Self::Len384,
        Self::Len512,
    ];

    /// Length in bits.
    pub fn bits(self) -> usize {
        match self {
            Self::Len128 => 128,
            Self::Len160 => 160,
            Self::Len224 => 224,
            Self::Len256 => 256,
            Self::Len384 => 384,
            Self::Len512 => 512,
        }
    }

    /// Length in bytes.
    pub fn bytes(self) -> usize {
        self.bits() / 8
    }
}

/// Digest algorithm families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DigestType {
    Md5,
    Sha1,
    Sha2,
    Sha3,
    Sm3,
    Blake2b,
    Blake2s,
    Haraka,
}

impl DigestType {
    pub const ALL: [DigestType; 8] = [
        Self::Md5,
        Self::Sha1,
        Self::Sha2,
        Self::Sha3,
        Self::Sm3,
        Self::Blake2b,
        Self::Blake2s,
        Self::Haraka,
    ];

    /// Output lengths defined for this digest family.
    pub fn supported_lengths(self) -> &'static [DigestLength] {
        use DigestLength::*;
        match self {
            Self::Md5 => &[Len128],
            Self::Sha1 => &[Len160],
            Self::Sha2 | Self::Sha3 => &[Len224, Len256, Len384, Len512],
            Self::Sm3 => &[Len256],
            Self::Blake2b => &[Len160, Len256, Len384, Len512],
            Self::Blake2s => &[Len128, Len160, Len224, Len256],
            Self::Haraka => &[Len256, Len512],
        }
    }

    pub fn is_length_valid(self, length: DigestLength) -> bool {
        self.supported_lengths().contains(&length)
    }

    /// The length used when a family is named without one.
    pub fn default_length(self) -> DigestLength {
        use DigestLength::*;
        match self {
            Self::Md5 => Len128,
            Self::Sha1 => Len160,
            Self::Sha2 | Self::Sha3 | Self::Sm3 | Self::Blake2s | Self::Haraka => Len256,
            Self::Blake2b => Len512,
        }
    }

    /// Whether the digest can absorb arbitrary-length streaming input.
    ///
    /// Haraka is a fixed-input-size permutation hash and cannot back a DRBG.
    pub fn supports_large_data(self) -> bool {
        !matches!(self, Self::Haraka)
    }

    /// Internal block size in bytes for the given output length.
    pub fn block_size(self, length: DigestLength) -> usize {
        match self {
            Self::Md5 | Self::Sha1 | Self::Sm3 | Self::Blake2s => 64,
            Self::Sha2 => match length {
                DigestLength::Len384 | DigestLength::Len512 => 128,
                _ => 64,
            },
            // Keccak rate: 200 - 2 * output bytes.
            Self::Sha3 => 200 - 2 * length.bytes(),
            Self::Blake2b => 128,
            Self::Haraka => length.bytes(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Md5 => "MD5",
            Self::Sha1 => "SHA1",
            Self::Sha2 => "SHA2",
            Self::Sha3 => "SHA3",
            Self::Sm3 => "SM3",
            Self::Blake2b => "Blake2b",
            Self::Blake2s => "Blake2s",
            Self::Haraka => "Haraka",
        }
    }
}

impl fmt::Display for DigestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A digest algorithm together with its output length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DigestSpec {
    digest_type: DigestType,
    length: DigestLength,
}

impl DigestSpec {
    pub fn new(digest_type: DigestType, length: DigestLength) -> Self {
        DigestSpec {
            digest_type,
            length,
        }
    }

    /// Spec for the family's default length.
    pub fn of(digest_type: DigestType) -> Self {
        Self::new(digest_type, digest_type.default_length())
    }

    pub fn sha1() -> Self {
        Self::of(DigestType::Sha1)
    }

    pub fn sha2(length: DigestLength) -> Self {
        Self::new(DigestType::Sha2, length)
    }

    pub fn sha3(length: DigestLength) -> Self {
        Self::new(DigestType::Sha3, length)
    }

    pub fn digest_type(&self) -> DigestType {
        self.digest_type
    }

    pub fn length(&self) -> DigestLength {
        self.length
    }

    pub fn is_valid(&self) -> bool {
        self.digest_type.is_length_valid(self.length)
    }

    /// Every valid (family, length) combination.
    pub fn list_all() -> Vec<DigestSpec> {
        DigestType::ALL
            .iter()
            .flat_map(|t| t.supported_lengths().iter().map(|l| Self::new(*t, *l)))
            .collect()
    }
}

impl fmt::Display for DigestSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if matches!(self.digest_type.supported_lengths(), [only] if *only == self.length) {
            write!(f, "{}", self.digest_type)
        } else {
            write!(f, "{}-{}", self.digest_type, self.length.bits())
        }
    }
}

/// Symmetric key lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeyLength {
    Len128,
    Len192,
    Len256,
}

impl KeyLength {
    pub const ALL: [KeyLength; 3] = [Self::Len128, Self::Len192, Self::Len256];

    pub fn bits(self) -> usize {
        match self {
            Self::Len128 => 128,
            Self::Len192 => 192,
            Self::Len256 => 256,
        }
    }

    pub fn bytes(self) -> usize {
        self.bits() / 8
    }

    /// Look up a key length by its size in bytes.
    pub fn from_bytes(len: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.bytes() == len)
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Block cipher families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymKeyType {
    Aes,
    Camellia,
    Sm4,
    Twofish,
    Serpent,
    DesEde,
}

impl SymKeyType {
    pub const ALL: [SymKeyType; 6] = [
        Self::Aes,
        Self::Camellia,
        Self::Sm4,
        Self::Twofish,
        Self::Serpent,
        Self::DesEde,
    ];

    /// Block size in bytes.
    pub fn block_size(self) -> usize {
        match self {
            Self::DesEde => 8,
            _ => 16,
        }
    }

    pub fn supported_key_lengths(self) -> &'static [KeyLength] {
        use KeyLength::*;
        match self {
            Self::Aes | Self::Camellia | Self::Twofish | Self::Serpent => &[Len128, Len192, Len256],
            Self::Sm4 => &[Len128],
            Self::DesEde => &[Len128, Len192],
        }
    }

    pub fn is_key_length_valid(self, length: KeyLength) -> bool {
        self.supported_key_lengths().contains(&length)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Aes => "AES",
            Self::Camellia => "Camellia",
            Self::Sm4 => "SM4",
            Self::Twofish => "Twofish",
            Self::Serpent => "Serpent",
            Self::DesEde => "DESede",
        }
    }
}

impl fmt::Display for SymKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A block cipher together with its key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymKeySpec {
    key_type: SymKeyType,
    key_length: KeyLength,
}

impl SymKeySpec {
    pub fn new(key_type: SymKeyType, key_length: KeyLength) -> Self {
        SymKeySpec {
            key_type,
            key_length,
        }
    }

    pub fn aes(key_length: KeyLength) -> Self {
        Self::new(SymKeyType::Aes, key_length)
    }

    pub fn key_type(&self) -> SymKeyType {
        self.key_type
    }

    pub fn key_length(&self) -> KeyLength {
        self.key_length
    }

    pub fn block_size(&self) -> usize {
        self.key_type.block_size()
    }

    pub fn is_valid(&self) -> bool {
        self.key_type.is_key_length_valid(self.key_length)
    }

    /// Every valid spec with the given key length.
    pub fn list_all(key_length: KeyLength) -> Vec<SymKeySpec> {
        SymKeyType::ALL
            .iter()
            .filter(|t| t.is_key_length_valid(key_length))
            .map(|t| Self::new(*t, key_length))
            .collect()
    }
}

impl fmt::Display for SymKeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key_type, self.key_length)
    }
}

/// Stream cipher families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StreamKeyType {
    ChaCha20,
    XChaCha20,
    Salsa20,
    XSalsa20,
    Rc4,
}

impl StreamKeyType {
    pub const ALL: [StreamKeyType; 5] = [
        Self::ChaCha20,
        Self::XChaCha20,
        Self::Salsa20,
        Self::XSalsa20,
        Self::Rc4,
    ];

    pub fn supported_key_lengths(self) -> &'static [KeyLength] {
        use KeyLength::*;
        match self {
            Self::ChaCha20 | Self::XChaCha20 | Self::XSalsa20 => &[Len256],
            Self::Salsa20 => &[Len128, Len256],
            Self::Rc4 => &[Len128, Len192, Len256],
        }
    }

    pub fn is_key_length_valid(self, length: KeyLength) -> bool {
        self.supported_key_lengths().contains(&length)
    }

    /// RC4 keystream biases make it unfit for bulk data.
    pub fn supports_large_data(self) -> bool {
        !matches!(self, Self::Rc4)
    }

    fn name(self) -> &'static str {
        match self {
            Self::ChaCha20 => "ChaCha20",
            Self::XChaCha20 => "XChaCha20",
            Self::Salsa20 => "Salsa20",
            Self::XSalsa20 => "XSalsa20",
            Self::Rc4 => "RC4",
        }
    }
}

impl fmt::Display for StreamKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stream cipher together with its key length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamKeySpec {
    key_type: StreamKeyType,
    key_length: KeyLength,
}

impl StreamKeySpec {
    pub fn new(key_type: StreamKeyType, key_length: KeyLength) -> Self {
        StreamKeySpec {
            key_type,
            key_length,
        }
    }

    pub fn key_type(&self) -> StreamKeyType {
        self.key_type
    }

    pub fn key_length(&self) -> KeyLength {
        self.key_length
    }

    pub fn is_valid(&self) -> bool {
        self.key_type.is_key_length_valid(self.key_length)
    }

    pub fn list_all(key_length: KeyLength) -> Vec<StreamKeySpec> {
        StreamKeyType::ALL
            .iter()
            .filter(|t| t.is_key_length_valid(key_length))
            .map(|t| Self::new(*t, key_length))
            .collect()
    }
}

impl fmt::Display for StreamKeySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.key_type, self.key_length)
    }
}

/// MAC algorithm specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacSpec {
    /// HMAC over a digest, keyed with `key_length` bits.
    Hmac {
        digest: DigestSpec,
        key_length: KeyLength,
    },
}

impl MacSpec {
    pub fn hmac(digest: DigestSpec, key_length: KeyLength) -> Self {
        Self::Hmac { digest, key_length }
    }

    pub fn key_length(&self) -> KeyLength {
        match self {
            Self::Hmac { key_length, .. } => *key_length,
        }
    }

    pub fn digest_spec(&self) -> Option<&DigestSpec> {
        match self {
            Self::Hmac { digest, .. } => Some(digest),
        }
    }

    pub fn is_valid(&self) -> bool {
        match self {
            Self::Hmac { digest, .. } => digest.is_valid(),
        }
    }

    /// Whether the MAC can process arbitrarily long messages.
    pub fn supports_large_data(&self) -> bool {
        match self {
            Self::Hmac { digest, .. } => digest.digest_type().supports_large_data(),
        }
    }
}

impl fmt::Display for MacSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hmac { digest, key_length } => write!(f, "HMAC-{digest}-{key_length}"),
        }
    }
}
