//! AES (Advanced Encryption Standard) block cipher.
//!
//! Adapts the RustCrypto `aes` implementation (AES-128, AES-192, AES-256)
//! to the provider [`BlockCipher`] trait.

use crate::provider::BlockCipher;
use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};
use aes::{Aes128, Aes192, Aes256};
use seedwell_types::{CryptoError, KeyLength};

/// AES block size in bytes (128 bits).
pub const AES_BLOCK_SIZE: usize = 16;

enum AesKey {
    Aes128(Aes128),
    Aes192(Aes192),
    Aes256(Aes256),
}

/// AES cipher context for a fixed key length.
pub struct AesCipher {
    key_length: KeyLength,
    key: Option<AesKey>,
}

impl AesCipher {
    /// Create an unkeyed AES context.
    pub fn new(key_length: KeyLength) -> Self {
        AesCipher {
            key_length,
            key: None,
        }
    }

    fn schedule(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        let expected = self.key_length.bytes();
        if key.len() != expected {
            return Err(CryptoError::InvalidKeyLength {
                expected,
                got: key.len(),
            });
        }
        let invalid = |_| CryptoError::InvalidKeyLength {
            expected,
            got: key.len(),
        };
        self.key = Some(match self.key_length {
            KeyLength::Len128 => AesKey::Aes128(Aes128::new_from_slice(key).map_err(invalid)?),
            KeyLength::Len192 => AesKey::Aes192(Aes192::new_from_slice(key).map_err(invalid)?),
            KeyLength::Len256 => AesKey::Aes256(Aes256::new_from_slice(key).map_err(invalid)?),
        });
        Ok(())
    }

    fn checked<'a>(&self, block: &'a mut [u8]) -> Result<(&AesKey, &'a mut [u8]), CryptoError> {
        if block.len() != AES_BLOCK_SIZE {
            return Err(CryptoError::InvalidBlockLength {
                expected: AES_BLOCK_SIZE,
                got: block.len(),
            });
        }
        let key = self.key.as_ref().ok_or(CryptoError::KeyNotSet)?;
        Ok((key, block))
    }
}

impl BlockCipher for AesCipher {
    fn block_size(&self) -> usize {
        AES_BLOCK_SIZE
    }

    fn key_size(&self) -> usize {
        self.key_length.bytes()
    }

    fn set_encrypt_key(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        self.schedule(key)
    }

    fn set_decrypt_key(&mut self, key: &[u8]) -> Result<(), CryptoError> {
        self.schedule(key)
    }

    fn encrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        let (key, block) = self.checked(block)?;
        let block = GenericArray::from_mut_slice(block);
        match key {
            AesKey::Aes128(c) => c.encrypt_block(block),
            AesKey::Aes192(c) => c.encrypt_block(block),
            AesKey::Aes256(c) => c.encrypt_block(block),
        }
        Ok(())
    }

    fn decrypt_block(&self, block: &mut [u8]) -> Result<(), CryptoError> {
        let (key, block) = self.checked(block)?;
        let block = GenericArray::from_mut_slice(block);
        match key {
            AesKey::Aes128(c) => c.decrypt_block(block),
            AesKey::Aes192(c) => c.decrypt_block(block),
            AesKey::Aes256(c) => c.decrypt_block(block),
        }
        Ok(())
    }
}
