//! AES-CFB encryption for credential fields at rest.
//!
//! Encrypted format: `base64_nopad(iv (16 bytes) || cfb(key, iv, padded))`
//!
//! Plaintext shorter than one block is right-padded with spaces up to 16
//! bytes, and decryption trims spaces from both ends. The key length picks
//! the AES variant (16/24/32 bytes -> AES-128/192/256).
//!
//! SECURITY: Error types never contain plaintext or key material.

use aes::{Aes128, Aes192, Aes256};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use rand::RngCore;
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretBox, SecretString};

use vaultbot_core::service::crypto::SecretCipher;
use vaultbot_types::error::CryptoError;

/// AES block size; also the IV size and the padding target.
const BLOCK_SIZE: usize = 16;

/// Fill byte for short plaintexts.
const PAD: u8 = b' ';

/// AES-CFB `SecretCipher` with a fresh random IV per call.
///
/// Encrypting the same plaintext twice produces different output.
pub struct AesCfbCipher {
    key: SecretBox<[u8]>,
}

impl AesCfbCipher {
    /// Create a cipher from raw key bytes (16, 24 or 32 of them).
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        match key.len() {
            16 | 24 | 32 => Ok(Self {
                key: SecretBox::new(key.to_vec().into_boxed_slice()),
            }),
            n => Err(CryptoError::InvalidKeyLength(n)),
        }
    }

    /// Create a cipher from a configured key string, using its UTF-8 bytes.
    pub fn from_secret(key: &SecretString) -> Result<Self, CryptoError> {
        Self::new(key.expose_secret().as_bytes())
    }

    fn encrypt_in_place(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        let key = self.key.expose_secret();
        let bad_key = |_| CryptoError::InvalidKeyLength(key.len());
        match key.len() {
            16 => cfb_mode::Encryptor::<Aes128>::new_from_slices(key, iv)
                .map_err(bad_key)?
                .encrypt(buf),
            24 => cfb_mode::Encryptor::<Aes192>::new_from_slices(key, iv)
                .map_err(bad_key)?
                .encrypt(buf),
            32 => cfb_mode::Encryptor::<Aes256>::new_from_slices(key, iv)
                .map_err(bad_key)?
                .encrypt(buf),
            n => return Err(CryptoError::InvalidKeyLength(n)),
        }
        Ok(())
    }

    fn decrypt_in_place(&self, iv: &[u8], buf: &mut [u8]) -> Result<(), CryptoError> {
        let key = self.key.expose_secret();
        let bad_key = |_| CryptoError::InvalidKeyLength(key.len());
        match key.len() {
            16 => cfb_mode::Decryptor::<Aes128>::new_from_slices(key, iv)
                .map_err(bad_key)?
                .decrypt(buf),
            24 => cfb_mode::Decryptor::<Aes192>::new_from_slices(key, iv)
                .map_err(bad_key)?
                .decrypt(buf),
            32 => cfb_mode::Decryptor::<Aes256>::new_from_slices(key, iv)
                .map_err(bad_key)?
                .decrypt(buf),
            n => return Err(CryptoError::InvalidKeyLength(n)),
        }
        Ok(())
    }
}

impl SecretCipher for AesCfbCipher {
    fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let mut padded = plaintext.as_bytes().to_vec();
        if padded.len() < BLOCK_SIZE {
            padded.resize(BLOCK_SIZE, PAD);
        }

        let mut out = vec![0u8; BLOCK_SIZE + padded.len()];
        let (iv, body) = out.split_at_mut(BLOCK_SIZE);
        OsRng
            .try_fill_bytes(iv)
            .map_err(|_| CryptoError::RandomSource)?;
        body.copy_from_slice(&padded);
        self.encrypt_in_place(iv, body)?;

        Ok(STANDARD_NO_PAD.encode(&out))
    }

    /// Anything shorter than one block (including the empty string) is
    /// returned unchanged, matching what `encrypt` leaves alone.
    fn decrypt(&self, ciphertext: &str) -> Result<String, CryptoError> {
        if ciphertext.len() < BLOCK_SIZE {
            return Ok(ciphertext.to_string());
        }

        let mut data = STANDARD_NO_PAD
            .decode(ciphertext)
            .map_err(|_| CryptoError::Encoding)?;
        if data.len() < BLOCK_SIZE {
            return Err(CryptoError::CiphertextTooShort);
        }

        let (iv, body) = data.split_at_mut(BLOCK_SIZE);
        self.decrypt_in_place(iv, body)?;

        let text = std::str::from_utf8(body).map_err(|_| CryptoError::InvalidUtf8)?;
        Ok(text.trim_matches(PAD as char).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_KEY: &[u8] = b"1234567890123456";

    fn cipher() -> AesCfbCipher {
        AesCfbCipher::new(TEST_KEY).unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let cipher = cipher();
        let encrypted = cipher.encrypt("test").unwrap();
        assert_ne!(encrypted, "test");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "test");
    }

    #[test]
    fn test_roundtrip_longer_than_block() {
        let cipher = cipher();
        let plaintext = "dqwfqwedfefqfqfhkqfjqjfgqwdqwfgqwefhqvdjvqwvf";
        let encrypted = cipher.encrypt(plaintext).unwrap();
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), plaintext);
    }

    #[test]
    fn test_roundtrip_multibyte_utf8() {
        let cipher = cipher();
        let encrypted = cipher.encrypt("пароль").unwrap();
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "пароль");
    }

    #[test]
    fn test_empty_is_noop() {
        let cipher = cipher();
        assert_eq!(cipher.encrypt("").unwrap(), "");
        assert_eq!(cipher.decrypt("").unwrap(), "");
    }

    #[test]
    fn test_short_input_passes_through_decrypt() {
        assert_eq!(cipher().decrypt("test1").unwrap(), "test1");
    }

    #[test]
    fn test_random_iv_produces_different_ciphertexts() {
        let cipher = cipher();
        let first = cipher.encrypt("same plaintext").unwrap();
        let second = cipher.encrypt("same plaintext").unwrap();

        assert_ne!(first, second);
        assert_eq!(cipher.decrypt(&first).unwrap(), "same plaintext");
        assert_eq!(cipher.decrypt(&second).unwrap(), "same plaintext");
    }

    #[test]
    fn test_ciphertext_layout() {
        // Short input is padded to one block: 16 IV + 16 body bytes -> 43 chars unpadded base64.
        let encrypted = cipher().encrypt("abc").unwrap();
        assert_eq!(encrypted.len(), 43);
        assert!(!encrypted.ends_with('='));
        assert_eq!(STANDARD_NO_PAD.decode(&encrypted).unwrap().len(), 32);
    }

    #[test]
    fn test_all_key_sizes() {
        for key in [&[7u8; 16][..], &[7u8; 24][..], &[7u8; 32][..]] {
            let cipher = AesCfbCipher::new(key).unwrap();
            let encrypted = cipher.encrypt("secret api key").unwrap();
            assert_eq!(cipher.decrypt(&encrypted).unwrap(), "secret api key");
        }
    }

    #[test]
    fn test_invalid_key_length() {
        let err = AesCfbCipher::new(b"short").err().unwrap();
        assert!(matches!(err, CryptoError::InvalidKeyLength(5)));
    }

    #[test]
    fn test_from_secret() {
        let key = SecretString::from("0123456789abcdef0123456789abcdef".to_string());
        let cipher = AesCfbCipher::from_secret(&key).unwrap();
        let encrypted = cipher.encrypt("hello").unwrap();
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "hello");
    }

    #[test]
    fn test_wrong_key_does_not_recover_plaintext() {
        let encrypted = cipher().encrypt("secret value 123").unwrap();
        let other = AesCfbCipher::new(b"6543210987654321").unwrap();
        assert_ne!(
            other.decrypt(&encrypted).ok().as_deref(),
            Some("secret value 123")
        );
    }

    #[test]
    fn test_invalid_base64() {
        let err = cipher().decrypt("this is not base64 at all!!").unwrap_err();
        assert!(matches!(err, CryptoError::Encoding));
    }

    #[test]
    fn test_decoded_payload_shorter_than_block() {
        // 16 base64 chars decode to 12 bytes: long enough to be treated as
        // ciphertext, too short to hold an IV.
        let err = cipher().decrypt("AAAAAAAAAAAAAAAA").unwrap_err();
        assert!(matches!(err, CryptoError::CiphertextTooShort));
    }

    #[test]
    fn test_crypto_error_never_contains_secrets() {
        let test_secret = "sk-super-secret-value-12345";
        let errors = [
            CryptoError::InvalidKeyLength(3),
            CryptoError::Encoding,
            CryptoError::CiphertextTooShort,
            CryptoError::InvalidUtf8,
            CryptoError::RandomSource,
        ];
        for err in &errors {
            let msg = err.to_string();
            assert!(!msg.contains(test_secret), "Error leaks secret value: {msg}");
        }
    }

    proptest! {
        #[test]
        fn prop_roundtrip(plaintext in "[!-~]{1,80}") {
            let cipher = cipher();
            let encrypted = cipher.encrypt(&plaintext).unwrap();
            prop_assert_eq!(cipher.decrypt(&encrypted).unwrap(), plaintext);
        }
    }
}
