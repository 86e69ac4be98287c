//! Symmetric encryption for provider access tokens.
//!
//! During a login by an unregistered user the provider access token has to
//! survive a round trip through the client until `register` is called. It is
//! handed out encrypted with AES-256-GCM so the client never sees a usable
//! token.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};

use crate::error::{AppError, AppResult};

/// AES-256-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Cipher wrapping the configured 32-byte key.
#[derive(Clone)]
pub struct TokenCipher {
    cipher: Aes256Gcm,
}

impl TokenCipher {
    /// Builds a cipher from the base64-encoded key in the OAuth config.
    pub fn from_base64_key(encoded: &str) -> AppResult<Self> {
        let key_bytes = STANDARD_NO_PAD
            .decode(encoded.trim_end_matches('='))
            .map_err(|e| AppError::Configuration {
                key: "oauth.token_cipher_key".to_string(),
                source: anyhow::anyhow!("not valid base64: {}", e),
            })?;
        if key_bytes.len() != 32 {
            return Err(AppError::Configuration {
                key: "oauth.token_cipher_key".to_string(),
                source: anyhow::anyhow!("must decode to 32 bytes, got {}", key_bytes.len()),
            });
        }

        let key = Key::<Aes256Gcm>::from_slice(&key_bytes);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Encrypts a token, returning base64(nonce || ciphertext).
    pub fn encrypt(&self, plaintext: &str) -> AppResult<String> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| AppError::Internal {
                source: anyhow::anyhow!("token encryption failed"),
            })?;

        let mut payload = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        payload.extend_from_slice(&nonce);
        payload.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(payload))
    }

    /// Decrypts a payload produced by [`encrypt`](Self::encrypt).
    ///
    /// Tampered or truncated payloads come back as `Unauthorized` rather
    /// than an internal error; they originate from the client.
    pub fn decrypt(&self, encoded: &str) -> AppResult<String> {
        let payload = STANDARD.decode(encoded).map_err(|_| AppError::Unauthorized {
            message: "Malformed encrypted token".to_string(),
        })?;
        if payload.len() <= NONCE_LEN {
            return Err(AppError::Unauthorized {
                message: "Malformed encrypted token".to_string(),
            });
        }

        let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);
        let plaintext =
            self.cipher
                .decrypt(nonce, ciphertext)
                .map_err(|_| AppError::Unauthorized {
                    message: "Encrypted token failed authentication".to_string(),
                })?;

        String::from_utf8(plaintext).map_err(|_| AppError::Unauthorized {
            message: "Encrypted token is not valid UTF-8".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 43 base64 chars decode to exactly 32 bytes.
    const TEST_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

    #[test]
    fn round_trip() {
        let cipher = TokenCipher::from_base64_key(TEST_KEY).unwrap();
        let token = "gho_abcdef0123456789";

        let encrypted = cipher.encrypt(token).unwrap();
        assert_ne!(encrypted, token);
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), token);
    }

    #[test]
    fn encrypting_twice_differs() {
        let cipher = TokenCipher::from_base64_key(TEST_KEY).unwrap();

        let first = cipher.encrypt("same input").unwrap();
        let second = cipher.encrypt("same input").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn rejects_short_key() {
        let result = TokenCipher::from_base64_key("c2hvcnQ");
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[test]
    fn rejects_tampered_payload() {
        let cipher = TokenCipher::from_base64_key(TEST_KEY).unwrap();
        let mut payload = STANDARD.decode(cipher.encrypt("secret").unwrap()).unwrap();
        let last = payload.len() - 1;
        payload[last] ^= 0x01;

        let result = cipher.decrypt(&STANDARD.encode(payload));
        assert!(matches!(result, Err(AppError::Unauthorized { .. })));
    }

    #[test]
    fn rejects_garbage_input() {
        let cipher = TokenCipher::from_base64_key(TEST_KEY).unwrap();
        assert!(cipher.decrypt("not base64 at all!").is_err());
        assert!(cipher.decrypt("AAAA").is_err());
    }
}
