//! AES-256-GCM sealing of registry credentials.
//!
//! Sealed blobs are `nonce (12 bytes) || ciphertext+tag`.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use scanboard_application::SecretEncryptor;
use scanboard_core::{AppError, AppResult};

const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Seals registry secrets before they reach the `container_registries` table.
#[derive(Clone)]
pub struct AesSecretEncryptor {
    cipher: Aes256Gcm,
}

impl AesSecretEncryptor {
    /// Creates an encryptor from raw key bytes.
    #[must_use]
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
        }
    }

    /// Creates an encryptor from the hex `REGISTRY_ENCRYPTION_KEY` value.
    pub fn from_hex(hex_key: &str) -> AppResult<Self> {
        let decoded = hex::decode(hex_key.trim()).map_err(|error| {
            AppError::Validation(format!("REGISTRY_ENCRYPTION_KEY is not valid hex: {error}"))
        })?;

        let key: [u8; KEY_LEN] = decoded.try_into().map_err(|_| {
            AppError::Validation(
                "REGISTRY_ENCRYPTION_KEY must decode to 32 bytes (64 hex characters)".to_owned(),
            )
        })?;

        Ok(Self::new(&key))
    }

    /// Opens a blob sealed by [`SecretEncryptor::encrypt`] with the same key.
    pub fn decrypt(&self, stored: &[u8]) -> AppResult<Vec<u8>> {
        let Some((nonce_bytes, sealed)) = stored.split_first_chunk::<NONCE_LEN>() else {
            return Err(AppError::Internal(
                "stored registry secret is shorter than its nonce".to_owned(),
            ));
        };

        self.cipher
            .decrypt(&Nonce::from(*nonce_bytes), sealed)
            .map_err(|error| {
                AppError::Internal(format!("failed to open registry secret: {error}"))
            })
    }
}

impl SecretEncryptor for AesSecretEncryptor {
    fn encrypt(&self, plaintext: &[u8]) -> AppResult<Vec<u8>> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let sealed = self.cipher.encrypt(&nonce, plaintext).map_err(|error| {
            AppError::Internal(format!("failed to seal registry secret: {error}"))
        })?;

        let mut stored = Vec::with_capacity(NONCE_LEN + sealed.len());
        stored.extend_from_slice(nonce.as_slice());
        stored.extend_from_slice(&sealed);
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::AesSecretEncryptor;
    use scanboard_application::SecretEncryptor;
    use scanboard_core::{AppError, AppResult};

    const HEX_KEY: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

    #[test]
    fn sealed_secret_opens_with_same_key() -> AppResult<()> {
        let encryptor = AesSecretEncryptor::from_hex(HEX_KEY)?;

        let sealed = encryptor.encrypt(br#"{"gitlab_access_token":"glpat"}"#)?;
        assert_ne!(sealed.as_slice(), br#"{"gitlab_access_token":"glpat"}"#.as_slice());

        let opened = encryptor.decrypt(&sealed)?;
        assert_eq!(opened, br#"{"gitlab_access_token":"glpat"}"#);
        Ok(())
    }

    #[test]
    fn each_seal_uses_a_fresh_nonce() -> AppResult<()> {
        let encryptor = AesSecretEncryptor::new(&[7_u8; 32]);

        let first = encryptor.encrypt(b"token")?;
        let second = encryptor.encrypt(b"token")?;
        assert_ne!(first, second);
        Ok(())
    }

    #[test]
    fn other_key_cannot_open_secret() -> AppResult<()> {
        let sealed = AesSecretEncryptor::new(&[1_u8; 32]).encrypt(b"token")?;

        assert!(AesSecretEncryptor::new(&[2_u8; 32]).decrypt(&sealed).is_err());
        assert!(AesSecretEncryptor::new(&[1_u8; 32]).decrypt(&sealed[..4]).is_err());
        Ok(())
    }

    #[test]
    fn malformed_keys_are_rejected() {
        assert!(matches!(
            AesSecretEncryptor::from_hex("not-hex"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            AesSecretEncryptor::from_hex("abcd"),
            Err(AppError::Validation(_))
        ));
    }
}
