//! Encrypted envelope codec for the configuration-exchange channel.
//!
//! Wire format: base64url(nonce[12] || ciphertext || tag[16]), no padding.
//! The payload is JSON, zstd-compressed before sealing. The AEAD key is
//! derived fresh on every call from the injected secret and is never
//! stored.

use artcanvas_common::config::envelope::{
    AUTH_TAG_SIZE, HKDF_INFO, HKDF_SALT, KEY_SIZE, NONCE_SIZE, ZSTD_LEVEL,
};
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use data_encoding::BASE64URL_NOPAD;
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;

/// Codec failures.
///
/// Decryption deliberately collapses every failure mode into a single
/// `Authentication` variant so a caller cannot tell a bad tag from a
/// garbled payload.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Encryption secret is not set")]
    MissingSecret,

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed. This could be due to an incorrect password or corrupted data. Original error: {0}")]
    Authentication(String),
}

/// Seals and opens encrypted envelopes under a shared secret.
pub struct EnvelopeCodec {
    secret: Option<String>,
}

impl EnvelopeCodec {
    /// Create a codec over an injected secret. A missing secret is only
    /// reported when the codec is actually used.
    pub fn new(secret: Option<String>) -> Self {
        Self { secret }
    }

    /// Derive the 256-bit envelope key via HKDF-SHA256 over the secret,
    /// the fixed salt and the fixed context string.
    fn derive_key(&self) -> Result<[u8; KEY_SIZE], CodecError> {
        let secret = match self.secret.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => return Err(CodecError::MissingSecret),
        };

        let hk = Hkdf::<Sha256>::new(Some(HKDF_SALT), secret.as_bytes());
        let mut key = [0u8; KEY_SIZE];
        hk.expand(HKDF_INFO, &mut key)
            .map_err(|e| CodecError::Encryption(e.to_string()))?;
        Ok(key)
    }

    /// Encrypt a JSON value: JSON -> UTF-8 -> zstd -> AEAD -> base64url.
    pub fn encrypt(&self, params: &serde_json::Value) -> Result<String, CodecError> {
        self.encrypt_with_level(params, ZSTD_LEVEL)
    }

    pub fn encrypt_with_level(
        &self,
        params: &serde_json::Value,
        level: i32,
    ) -> Result<String, CodecError> {
        let plaintext =
            serde_json::to_vec(params).map_err(|e| CodecError::Encryption(e.to_string()))?;
        let compressed = zstd::stream::encode_all(plaintext.as_slice(), level)
            .map_err(|e| CodecError::Encryption(e.to_string()))?;

        let key = self.derive_key()?;
        let cipher = ChaCha20Poly1305::new(&key.into());

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        // encrypt() appends the 16-byte tag to the ciphertext
        let sealed = cipher
            .encrypt(nonce, compressed.as_slice())
            .map_err(|e| CodecError::Encryption(e.to_string()))?;

        let mut payload = Vec::with_capacity(NONCE_SIZE + sealed.len());
        payload.extend_from_slice(&nonce_bytes);
        payload.extend_from_slice(&sealed);

        Ok(BASE64URL_NOPAD.encode(&payload))
    }

    /// Decrypt an envelope: base64url -> AEAD -> zstd -> UTF-8 -> JSON.
    pub fn decrypt(&self, envelope: &str) -> Result<serde_json::Value, CodecError> {
        let key = self.derive_key()?;

        self.open(envelope, key)
            .map_err(CodecError::Authentication)
    }

    fn open(&self, envelope: &str, key: [u8; KEY_SIZE]) -> Result<serde_json::Value, String> {
        let payload = BASE64URL_NOPAD
            .decode(envelope.as_bytes())
            .map_err(|e| e.to_string())?;

        if payload.len() < NONCE_SIZE + AUTH_TAG_SIZE {
            return Err("payload too short".to_string());
        }

        let (nonce_bytes, sealed) = payload.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher = ChaCha20Poly1305::new(&key.into());
        let compressed = cipher
            .decrypt(nonce, sealed)
            .map_err(|_| "authentication tag mismatch".to_string())?;

        let plaintext =
            zstd::stream::decode_all(compressed.as_slice()).map_err(|e| e.to_string())?;

        serde_json::from_slice(&plaintext).map_err(|e| e.to_string())
    }
}
