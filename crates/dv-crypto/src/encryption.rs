//! AES-256-GCM authenticated encryption of record payloads.
//!
//! Every call to [`seal`] draws a fresh random 96-bit nonce and prepends it
//! to the ciphertext, so a blob carries everything needed to open it except
//! the key.
//!
//! ```text
//! Blob layout:
//! ┌──────────────┬────────────────────────────┬──────────────────┐
//! │  nonce       │  encrypted data            │  auth tag        │
//! │  [0..12]     │  [12..len-16]              │  [last 16 bytes] │
//! └──────────────┴────────────────────────────┴──────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use dv_crypto::encryption::{EncryptionKey, seal, open};
//!
//! let key = EncryptionKey::generate();
//! let blob = seal(&key, b"sensitive record").unwrap();
//! let plaintext = open(&key, &blob).unwrap();
//! assert_eq!(plaintext, b"sensitive record");
//! ```
//!
//! # Security
//!
//! - **Never reuse a nonce** with the same key. Nonces are random per call;
//!   at 2^32 messages per key the collision probability is still negligible.
//! - The key is never logged and never stored alongside ciphertext.
//! - Decryption fails if any byte of the nonce, ciphertext or tag changes.

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, Key, KeyInit, Nonce as GcmNonce};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::{BufMut, Bytes, BytesMut};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::CryptoError;

// ============================================================================
// Constants
// ============================================================================

/// Length of an AES-256-GCM encryption key in bytes (256 bits).
pub const KEY_LENGTH: usize = 32;

/// Length of an AES-256-GCM nonce in bytes (96 bits).
pub const NONCE_LENGTH: usize = 12;

/// Length of the AES-GCM authentication tag in bytes (128 bits).
pub const TAG_LENGTH: usize = 16;

/// Smallest well-formed blob: a nonce and a tag around an empty payload.
pub const MIN_BLOB_LENGTH: usize = NONCE_LENGTH + TAG_LENGTH;

/// Default environment variable holding the base64 key.
pub const DEFAULT_KEY_VAR: &str = "DATAVAULT_ENCRYPTION_KEY";

// ============================================================================
// EncryptionKey
// ============================================================================

/// An AES-256-GCM encryption key (256 bits).
///
/// Key material is securely zeroed from memory when dropped via [`ZeroizeOnDrop`].
/// `Debug` never prints the key bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey {
    key: [u8; KEY_LENGTH],
}

impl EncryptionKey {
    /// Generates a new random encryption key using the OS CSPRNG.
    ///
    /// # Panics
    ///
    /// Panics if the OS CSPRNG fails (catastrophic system error).
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LENGTH];
        getrandom::fill(&mut key).expect("CSPRNG failure");

        debug_assert!(key.iter().any(|&b| b != 0), "CSPRNG produced all-zero key");

        Self { key }
    }

    /// Restores an encryption key from its 32-byte representation.
    pub fn from_bytes(bytes: &[u8; KEY_LENGTH]) -> Self {
        Self { key: *bytes }
    }

    /// Builds a key from untyped bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidKey`] unless `bytes` is exactly
    /// [`KEY_LENGTH`] long. Input is never truncated or padded.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LENGTH] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKey {
                actual: bytes.len(),
            })?;
        Ok(Self { key })
    }

    /// Decodes a base64 key, as supplied through the environment.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let mut decoded = BASE64
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidKeyEncoding(e.to_string()))?;
        let key = Self::try_from_slice(&decoded);
        decoded.zeroize();
        key
    }

    /// Loads a base64 key from the named environment variable.
    pub fn from_env(var: &str) -> Result<Self, CryptoError> {
        let encoded = std::env::var(var).map_err(|_| CryptoError::MissingKey(var.to_string()))?;
        Self::from_base64(&encoded)
    }

    /// Returns the key as base64, for handing to a secret store.
    ///
    /// # Security
    ///
    /// This is secret key material.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.key)
    }

    fn cipher(&self) -> Aes256Gcm {
        Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(&self.key))
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EncryptionKey([REDACTED])")
    }
}

// ============================================================================
// Nonce
// ============================================================================

/// A random AES-256-GCM nonce (96 bits), fresh for every encryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Nonce {
    bytes: [u8; NONCE_LENGTH],
}

impl Nonce {
    /// Draws a nonce from the OS CSPRNG.
    pub fn random() -> Result<Self, CryptoError> {
        let mut bytes = [0u8; NONCE_LENGTH];
        getrandom::fill(&mut bytes).map_err(|e| CryptoError::Random(e.to_string()))?;
        Ok(Self { bytes })
    }

    pub fn to_bytes(&self) -> [u8; NONCE_LENGTH] {
        self.bytes
    }
}

// ============================================================================
// EncryptedBlob
// ============================================================================

/// Opaque `nonce || ciphertext || tag`, as persisted.
///
/// Carries no plaintext metadata. Immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedBlob {
    data: Bytes,
}

impl EncryptedBlob {
    /// Wraps stored bytes, checking only the minimum length.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Format`] if the blob cannot hold a nonce and tag.
    pub fn from_bytes(data: impl Into<Bytes>) -> Result<Self, CryptoError> {
        let data = data.into();
        if data.len() < MIN_BLOB_LENGTH {
            return Err(CryptoError::Format(format!(
                "blob is {} bytes, need at least {MIN_BLOB_LENGTH}",
                data.len()
            )));
        }
        Ok(Self { data })
    }

    /// Parses the base64 text form of a blob.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let data = BASE64
            .decode(encoded.trim())
            .map_err(|e| CryptoError::Format(format!("invalid base64: {e}")))?;
        Self::from_bytes(data)
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn nonce(&self) -> Nonce {
        let mut bytes = [0u8; NONCE_LENGTH];
        bytes.copy_from_slice(&self.data[..NONCE_LENGTH]);
        Nonce { bytes }
    }

    fn ciphertext(&self) -> &[u8] {
        &self.data[NONCE_LENGTH..]
    }
}

impl std::fmt::Debug for EncryptedBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptedBlob")
            .field("len", &self.data.len())
            .finish()
    }
}

// ============================================================================
// Seal / Open
// ============================================================================

/// Encrypts `plaintext` under a fresh random nonce.
///
/// The returned blob is `plaintext.len() + NONCE_LENGTH + TAG_LENGTH` bytes.
pub fn seal(key: &EncryptionKey, plaintext: &[u8]) -> Result<EncryptedBlob, CryptoError> {
    let nonce = Nonce::random()?;
    let ciphertext = key
        .cipher()
        .encrypt(GcmNonce::from_slice(&nonce.bytes), plaintext)
        .map_err(|_| CryptoError::Encryption)?;

    let mut data = BytesMut::with_capacity(NONCE_LENGTH + ciphertext.len());
    data.put_slice(&nonce.bytes);
    data.put_slice(&ciphertext);

    debug_assert_eq!(
        data.len(),
        plaintext.len() + MIN_BLOB_LENGTH,
        "blob length mismatch"
    );

    Ok(EncryptedBlob {
        data: data.freeze(),
    })
}

/// Verifies and decrypts a blob.
///
/// # Errors
///
/// Returns [`CryptoError::Integrity`] if the key is wrong or any byte of the
/// blob was modified.
pub fn open(key: &EncryptionKey, blob: &EncryptedBlob) -> Result<Vec<u8>, CryptoError> {
    let nonce = blob.nonce();
    let plaintext = key
        .cipher()
        .decrypt(GcmNonce::from_slice(&nonce.bytes), blob.ciphertext())
        .map_err(|_| CryptoError::Integrity)?;

    debug_assert_eq!(
        plaintext.len(),
        blob.len() - MIN_BLOB_LENGTH,
        "plaintext length mismatch"
    );

    Ok(plaintext)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let key = EncryptionKey::generate();
        let blob = seal(&key, b"sensitive tenant data").unwrap();
        assert_eq!(open(&key, &blob).unwrap(), b"sensitive tenant data");
    }

    #[test]
    fn seal_open_empty_plaintext() {
        let key = EncryptionKey::generate();
        let blob = seal(&key, b"").unwrap();

        assert_eq!(blob.len(), MIN_BLOB_LENGTH);
        assert!(open(&key, &blob).unwrap().is_empty());
    }

    #[test]
    fn blob_length_is_nonce_plus_plaintext_plus_tag() {
        let key = EncryptionKey::generate();
        let blob = seal(&key, b"hello world").unwrap();
        assert_eq!(blob.len(), 11 + NONCE_LENGTH + TAG_LENGTH);
    }

    #[test]
    fn wrong_key_fails_with_integrity_error() {
        let blob = seal(&EncryptionKey::generate(), b"secret message").unwrap();
        let result = open(&EncryptionKey::generate(), &blob);
        assert!(matches!(result, Err(CryptoError::Integrity)));
    }

    #[test]
    fn tampered_tag_fails() {
        let key = EncryptionKey::generate();
        let blob = seal(&key, b"secret message").unwrap();

        let mut tampered = blob.as_bytes().to_vec();
        let last = tampered.len() - 1;
        tampered[last] ^= 0x01;
        let tampered = EncryptedBlob::from_bytes(tampered).unwrap();

        assert!(matches!(open(&key, &tampered), Err(CryptoError::Integrity)));
    }

    #[test]
    fn tampered_nonce_fails() {
        let key = EncryptionKey::generate();
        let blob = seal(&key, b"secret message").unwrap();

        let mut tampered = blob.as_bytes().to_vec();
        tampered[0] ^= 0x80;
        let tampered = EncryptedBlob::from_bytes(tampered).unwrap();

        assert!(matches!(open(&key, &tampered), Err(CryptoError::Integrity)));
    }

    #[test]
    fn same_plaintext_never_repeats_nonce_or_ciphertext() {
        let key = EncryptionKey::generate();
        let mut nonces = std::collections::HashSet::new();
        let mut blobs = std::collections::HashSet::new();

        for _ in 0..1000 {
            let blob = seal(&key, b"same plaintext").unwrap();
            assert!(nonces.insert(blob.nonce().to_bytes()), "nonce reused");
            assert!(blobs.insert(blob.as_bytes().to_vec()), "ciphertext repeated");
        }
    }

    #[test]
    fn short_blob_is_format_error() {
        let result = EncryptedBlob::from_bytes(vec![0u8; NONCE_LENGTH - 1]);
        assert!(matches!(result, Err(CryptoError::Format(_))));

        let result = EncryptedBlob::from_bytes(vec![0u8; MIN_BLOB_LENGTH - 1]);
        assert!(matches!(result, Err(CryptoError::Format(_))));
    }

    #[test]
    fn invalid_base64_blob_is_format_error() {
        let result = EncryptedBlob::from_base64("not base64 at all!!");
        assert!(matches!(result, Err(CryptoError::Format(_))));
    }

    #[test]
    fn blob_base64_roundtrip() {
        let key = EncryptionKey::generate();
        let blob = seal(&key, b"data to store").unwrap();
        let restored = EncryptedBlob::from_base64(&blob.to_base64()).unwrap();
        assert_eq!(open(&key, &restored).unwrap(), b"data to store");
    }

    #[test]
    fn key_from_slice_rejects_wrong_lengths() {
        for len in [0usize, 16, 24, 31, 33, 64] {
            let result = EncryptionKey::try_from_slice(&vec![7u8; len]);
            assert!(
                matches!(result, Err(CryptoError::InvalidKey { actual }) if actual == len),
                "length {len} accepted"
            );
        }
        assert!(EncryptionKey::try_from_slice(&[7u8; KEY_LENGTH]).is_ok());
    }

    #[test]
    fn key_base64_roundtrip() {
        let key = EncryptionKey::generate();
        let restored = EncryptionKey::from_base64(&key.to_base64()).unwrap();

        let blob = seal(&key, b"test").unwrap();
        assert_eq!(open(&restored, &blob).unwrap(), b"test");
    }

    #[test]
    fn key_base64_with_wrong_length_is_invalid_key() {
        let encoded = BASE64.encode([1u8; 16]);
        let result = EncryptionKey::from_base64(&encoded);
        assert!(matches!(result, Err(CryptoError::InvalidKey { actual: 16 })));
    }

    #[test]
    fn missing_env_key_is_reported() {
        let result = EncryptionKey::from_env("DV_CRYPTO_TEST_KEY_THAT_IS_NEVER_SET");
        assert!(matches!(result, Err(CryptoError::MissingKey(_))));
    }

    #[test]
    fn key_debug_is_redacted() {
        let key = EncryptionKey::from_bytes(&[0xAB; KEY_LENGTH]);
        let rendered = format!("{key:?}");
        assert_eq!(rendered, "EncryptionKey([REDACTED])");
    }
}
