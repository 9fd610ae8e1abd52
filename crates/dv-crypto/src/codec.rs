//! Record codec: serialize, then seal.
//!
//! Records are encoded as JSON before encryption. `serde_json::Map` keeps
//! keys sorted, so the plaintext of a given record is canonical.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CryptoError;
use crate::encryption::{EncryptedBlob, EncryptionKey, open, seal};

/// Serializes and encrypts a record.
///
/// # Errors
///
/// - [`CryptoError::Encode`] if the record cannot be serialized
/// - [`CryptoError::Random`] if no nonce could be drawn
pub fn encrypt_record<T: Serialize + ?Sized>(
    key: &EncryptionKey,
    record: &T,
) -> Result<EncryptedBlob, CryptoError> {
    let plaintext = serde_json::to_vec(record).map_err(CryptoError::Encode)?;
    seal(key, &plaintext)
}

/// Verifies, decrypts and deserializes a record.
///
/// # Errors
///
/// - [`CryptoError::Integrity`] for a wrong key or a modified blob
/// - [`CryptoError::Decode`] if the plaintext is not the expected shape
pub fn decrypt_record<T: DeserializeOwned>(
    key: &EncryptionKey,
    blob: &EncryptedBlob,
) -> Result<T, CryptoError> {
    let plaintext = open(key, blob)?;
    serde_json::from_slice(&plaintext).map_err(CryptoError::Decode)
}

/// [`encrypt_record`] with untyped key bytes.
///
/// # Errors
///
/// Returns [`CryptoError::InvalidKey`] unless `key` is exactly 32 bytes.
pub fn encrypt_record_with<T: Serialize + ?Sized>(
    key: &[u8],
    record: &T,
) -> Result<EncryptedBlob, CryptoError> {
    let key = EncryptionKey::try_from_slice(key)?;
    encrypt_record(&key, record)
}

/// [`decrypt_record`] with untyped key and blob bytes.
///
/// # Errors
///
/// - [`CryptoError::InvalidKey`] unless `key` is exactly 32 bytes
/// - [`CryptoError::Format`] if `blob` is shorter than a nonce and tag
pub fn decrypt_record_with<T: DeserializeOwned>(
    key: &[u8],
    blob: &[u8],
) -> Result<T, CryptoError> {
    let key = EncryptionKey::try_from_slice(key)?;
    let blob = EncryptedBlob::from_bytes(blob.to_vec())?;
    decrypt_record(&key, &blob)
}
