//! Audit fingerprint of a stored blob.
//!
//! ```text
//! data_hash = hex(SHA-256(base64(blob)))
//! ```
//!
//! The fingerprint is computed over the base64 text form so it matches what
//! an operator sees when exporting a row. It is never used as a lookup key.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use sha2::{Digest, Sha256};

use crate::encryption::EncryptedBlob;

/// Length of the hex-encoded fingerprint (SHA-256 → 64 hex chars).
pub const DATA_HASH_HEX_LENGTH: usize = 64;

/// Fingerprints raw blob bytes.
pub fn data_hash(blob: &[u8]) -> String {
    let encoded = BASE64.encode(blob);
    let digest = Sha256::digest(encoded.as_bytes());
    let hash = hex::encode(digest);

    debug_assert_eq!(hash.len(), DATA_HASH_HEX_LENGTH);
    hash
}

/// Fingerprints a sealed blob.
pub fn blob_hash(blob: &EncryptedBlob) -> String {
    data_hash(blob.as_bytes())
}
