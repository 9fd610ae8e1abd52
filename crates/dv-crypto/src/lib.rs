//! # dv-crypto: Record encryption for `DataVault`
//!
//! Anonymized records are sealed with AES-256-GCM before they reach storage,
//! and opened again only on retrieval.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`encryption`] | Keys, nonces, sealed blobs |
//! | [`codec`] | JSON record encode + seal, open + decode |
//! | [`fingerprint`] | Audit hash of a stored blob |
//!
//! ## Quick Start
//!
//! ```
//! use dv_crypto::{EncryptionKey, encrypt_record, decrypt_record, blob_hash};
//! use serde_json::{Value, json};
//!
//! let key = EncryptionKey::generate();
//! let record = json!({"first_name": "Aaron", "age": 31});
//!
//! let blob = encrypt_record(&key, &record).unwrap();
//! let hash = blob_hash(&blob);
//! assert_eq!(hash.len(), 64);
//!
//! let back: Value = decrypt_record(&key, &blob).unwrap();
//! assert_eq!(back, record);
//! ```

pub mod codec;
pub mod encryption;
pub mod error;
pub mod fingerprint;

pub use codec::{decrypt_record, decrypt_record_with, encrypt_record, encrypt_record_with};
pub use encryption::{
    DEFAULT_KEY_VAR, EncryptedBlob, EncryptionKey, KEY_LENGTH, MIN_BLOB_LENGTH, NONCE_LENGTH,
    TAG_LENGTH,
};
pub use error::CryptoError;
pub use fingerprint::{blob_hash, data_hash};
