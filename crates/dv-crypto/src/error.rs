//! Codec error types.

/// Errors returned by the record codec.
///
/// `InvalidKey` is a configuration error and should stop the process.
/// `Format`, `Integrity` and `Decode` are per-blob and never fatal.
#[derive(thiserror::Error, Debug)]
pub enum CryptoError {
    /// Key material is not exactly 256 bits.
    #[error("invalid key length: expected 32 bytes, got {actual}")]
    InvalidKey { actual: usize },

    /// Key material could not be decoded from its text form.
    #[error("invalid key encoding: {0}")]
    InvalidKeyEncoding(String),

    /// The configured key variable is not set.
    #[error("encryption key variable `{0}` is not set")]
    MissingKey(String),

    /// The blob is too short or not valid encoded bytes.
    #[error("malformed blob: {0}")]
    Format(String),

    /// Authentication tag check failed: wrong key or tampered blob.
    #[error("integrity check failed")]
    Integrity,

    /// Decrypted bytes are not a valid record encoding.
    #[error("decrypted payload is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),

    /// The record could not be serialized before encryption.
    #[error("record could not be encoded: {0}")]
    Encode(#[source] serde_json::Error),

    /// The cipher refused the input (plaintext over the AES-GCM limit).
    #[error("encryption failed")]
    Encryption,

    /// The OS random source failed.
    #[error("random source unavailable: {0}")]
    Random(String),
}

impl CryptoError {
    /// Whether the error is a property of the key rather than of one blob.
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            CryptoError::InvalidKey { .. }
                | CryptoError::InvalidKeyEncoding(_)
                | CryptoError::MissingKey(_)
        )
    }
}
