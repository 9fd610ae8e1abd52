//! Runtime error types.

use dv_crypto::CryptoError;
use dv_store::StoreError;

/// Errors that can occur during runtime operations.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// Envelope or record payload could not be parsed.
    #[error(transparent)]
    Envelope(#[from] dv_types::TypeError),

    /// Error from the codec (key, format, integrity, decode).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Error from the record store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Error from the durable log.
    #[error(transparent)]
    Log(#[from] dv_log::LogError),

    /// Error from the kernel (invalid transition).
    #[error(transparent)]
    Kernel(#[from] dv_kernel::KernelError),

    /// Error from the anonymizer configuration.
    #[error(transparent)]
    Transform(#[from] dv_transform::TransformError),

    /// Configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl RuntimeError {
    /// Whether the same message may succeed if delivered again later.
    ///
    /// Transient store and log faults are retryable. Anything wrong with the
    /// message itself (envelope, format, integrity, decode) is poison.
    pub fn is_retryable(&self) -> bool {
        match self {
            RuntimeError::Store(e) => e.is_transient(),
            RuntimeError::Log(e) => e.is_transient(),
            RuntimeError::Crypto(CryptoError::Random(_)) => true,
            RuntimeError::Envelope(_)
            | RuntimeError::Crypto(_)
            | RuntimeError::Kernel(_)
            | RuntimeError::Transform(_)
            | RuntimeError::Config(_) => false,
        }
    }

    /// Whether the process cannot continue, e.g. the key is misconfigured.
    pub fn is_fatal(&self) -> bool {
        match self {
            RuntimeError::Crypto(e) => e.is_key_error(),
            RuntimeError::Config(_) | RuntimeError::Transform(_) => true,
            _ => false,
        }
    }
}
