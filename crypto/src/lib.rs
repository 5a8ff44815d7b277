//! Chit Cryptographic Primitives
//!
//! Provides Ed25519 signing and verification of transactions, plus the
//! digest helpers used to derive signable bytes.

pub mod hash;
pub mod signing;

pub use hash::{sha256, sha256_hex};
pub use signing::{SigningKey, VerifyingKey};

/// Errors from cryptographic operations.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
