//! Error types for Bounty core primitives.

use thiserror::Error;

/// Errors from the pure primitives: key handling, signature
/// verification, and canonical encoding.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("invalid public key")]
    InvalidPublicKey,

    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("decoding error: {0}")]
    Decoding(String),

    #[error("arithmetic overflow")]
    Overflow,
}
