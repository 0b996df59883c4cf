use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),

    #[error("Token signature does not match")]
    SignatureMismatch,

    #[error("Unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("Token is expired")]
    TokenExpired,
}

impl JwtError {
    /// Stable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            JwtError::SigningFailed(_) => "signing_failed",
            JwtError::MalformedToken(_) => "malformed_token",
            JwtError::SignatureMismatch => "signature_mismatch",
            JwtError::UnsupportedAlgorithm(_) => "unsupported_algorithm",
            JwtError::TokenExpired => "token_expired",
        }
    }
}
