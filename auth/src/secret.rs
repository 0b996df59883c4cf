use std::fmt;

use secrecy::ExposeSecret;
use secrecy::SecretString;
use thiserror::Error;

/// Error type for signing secret construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Signing secret is missing or empty")]
    Empty,
}

/// Process-wide HMAC signing key.
///
/// Built once at startup and handed by reference to the token issuer and
/// validator. An empty key cannot be represented, so signing never fails
/// for lack of a secret after construction.
pub struct SigningSecret(SecretString);

impl SigningSecret {
    /// Keys shorter than this are accepted but weak for HS256.
    pub const RECOMMENDED_MIN_BYTES: usize = 32;

    /// Create a signing secret from a plain string.
    ///
    /// # Errors
    /// * `Empty` - Secret is empty or whitespace only
    pub fn new(secret: impl Into<String>) -> Result<Self, SecretError> {
        Self::from_secret(SecretString::new(secret.into()))
    }

    /// Create a signing secret from an already wrapped secret string.
    ///
    /// # Errors
    /// * `Empty` - Secret is empty or whitespace only
    pub fn from_secret(secret: SecretString) -> Result<Self, SecretError> {
        if secret.expose_secret().trim().is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self(secret))
    }

    /// Whether the key is below the recommended HS256 key length.
    pub fn is_short(&self) -> bool {
        self.0.expose_secret().len() < Self::RECOMMENDED_MIN_BYTES
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}
