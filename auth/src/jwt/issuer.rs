use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;

use super::claims::Claims;
use super::errors::JwtError;
use super::SIGNING_ALGORITHM;
use crate::identity::Identity;
use crate::secret::SigningSecret;

/// Signs session tokens for authenticated identities.
///
/// Uses HS256 (HMAC with SHA-256) with the process signing secret.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    /// Create a new issuer from the process signing secret.
    pub fn new(secret: &SigningSecret) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Issue a token for `identity` valid for `ttl` from now.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed or `ttl` is unusable
    pub fn issue(&self, identity: &Identity, ttl: Duration) -> Result<String, JwtError> {
        self.issue_at(identity, Utc::now(), ttl)
    }

    /// Issue a token with an explicit issue instant.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed or `ttl` is unusable
    pub fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.sign(&Claims::for_identity(identity, issued_at, ttl)?)
    }

    /// Encode claims into a JWT token.
    ///
    /// # Errors
    /// * `SigningFailed` - Token encoding failed
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(SIGNING_ALGORITHM);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::SigningFailed(e.to_string()))
    }
}
