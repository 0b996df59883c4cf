use chrono::Duration;

use crate::bearer;
use crate::bearer::AuthOutcome;
use crate::identity::Identity;
use crate::jwt::JwtError;
use crate::jwt::TokenIssuer;
use crate::jwt::TokenValidator;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::secret::SigningSecret;

/// Token type reported to clients alongside the access token.
pub const TOKEN_TYPE: &str = "Bearer";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing, token issuing and token validation. Holds no
/// per-request state; share it behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_issuer: TokenIssuer,
    token_validator: TokenValidator,
    token_ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,

    /// Always [`TOKEN_TYPE`]
    pub token_type: &'static str,

    /// Seconds until the token expires
    pub expires_in: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Process signing secret
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Configured Authenticator instance using default hashing cost
    pub fn new(secret: &SigningSecret, token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_issuer: TokenIssuer::new(secret),
            token_validator: TokenValidator::new(secret),
            token_ttl,
        }
    }

    /// Replace the password hasher (e.g. to tune the work factor).
    pub fn with_password_hasher(mut self, password_hasher: PasswordHasher) -> Self {
        self.password_hasher = password_hasher;
        self
    }

    /// Exercise hashing and token round-trip once.
    ///
    /// Meant to run at startup, before the service accepts traffic, so
    /// entropy or key problems stop the process instead of failing
    /// individual requests.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing or verification is broken
    /// * `JwtError` - Token signing or validation is broken
    /// * `InvalidCredentials` - A fresh hash failed to verify
    pub fn self_check(&self) -> Result<(), AuthenticationError> {
        let probe = "startup-self-check";
        let hash = self.password_hasher.hash(probe)?;
        if !self.password_hasher.verify(probe, &hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let identity = Identity::new("self-check", "self-check", "self-check@localhost");
        let token = self.token_issuer.issue(&identity, self.token_ttl)?;
        let decoded = self.token_validator.validate(&token)?;
        if decoded != identity {
            return Err(AuthenticationError::JwtError(JwtError::MalformedToken(
                "Self-check identity mismatch".to_string(),
            )));
        }

        Ok(())
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Reject a login for which no stored hash exists.
    ///
    /// Runs one hashing pass at the configured cost before answering, so
    /// an unknown identifier costs the same as a wrong password.
    ///
    /// # Returns
    /// `InvalidCredentials`, or `PasswordError` if hashing itself failed
    pub fn reject_unknown_user(&self, password: &str) -> AuthenticationError {
        match self.password_hasher.hash(password) {
            Ok(_) => AuthenticationError::InvalidCredentials,
            Err(e) => AuthenticationError::PasswordError(e),
        }
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Principal the token is issued for
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is corrupt
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: &Identity,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(identity)?)
    }

    /// Generate a token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, identity: &Identity) -> Result<AuthenticationResult, JwtError> {
        let access_token = self.token_issuer.issue(identity, self.token_ttl)?;

        Ok(AuthenticationResult {
            access_token,
            token_type: TOKEN_TYPE,
            expires_in: self.token_ttl.num_seconds(),
        })
    }

    /// Validate a token and return the identity it carries.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Identity, JwtError> {
        self.token_validator.validate(token)
    }

    /// Run an `Authorization` header value through the bearer gate.
    pub fn authorize(&self, authorization_header: Option<&str>) -> AuthOutcome {
        bearer::authorize(authorization_header, &self.token_validator)
    }
}
