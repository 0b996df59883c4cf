//! Authentication library
//!
//! Token-based authentication core shared by the HTTP services:
//! - Password hashing (Argon2id)
//! - Signed session tokens (HS256 JWT): issuing and validation
//! - Bearer header gate producing a request-scoped [`AuthContext`]
//! - Authentication coordination
//!
//! The gate is framework-independent; services wrap
//! [`Authenticator::authorize`] in their own middleware and decide how an
//! [`AuthRejection`] is rendered.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{AuthOutcome, Authenticator, Identity, SigningSecret};
//! use chrono::Duration;
//!
//! let secret = SigningSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(&secret, Duration::hours(1));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let identity = Identity::new("user123", "alice", "alice@example.com");
//! let result = auth.authenticate("password123", &hash, &identity).unwrap();
//!
//! // Protected request: run the Authorization header through the gate
//! let header = format!("Bearer {}", result.access_token);
//! match auth.authorize(Some(&header)) {
//!     AuthOutcome::Continue(context) => assert_eq!(context.subject_id(), "user123"),
//!     AuthOutcome::Reject(rejection) => panic!("{}", rejection),
//! }
//! ```

pub mod authenticator;
pub mod bearer;
pub mod identity;
pub mod jwt;
pub mod password;
pub mod secret;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use bearer::AuthOutcome;
pub use bearer::AuthRejection;
pub use identity::AuthContext;
pub use identity::Identity;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secret::SecretError;
pub use secret::SigningSecret;
