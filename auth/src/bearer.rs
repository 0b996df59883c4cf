//! Bearer header gate.
//!
//! Framework-independent half of the request authentication middleware.
//! Each request walks the same checks in order and ends either in
//! [`AuthOutcome::Continue`] or in a single [`AuthRejection`]:
//!
//! 1. header present and non-empty, else `MissingAuthHeader`
//! 2. exactly `Bearer <token>` split on one space, else `MalformedAuthHeader`
//! 3. non-empty token, else `EmptyToken`
//! 4. token validates, else `InvalidToken`

use thiserror::Error;

use crate::identity::AuthContext;
use crate::jwt::JwtError;
use crate::jwt::TokenValidator;

/// Authentication scheme accepted in the `Authorization` header.
pub const BEARER_SCHEME: &str = "Bearer";

/// Reason a request was refused at the gate.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthRejection {
    #[error("Authorization header is missing")]
    MissingAuthHeader,

    #[error("Authorization header is not of the form 'Bearer <token>'")]
    MalformedAuthHeader,

    #[error("Bearer token is empty")]
    EmptyToken,

    #[error("Bearer token rejected: {0}")]
    InvalidToken(JwtError),
}

impl AuthRejection {
    /// Stable tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthRejection::MissingAuthHeader => "missing_auth_header",
            AuthRejection::MalformedAuthHeader => "malformed_auth_header",
            AuthRejection::EmptyToken => "empty_token",
            AuthRejection::InvalidToken(e) => e.kind(),
        }
    }

    /// Message safe to return to the caller.
    ///
    /// Token failures share one message regardless of cause.
    pub fn client_message(&self) -> &'static str {
        match self {
            AuthRejection::MissingAuthHeader => "Authorization header required",
            AuthRejection::MalformedAuthHeader => {
                "Invalid authorization header format. Expected: Bearer <token>"
            }
            AuthRejection::EmptyToken | AuthRejection::InvalidToken(_) => {
                "Invalid or expired token"
            }
        }
    }
}

/// Result of running a request through the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Continue(AuthContext),
    Reject(AuthRejection),
}

/// Pull the token out of an `Authorization` header value.
///
/// # Errors
/// * `MissingAuthHeader` - No header, or an empty one
/// * `MalformedAuthHeader` - Not exactly two space-separated parts starting with `Bearer`
/// * `EmptyToken` - `Bearer ` followed by nothing
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthRejection> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthRejection::MissingAuthHeader),
    };

    let mut parts = header.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(AuthRejection::MalformedAuthHeader);
    };

    if scheme != BEARER_SCHEME {
        return Err(AuthRejection::MalformedAuthHeader);
    }

    if token.is_empty() {
        return Err(AuthRejection::EmptyToken);
    }

    Ok(token)
}

/// Run the full gate: header parsing, then token validation.
pub fn authorize(header: Option<&str>, validator: &TokenValidator) -> AuthOutcome {
    let token = match extract_bearer_token(header) {
        Ok(token) => token,
        Err(rejection) => return AuthOutcome::Reject(rejection),
    };

    match validator.validate(token) {
        Ok(identity) => AuthOutcome::Continue(AuthContext::new(identity)),
        Err(e) => AuthOutcome::Reject(AuthRejection::InvalidToken(e)),
    }
}
