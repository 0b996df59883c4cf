use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;
use crate::identity::Identity;

/// Value of the `iss` claim on every token this crate issues.
pub const TOKEN_ISSUER: &str = "user-service";

/// JWT claims structure.
///
/// Fixed shape: every field is required and unknown fields are rejected,
/// so a token either decodes into exactly this payload or not at all.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Claims {
    /// Subject identifier
    pub user_id: String,

    pub username: String,

    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Subject, always equal to `user_id`
    pub sub: String,
}

impl Claims {
    /// Create claims for an identity.
    ///
    /// # Arguments
    /// * `identity` - Principal to embed
    /// * `issued_at` - Issue instant
    /// * `ttl` - Lifetime; `exp = issued_at + ttl`
    ///
    /// # Errors
    /// * `SigningFailed` - `ttl` is not positive or `exp` is out of range
    pub fn for_identity(
        identity: &Identity,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        if ttl <= Duration::zero() {
            return Err(JwtError::SigningFailed(
                "Token lifetime must be positive".to_string(),
            ));
        }

        let expiration = issued_at
            .checked_add_signed(ttl)
            .ok_or_else(|| JwtError::SigningFailed("Token lifetime is out of range".to_string()))?;

        Ok(Self {
            user_id: identity.subject_id.clone(),
            username: identity.username.clone(),
            email: identity.email.clone(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
            iss: TOKEN_ISSUER.to_string(),
            sub: identity.subject_id.clone(),
        })
    }

    pub fn into_identity(self) -> Identity {
        Identity {
            subject_id: self.user_id,
            username: self.username,
            email: self.email,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn alice() -> Identity {
        Identity::new("42", "alice", "alice@example.com")
    }

    #[test]
    fn test_for_identity() {
        let issued_at = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let claims = Claims::for_identity(&alice(), issued_at, Duration::hours(24)).unwrap();

        assert_eq!(claims.user_id, "42");
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60); // 24 hours
    }

    #[test]
    fn test_into_identity() {
        let claims = Claims::for_identity(&alice(), Utc::now(), Duration::minutes(5)).unwrap();
        assert_eq!(claims.into_identity(), alice());
    }

    #[test]
    fn test_non_positive_lifetime_rejected() {
        for ttl in [Duration::zero(), Duration::seconds(-5)] {
            let result = Claims::for_identity(&alice(), Utc::now(), ttl);
            assert!(matches!(result, Err(JwtError::SigningFailed(_))));
        }
    }

    #[test]
    fn test_lifetime_past_calendar_range_rejected() {
        // Representable as a Duration, but now + ttl is past year 262143
        let ttl = Duration::try_seconds(1_000_000_000_000_000).unwrap();
        let result = Claims::for_identity(&alice(), Utc::now(), ttl);
        assert!(matches!(result, Err(JwtError::SigningFailed(_))));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let payload = serde_json::json!({
            "user_id": "42",
            "username": "alice",
            "email": "alice@example.com",
            "iat": 0,
            "exp": 10,
            "iss": TOKEN_ISSUER,
            "sub": "42",
            "role": "admin"
        });

        assert!(serde_json::from_value::<Claims>(payload).is_err());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let payload = serde_json::json!({
            "user_id": "42",
            "username": "alice",
            "iat": 0,
            "exp": 10,
            "iss": TOKEN_ISSUER,
            "sub": "42"
        });

        assert!(serde_json::from_value::<Claims>(payload).is_err());
    }
}
