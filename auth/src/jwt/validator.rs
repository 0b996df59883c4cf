use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use jsonwebtoken::decode;
use jsonwebtoken::errors::Error as JsonWebTokenError;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::Claims;
use super::claims::TOKEN_ISSUER;
use super::errors::JwtError;
use super::SIGNING_ALGORITHM;
use super::SIGNING_ALGORITHM_NAME;
use crate::identity::Identity;
use crate::secret::SigningSecret;

/// Verifies tokens produced by [`TokenIssuer`](super::TokenIssuer).
///
/// Accepts HS256 only, with zero clock leeway. Holds no per-request state,
/// so one instance is shared by every request.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

/// Only the field needed to classify the algorithm before verification.
#[derive(Deserialize)]
struct RawHeader {
    alg: String,
}

impl TokenValidator {
    /// Create a new validator from the process signing secret.
    pub fn new(secret: &SigningSecret) -> Self {
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.set_issuer(&[TOKEN_ISSUER]);

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Validate a token and return the identity it carries.
    ///
    /// # Errors
    /// * `MalformedToken` - Not a three-segment JWT, or claims do not decode
    /// * `UnsupportedAlgorithm` - Header advertises anything but HS256
    /// * `SignatureMismatch` - Signature does not verify under the secret
    /// * `TokenExpired` - Current time is past `exp`
    pub fn validate(&self, token: &str) -> Result<Identity, JwtError> {
        self.decode(token).map(Claims::into_identity)
    }

    /// Decode and validate a JWT token, returning the full claims.
    ///
    /// Same checks and errors as [`validate`](Self::validate).
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        let header = inspect_header(token)?;
        if header.alg != SIGNING_ALGORITHM_NAME {
            return Err(JwtError::UnsupportedAlgorithm(header.alg));
        }

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(classify)?;
        let claims = token_data.claims;

        if claims.sub != claims.user_id {
            return Err(JwtError::MalformedToken(
                "Subject does not match user_id claim".to_string(),
            ));
        }

        Ok(claims)
    }
}

fn inspect_header(token: &str) -> Result<RawHeader, JwtError> {
    let mut segments = token.split('.');
    let (Some(header), Some(_), Some(_), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(JwtError::MalformedToken(
            "Expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(header)
        .map_err(|e| JwtError::MalformedToken(format!("Header is not base64url: {}", e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| JwtError::MalformedToken(format!("Header is not valid JSON: {}", e)))
}

fn classify(error: JsonWebTokenError) -> JwtError {
    match error.kind() {
        ErrorKind::ExpiredSignature => JwtError::TokenExpired,
        ErrorKind::InvalidSignature => JwtError::SignatureMismatch,
        ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::MissingAlgorithm => JwtError::UnsupportedAlgorithm(error.to_string()),
        _ => JwtError::MalformedToken(error.to_string()),
    }
}
