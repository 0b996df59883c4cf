use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::LoginIdentifier;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Exchange a username or email plus password for an access token.
///
/// Every credential failure, including an unreachable store, answers the
/// same 401. Logs keep the causes apart.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequestBody>,
) -> Result<ApiSuccess<LoginResponseData>, ApiError> {
    let identifier = match body.identifier() {
        Some(identifier) if !body.password.is_empty() => identifier.to_string(),
        _ => {
            return Err(ApiError::BadRequest(
                "Username or email and password are required".to_string(),
            ))
        }
    };
    let password = body.password;

    let identifier = match LoginIdentifier::parse(identifier) {
        Ok(identifier) => identifier,
        Err(e) => {
            tracing::info!(reason = "invalid_identifier", error = %e, "Login failed");
            return Err(reject_unknown_user(&state.authenticator, password).await);
        }
    };

    let user = match state.user_service.get_user_by_identifier(&identifier).await {
        Ok(user) => user,
        Err(UserError::NotFoundByUsername(_) | UserError::NotFoundByEmail(_)) => {
            tracing::info!(reason = "unknown_user", "Login failed");
            return Err(reject_unknown_user(&state.authenticator, password).await);
        }
        Err(other) => {
            tracing::error!(
                reason = "store_failure",
                store_unavailable = true,
                error = %other,
                "Login failed"
            );
            return Err(ApiError::invalid_credentials());
        }
    };

    let authenticator = state.authenticator.clone();
    let stored_hash = user.password_hash.clone();
    let identity = user.identity();

    // Argon2 verification is CPU bound
    let result = tokio::task::spawn_blocking(move || {
        authenticator.authenticate(&password, &stored_hash, &identity)
    })
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Password verification task failed");
        ApiError::internal()
    })?
    .map_err(|e| match e {
        AuthenticationError::InvalidCredentials => {
            tracing::info!(user_id = %user.id, reason = "wrong_password", "Login failed");
            ApiError::invalid_credentials()
        }
        AuthenticationError::PasswordError(err) => {
            tracing::error!(
                user_id = %user.id,
                reason = "corrupt_hash",
                error = %err,
                "Login failed"
            );
            ApiError::invalid_credentials()
        }
        AuthenticationError::JwtError(err) => {
            tracing::error!(user_id = %user.id, error = %err, "Token generation failed");
            ApiError::internal()
        }
    })?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(ApiSuccess::new(
        StatusCode::OK,
        LoginResponseData {
            access_token: result.access_token,
            token_type: result.token_type.to_string(),
            expires_in: result.expires_in,
            user: (&user).into(),
        },
    ))
}

/// Answer for a login with no matching account, after the same Argon2
/// work a wrong password costs.
async fn reject_unknown_user(authenticator: &Arc<Authenticator>, password: String) -> ApiError {
    let authenticator = Arc::clone(authenticator);

    match tokio::task::spawn_blocking(move || authenticator.reject_unknown_user(&password)).await {
        Ok(AuthenticationError::InvalidCredentials) => {}
        Ok(other) => tracing::error!(error = %other, "Password hashing failed"),
        Err(e) => tracing::error!(error = %e, "Password hashing task failed"),
    }

    ApiError::invalid_credentials()
}

/// Login body.
///
/// The identifier may be sent as `username`, `email` or `identifier`;
/// when several are present the first non-blank one in that order wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    identifier: Option<String>,
    #[serde(default)]
    password: String,
}

impl LoginRequestBody {
    fn identifier(&self) -> Option<&str> {
        [&self.username, &self.email, &self.identifier]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .find(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginResponseData {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: UserData,
}
