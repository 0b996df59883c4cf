use auth::AuthOutcome;
use auth::AuthRejection;
use auth::Identity;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::user::models::UserId;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Identity of the caller, stored in request extensions by [`authenticate`].
///
/// Also an extractor: handlers behind the middleware take it as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

impl TryFrom<Identity> for AuthenticatedUser {
    type Error = ApiError;

    fn try_from(identity: Identity) -> Result<Self, Self::Error> {
        let user_id = UserId::from_string(&identity.subject_id).map_err(|e| {
            tracing::warn!(error = %e, "Token subject is not a user ID");
            ApiError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(Self {
            user_id,
            username: identity.username,
            email: identity.email,
        })
    }
}

/// Middleware that validates bearer tokens and adds the caller to request extensions
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let outcome = match req.headers().get(header::AUTHORIZATION) {
        None => state.authenticator.authorize(None),
        Some(value) => match value.to_str() {
            Ok(value) => state.authenticator.authorize(Some(value)),
            Err(_) => AuthOutcome::Reject(AuthRejection::MalformedAuthHeader),
        },
    };

    match outcome {
        AuthOutcome::Continue(context) => {
            let user = AuthenticatedUser::try_from(context.into_identity())?;
            tracing::debug!(user_id = %user.user_id, "Request authenticated");

            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        AuthOutcome::Reject(rejection) => {
            tracing::warn!(
                rejection = rejection.kind(),
                method = %req.method(),
                uri = %req.uri(),
                "Request rejected by auth middleware"
            );
            Err(ApiError::Unauthorized(
                rejection.client_message().to_string(),
            ))
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                // Route is missing the auth middleware
                tracing::error!(uri = %parts.uri, "No authenticated user on request");
                ApiError::internal()
            })
    }
}
