use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Echo the identity carried by the caller's token.
///
/// Answers from the token alone; the credential store is not consulted.
pub async fn current_user(user: AuthenticatedUser) -> ApiSuccess<CurrentUserResponseData> {
    ApiSuccess::new(StatusCode::OK, user.into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUserResponseData {
    pub id: String,
    pub username: String,
    pub email: String,
}

impl From<AuthenticatedUser> for CurrentUserResponseData {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            id: user.user_id.to_string(),
            username: user.username,
            email: user.email,
        }
    }
}
