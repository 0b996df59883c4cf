use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::UserData;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::UserPage;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// Query string for `GET /api/users`.
///
/// Values are kept as text so a non-numeric `page` or `limit` falls back
/// to the default instead of failing extraction.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersParams {
    page: Option<String>,
    limit: Option<String>,
}

impl ListUsersParams {
    fn page_request(&self) -> PageRequest {
        PageRequest::new(number(&self.page), number(&self.limit))
    }
}

fn number(value: &Option<String>) -> Option<i64> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> Result<ApiSuccess<ListUsersResponseData>, ApiError> {
    state
        .user_service
        .list_users(params.page_request())
        .await
        .map_err(ApiError::from)
        .map(|ref page| ApiSuccess::new(StatusCode::OK, page.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListUsersResponseData {
    pub users: Vec<UserData>,
    pub pagination: PaginationData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationData {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
    pub offset: u64,
}

impl From<&UserPage> for ListUsersResponseData {
    fn from(page: &UserPage) -> Self {
        Self {
            users: page.users.iter().map(UserData::from).collect(),
            pagination: PaginationData {
                page: page.request.page(),
                limit: page.request.limit(),
                total: page.total,
                total_pages: page.total_pages(),
                offset: page.request.offset(),
            },
        }
    }
}
