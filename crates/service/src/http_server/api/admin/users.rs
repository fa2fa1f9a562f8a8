use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::AdminIdentity;
use crate::database::models::User;
use crate::ServiceState;

/// A user row as the admin dashboard sees it: public profile plus usage
/// aggregates, never the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUsageView {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub document_count: i64,
    pub storage: i64,
}

/// Handler for GET /admin/users: all users with document count and storage total,
/// newest registration first.
pub async fn handler(
    State(state): State<ServiceState>,
    AdminIdentity(_admin): AdminIdentity,
) -> Result<impl IntoResponse, UsersError> {
    let rows = User::list_with_usage(state.database()).await?;

    let views: Vec<UserUsageView> = rows
        .into_iter()
        .map(|row| UserUsageView {
            id: *row.user.id,
            email: row.user.email,
            username: row.user.username,
            is_admin: row.user.is_admin,
            created_at: row.user.created_at,
            document_count: row.document_count,
            storage: row.storage,
        })
        .collect();

    Ok((http::StatusCode::OK, Json(views)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum UsersError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for UsersError {
    fn into_response(self) -> Response {
        let UsersError::Database(e) = &self;
        tracing::error!("database error listing users: {}", e);
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Internal server error" })),
        )
            .into_response()
    }
}
