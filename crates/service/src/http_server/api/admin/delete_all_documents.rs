use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use crate::auth::AdminIdentity;
use crate::database::models::Document;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Handler for DELETE /admin/documents: irreversibly remove every document in the store.
/// Idempotent: a second call deletes zero rows and still succeeds.
pub async fn handler(
    State(state): State<ServiceState>,
    AdminIdentity(admin): AdminIdentity,
) -> Result<impl IntoResponse, DeleteAllError> {
    let deleted_count = Document::delete_all(state.database()).await?;

    tracing::info!(deleted_count, admin = %admin.id, "all documents deleted by admin");

    Ok((
        http::StatusCode::OK,
        Json(DeleteAllResponse {
            message: "All documents deleted successfully".into(),
            deleted_count,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteAllError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for DeleteAllError {
    fn into_response(self) -> Response {
        let DeleteAllError::Database(e) = &self;
        tracing::error!("database error deleting all documents: {}", e);
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Internal server error" })),
        )
            .into_response()
    }
}
