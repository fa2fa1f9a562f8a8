use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AdminIdentity;
use crate::database::models::Document;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteDocumentResponse {
    pub message: String,
    pub document_id: Uuid,
}

/// Handler for DELETE /admin/documents/:id: remove one document unconditionally. Only
/// the admin flag is checked, not ownership.
pub async fn handler(
    State(state): State<ServiceState>,
    AdminIdentity(admin): AdminIdentity,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, DeleteDocumentError> {
    let deleted = Document::delete(document_id, state.database()).await?;
    if !deleted {
        return Err(DeleteDocumentError::NotFound);
    }

    tracing::info!(%document_id, admin = %admin.id, "document deleted by admin");

    Ok((
        http::StatusCode::OK,
        Json(DeleteDocumentResponse {
            message: "Document deleted successfully".into(),
            document_id,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum DeleteDocumentError {
    #[error("Document not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for DeleteDocumentError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DeleteDocumentError::NotFound => (http::StatusCode::NOT_FOUND, self.to_string()),
            DeleteDocumentError::Database(e) => {
                tracing::error!("database error deleting document: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}
