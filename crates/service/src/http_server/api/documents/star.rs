use axum::extract::{Json, Path, State};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::auth::Identity;
use crate::database::models::Document;
use crate::ServiceState;

use super::load_view;

/// Handler for PUT /documents/:id/star: flip the caller's membership in the star set.
/// Deliberately no ownership check: any authenticated user may star or unstar
/// any document, their own included.
pub async fn handler(
    State(state): State<ServiceState>,
    Identity(user): Identity,
    Path(document_id): Path<Uuid>,
) -> Result<impl IntoResponse, StarError> {
    let doc = Document::get(document_id, state.database())
        .await?
        .ok_or(StarError::NotFound)?;

    let starred = doc.toggle_star(*user.id, state.database()).await?;
    tracing::debug!(document_id = %doc.id, user_id = %user.id, starred, "star toggled");

    let view = load_view(&doc, *user.id, state.database()).await?;
    Ok((http::StatusCode::OK, Json(view)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum StarError {
    #[error("Document not found")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for StarError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            StarError::NotFound => (http::StatusCode::NOT_FOUND, self.to_string()),
            StarError::Database(e) => {
                tracing::error!("database error toggling star: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}
