use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::database::models::Document;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

use super::{load_views, DocumentView};

/// Handler for GET /documents/my: the caller's own documents, newest first.
pub async fn handler(
    State(state): State<ServiceState>,
    Identity(user): Identity,
) -> Result<impl IntoResponse, ListMineError> {
    let docs = Document::list_by_owner(*user.id, state.database()).await?;
    let views = load_views(&docs, *user.id, state.database()).await?;

    Ok((http::StatusCode::OK, Json(views)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListMineError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ListMineError {
    fn into_response(self) -> Response {
        let ListMineError::Database(e) = &self;
        tracing::error!("database error listing caller's documents: {}", e);
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Internal server error" })),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListMineRequest;

// Client implementation - builds request for this operation
impl ApiRequest for ListMineRequest {
    type Response = Vec<DocumentView>;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/documents/my").unwrap();
        client.get(full_url)
    }
}
