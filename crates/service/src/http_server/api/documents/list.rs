use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::database::models::Document;
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

use super::{load_views, DocumentView};

/// Handler for GET /documents: every document across all users (the shared view),
/// newest first, annotated relative to the caller.
pub async fn handler(
    State(state): State<ServiceState>,
    Identity(user): Identity,
) -> Result<impl IntoResponse, ListError> {
    let docs = Document::list_all(state.database()).await?;
    let views = load_views(&docs, *user.id, state.database()).await?;

    Ok((http::StatusCode::OK, Json(views)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        let ListError::Database(e) = &self;
        tracing::error!("database error listing documents: {}", e);
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Internal server error" })),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct ListRequest;

// Client implementation - builds request for this operation
impl ApiRequest for ListRequest {
    type Response = Vec<DocumentView>;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/documents").unwrap();
        client.get(full_url)
    }
}
