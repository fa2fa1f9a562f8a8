use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::AdminIdentity;
use crate::database::models::{Document, User};
use crate::http_server::api::client::ApiRequest;
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub total_users: i64,
    pub total_documents: i64,
    pub total_storage: i64,
}

/// Handler for GET /admin/stats: whole-system usage counters, computed by full scans.
pub async fn handler(
    State(state): State<ServiceState>,
    AdminIdentity(_admin): AdminIdentity,
) -> Result<impl IntoResponse, StatsError> {
    let db = state.database();

    let total_users = User::count(db).await?;
    let total_documents = Document::count(db).await?;
    let total_storage = Document::total_storage(db).await?;

    Ok((
        http::StatusCode::OK,
        Json(StatsResponse {
            total_users,
            total_documents,
            total_storage,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for StatsError {
    fn into_response(self) -> Response {
        let StatsError::Database(e) = &self;
        tracing::error!("database error computing stats: {}", e);
        (
            http::StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "message": "Internal server error" })),
        )
            .into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct StatsRequest;

// Client implementation - builds request for this operation
impl ApiRequest for StatsRequest {
    type Response = StatsResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/admin/stats").unwrap();
        client.get(full_url)
    }
}
