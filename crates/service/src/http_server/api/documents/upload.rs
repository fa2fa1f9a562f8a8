use axum::extract::State;
use axum::response::{IntoResponse, Response};
use base64::Engine as _;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::Identity;
use crate::database::models::Document;
use crate::http_server::api::client::ApiRequest;
use crate::http_server::extract::Json;
use crate::ServiceState;

use super::{load_view, DocumentView};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub title: String,
    pub file_type: String,
    /// Base64 data-URI string, e.g. `data:text/plain;base64,aGVsbG8=`
    pub file_data: String,
    /// Decoded byte length as reported by the client
    pub size: i64,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Identity(user): Identity,
    Json(req): Json<UploadRequest>,
) -> Result<impl IntoResponse, UploadError> {
    if req.title.trim().is_empty()
        || req.file_type.is_empty()
        || req.file_data.is_empty()
        || req.size <= 0
    {
        return Err(UploadError::MissingFields);
    }

    // The client-reported size is stored as-is, but a disagreement with the
    // actual payload is worth a trace since storage totals are built from it.
    match decoded_payload_len(&req.file_data) {
        Some(actual) if actual as i64 != req.size => {
            tracing::warn!(
                reported = req.size,
                actual,
                title = %req.title,
                "upload size disagrees with decoded payload length"
            );
        }
        None => {
            tracing::warn!(title = %req.title, "upload payload is not valid base64");
        }
        _ => {}
    }

    let doc = Document::create(
        req.title.trim(),
        &req.file_type,
        &req.file_data,
        req.size,
        *user.id,
        state.database(),
    )
    .await?;

    tracing::info!(document_id = %doc.id, owner = %user.id, size = doc.size, "document uploaded");

    let view = load_view(&doc, *user.id, state.database()).await?;
    Ok((http::StatusCode::CREATED, Json(view)).into_response())
}

/// Byte length of the Base64 payload, tolerating an optional data-URI prefix.
/// None if the payload does not decode.
fn decoded_payload_len(file_data: &str) -> Option<usize> {
    let encoded = match file_data.split_once("base64,") {
        Some((_, rest)) => rest,
        None => file_data,
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()
        .map(|bytes| bytes.len())
}

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Please provide all required fields")]
    MissingFields,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            UploadError::MissingFields => (http::StatusCode::BAD_REQUEST, self.to_string()),
            UploadError::Database(e) => {
                tracing::error!("database error during upload: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for UploadRequest {
    type Response = DocumentView;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/documents/upload").unwrap();
        client.post(full_url).json(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::decoded_payload_len;

    #[test]
    fn test_decoded_len_with_data_uri_prefix() {
        assert_eq!(
            decoded_payload_len("data:text/plain;base64,aGVsbG8="),
            Some(5)
        );
    }

    #[test]
    fn test_decoded_len_bare_base64() {
        assert_eq!(decoded_payload_len("aGVsbG8="), Some(5));
    }

    #[test]
    fn test_decoded_len_invalid() {
        assert_eq!(decoded_payload_len("data:text/plain;base64,???"), None);
    }
}
