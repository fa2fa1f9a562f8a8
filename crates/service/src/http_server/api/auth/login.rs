use axum::extract::State;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::{password, TokenError};
use crate::database::models::User;
use crate::http_server::api::client::ApiRequest;
use crate::http_server::extract::Json;
use crate::ServiceState;

use super::{normalize_email, AuthResponse};

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct LoginRequest {
    /// Email address of the account
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, LoginError> {
    let email = normalize_email(&req.email);

    // Same rejection for unknown email and bad password, so the endpoint
    // doesn't confirm which emails are registered.
    let user = User::find_by_email(&email, state.database())
        .await?
        .ok_or(LoginError::InvalidCredentials)?;

    if !password::verify(&req.password, &user.password_hash)? {
        return Err(LoginError::InvalidCredentials);
    }

    let token = state.tokens().issue(*user.id)?;
    tracing::debug!(user_id = %user.id, "user logged in");

    Ok((
        http::StatusCode::OK,
        Json(AuthResponse {
            id: *user.id,
            email: user.email,
            username: user.username,
            is_admin: user.is_admin,
            token,
        }),
    )
        .into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("failed to verify password: {0}")]
    PasswordVerify(#[from] bcrypt::BcryptError),
    #[error("failed to issue token: {0}")]
    Token(#[from] TokenError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for LoginError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            LoginError::InvalidCredentials => (http::StatusCode::UNAUTHORIZED, self.to_string()),
            LoginError::PasswordVerify(e) => {
                tracing::error!("password verification failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            LoginError::Token(e) => {
                tracing::error!("token issuance failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            LoginError::Database(e) => {
                tracing::error!("database error during login: {}", e);
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
impl ApiRequest for LoginRequest {
    type Response = AuthResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/auth/login").unwrap();
        client.post(full_url).json(&self)
    }
}
