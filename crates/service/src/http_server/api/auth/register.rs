use axum::extract::State;
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::auth::{password, TokenError};
use crate::database::models::User;
use crate::http_server::api::client::ApiRequest;
use crate::http_server::extract::Json;
use crate::ServiceState;

use super::{
    email_is_well_formed, normalize_email, username_from_email, AuthResponse, MIN_PASSWORD_LENGTH,
};

#[derive(Debug, Clone, Serialize, Deserialize, clap::Args)]
pub struct RegisterRequest {
    /// Email address to register with
    #[arg(long)]
    pub email: String,

    /// Password for the new account
    #[arg(long)]
    pub password: String,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, RegisterError> {
    let email = normalize_email(&req.email);

    if !email_is_well_formed(&email) {
        return Err(RegisterError::Validation(
            "Please provide a valid email address".into(),
        ));
    }
    if req.password.len() < MIN_PASSWORD_LENGTH {
        return Err(RegisterError::Validation(
            "Password must be at least 6 characters".into(),
        ));
    }

    if User::find_by_email(&email, state.database())
        .await?
        .is_some()
    {
        return Err(RegisterError::EmailTaken);
    }

    let password_hash = password::hash(&req.password)?;
    let username = username_from_email(&email);

    let user = User::create(&email, &username, &password_hash, false, state.database())
        .await
        .map_err(|e| {
            // Lost the race against a concurrent registration for this email.
            if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
                RegisterError::EmailTaken
            } else {
                RegisterError::Database(e)
            }
        })?;

    let token = state.tokens().issue(*user.id)?;
    tracing::info!(user_id = %user.id, "registered new user");

    Ok((
        http::StatusCode::CREATED,
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
pub enum RegisterError {
    #[error("{0}")]
    Validation(String),
    #[error("User already exists with this email")]
    EmailTaken,
    #[error("failed to hash password: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),
    #[error("failed to issue token: {0}")]
    Token(#[from] TokenError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for RegisterError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            RegisterError::Validation(msg) => (http::StatusCode::BAD_REQUEST, msg.clone()),
            RegisterError::EmailTaken => (http::StatusCode::CONFLICT, self.to_string()),
            RegisterError::PasswordHash(e) => {
                tracing::error!("password hashing failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            RegisterError::Token(e) => {
                tracing::error!("token issuance failed: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".into(),
                )
            }
            RegisterError::Database(e) => {
                tracing::error!("database error during registration: {}", e);
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
impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/auth/register").unwrap();
        client.post(full_url).json(&self)
    }
}
