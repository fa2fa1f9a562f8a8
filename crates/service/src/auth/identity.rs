use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, RequestPartsExt};
use axum_extra::headers::authorization::{Authorization, Bearer};
use axum_extra::TypedHeader;

use crate::database::models::User;
use crate::ServiceState;

/// The authenticated caller, resolved from the `Authorization: Bearer` header
/// to a live row in `users`. Extracting this gates the route.
#[derive(Debug, Clone)]
pub struct Identity(pub User);

/// Like [`Identity`] but additionally requires the admin flag. A valid
/// credential without the flag is rejected with 403, distinct from the
/// unauthenticated 401.
#[derive(Debug, Clone)]
pub struct AdminIdentity(pub User);

#[async_trait]
impl FromRequestParts<ServiceState> for Identity {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::MissingCredential)?;

        let user_id = state.tokens().verify(bearer.token()).map_err(|e| {
            tracing::debug!("bearer token rejected: {}", e);
            AuthError::InvalidCredential
        })?;

        match User::get(user_id, state.database()).await? {
            Some(user) => Ok(Identity(user)),
            // Token outlived its account.
            None => Err(AuthError::InvalidCredential),
        }
    }
}

#[async_trait]
impl FromRequestParts<ServiceState> for AdminIdentity {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &ServiceState,
    ) -> Result<Self, Self::Rejection> {
        let Identity(user) = Identity::from_request_parts(parts, state).await?;

        if !user.is_admin {
            return Err(AuthError::Forbidden);
        }

        Ok(AdminIdentity(user))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no bearer credential presented")]
    MissingCredential,

    #[error("bearer credential is invalid or expired")]
    InvalidCredential,

    #[error("caller is not an administrator")]
    Forbidden,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingCredential => (StatusCode::UNAUTHORIZED, "Not authorized, no token"),
            AuthError::InvalidCredential => {
                (StatusCode::UNAUTHORIZED, "Not authorized, token failed")
            }
            AuthError::Forbidden => (StatusCode::FORBIDDEN, "Admin access required"),
            AuthError::Database(e) => {
                tracing::error!("database error while authenticating: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(serde_json::json!({ "message": message }))).into_response()
    }
}
