use axum::routing::post;
use axum::Router;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ServiceState;

pub mod login;
pub mod register;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/register", post(register::handler))
        .route("/login", post(login::handler))
        .with_state(state)
}

/// Shape returned by both register and login: the public profile plus a fresh
/// bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub is_admin: bool,
    pub token: String,
}

/// Lowercase and trim an email before any lookup or insert, so lookups are
/// case-insensitive without relying on collation.
pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

/// Minimal shape check: one '@' with something on both sides.
pub(crate) fn email_is_well_formed(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// The original app surfaces a username derived from the email local part.
pub(crate) fn username_from_email(email: &str) -> String {
    email
        .split_once('@')
        .map(|(local, _)| local.to_string())
        .unwrap_or_else(|| email.to_string())
}

pub(crate) const MIN_PASSWORD_LENGTH: usize = 6;
