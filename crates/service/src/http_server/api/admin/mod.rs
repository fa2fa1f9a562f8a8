use axum::routing::{delete, get};
use axum::Router;

use crate::ServiceState;

pub mod delete_all_documents;
pub mod delete_document;
pub mod stats;
pub mod users;

// Every handler in here extracts AdminIdentity, which is what gates the
// routes: 401 without a credential, 403 without the admin flag.
pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/stats", get(stats::handler))
        .route("/users", get(users::handler))
        .route("/documents/:id", delete(delete_document::handler))
        .route("/documents", delete(delete_all_documents::handler))
        .with_state(state)
}
