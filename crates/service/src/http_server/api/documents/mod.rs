use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::models::{Document, User};
use crate::database::Database;
use crate::ServiceState;

pub mod list;
pub mod list_mine;
pub mod star;
pub mod upload;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/upload", post(upload::handler))
        .route("/", get(list::handler))
        .route("/my", get(list_mine::handler))
        .route("/:id/star", put(star::handler))
        .with_state(state)
}

/// Public slice of a user, embedded wherever documents reference people.
/// Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: *user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// A document joined with its owner and star set, annotated relative to the
/// viewing user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub id: Uuid,
    pub title: String,
    pub file_type: String,
    pub file_data: String,
    pub size: i64,
    pub uploaded_by: UserProfile,
    pub stars: Vec<UserProfile>,
    pub starred: bool,
    pub star_count: usize,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Join a document with its owner profile and star profiles, computing
/// `starred` and `starCount` for the given viewer.
pub(crate) async fn load_view(
    doc: &Document,
    viewer: Uuid,
    db: &Database,
) -> Result<DocumentView, sqlx::Error> {
    // Owner is a FK, so a missing row means the store is corrupt.
    let owner = User::get(*doc.uploaded_by, db)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    let star_users = doc.stars(db).await?;

    let starred = star_users.iter().any(|u| *u.id == viewer);
    let stars: Vec<UserProfile> = star_users.iter().map(UserProfile::from).collect();

    Ok(DocumentView {
        id: *doc.id,
        title: doc.title.clone(),
        file_type: doc.file_type.clone(),
        file_data: doc.file_data.clone(),
        size: doc.size,
        uploaded_by: UserProfile::from(&owner),
        star_count: stars.len(),
        stars,
        starred,
        created_at: doc.created_at,
    })
}

/// Join a whole listing for one viewer, preserving the input order.
pub(crate) async fn load_views(
    docs: &[Document],
    viewer: Uuid,
    db: &Database,
) -> Result<Vec<DocumentView>, sqlx::Error> {
    let mut views = Vec::with_capacity(docs.len());
    for doc in docs {
        views.push(load_view(doc, viewer, db).await?);
    }
    Ok(views)
}
