use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::types::DbUuid;
use crate::database::Database;

/// An uploaded file. The payload travels and is stored as a Base64 data-URI
/// string; `size` is the byte count the client reported at upload time.
#[derive(Debug, Clone, FromRow)]
pub struct Document {
    pub id: DbUuid,
    pub title: String,
    pub file_type: String,
    pub file_data: String,
    pub size: i64,
    pub uploaded_by: DbUuid,
    pub created_at: OffsetDateTime,
}

impl Document {
    pub async fn create(
        title: &str,
        file_type: &str,
        file_data: &str,
        size: i64,
        uploaded_by: Uuid,
        db: &Database,
    ) -> Result<Document, sqlx::Error> {
        let id = DbUuid::generate();
        let created_at = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO documents (id, title, file_type, file_data, size, uploaded_by, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(id)
        .bind(title)
        .bind(file_type)
        .bind(file_data)
        .bind(size)
        .bind(DbUuid::from(uploaded_by))
        .bind(created_at)
        .execute(&**db)
        .await?;

        Self::get(*id, db).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get(id: Uuid, db: &Database) -> Result<Option<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, file_type, file_data, size, uploaded_by, created_at
            FROM documents
            WHERE id = ?1
            "#,
        )
        .bind(DbUuid::from(id))
        .fetch_optional(&**db)
        .await
    }

    /// Every document across all users, newest first.
    pub async fn list_all(db: &Database) -> Result<Vec<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, file_type, file_data, size, uploaded_by, created_at
            FROM documents
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&**db)
        .await
    }

    /// Documents owned by a single user, newest first.
    pub async fn list_by_owner(owner: Uuid, db: &Database) -> Result<Vec<Document>, sqlx::Error> {
        sqlx::query_as::<_, Document>(
            r#"
            SELECT id, title, file_type, file_data, size, uploaded_by, created_at
            FROM documents
            WHERE uploaded_by = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(DbUuid::from(owner))
        .fetch_all(&**db)
        .await
    }

    /// The users currently starring this document, oldest star first.
    pub async fn stars(&self, db: &Database) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.email, u.username, u.password_hash, u.is_admin, u.created_at
            FROM document_stars s
            INNER JOIN users u ON u.id = s.user_id
            WHERE s.document_id = ?1
            ORDER BY s.created_at ASC
            "#,
        )
        .bind(self.id)
        .fetch_all(&**db)
        .await
    }

    /// Flip `user_id`'s membership in the star set: present removes, absent
    /// adds. Returns the membership state after the flip.
    pub async fn toggle_star(&self, user_id: Uuid, db: &Database) -> Result<bool, sqlx::Error> {
        let user_id = DbUuid::from(user_id);
        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT 1 FROM document_stars WHERE document_id = ?1 AND user_id = ?2",
        )
        .bind(self.id)
        .bind(user_id)
        .fetch_optional(&**db)
        .await?;

        if existing.is_some() {
            sqlx::query("DELETE FROM document_stars WHERE document_id = ?1 AND user_id = ?2")
                .bind(self.id)
                .bind(user_id)
                .execute(&**db)
                .await?;
            Ok(false)
        } else {
            let created_at = OffsetDateTime::now_utc();
            sqlx::query(
                "INSERT INTO document_stars (document_id, user_id, created_at) VALUES (?1, ?2, ?3)",
            )
            .bind(self.id)
            .bind(user_id)
            .bind(created_at)
            .execute(&**db)
            .await?;
            Ok(true)
        }
    }

    /// Delete a document by id. Star rows go with it via cascade. Returns
    /// false if no such document existed.
    pub async fn delete(id: Uuid, db: &Database) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = ?1")
            .bind(DbUuid::from(id))
            .execute(&**db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove every document in the store, returning how many were deleted.
    pub async fn delete_all(db: &Database) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents").execute(&**db).await?;

        Ok(result.rows_affected())
    }

    pub async fn count(db: &Database) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM documents")
            .fetch_one(&**db)
            .await
    }

    /// Sum of `size` over every document in the store.
    pub async fn total_storage(db: &Database) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(SUM(size), 0) FROM documents")
            .fetch_one(&**db)
            .await
    }
}
