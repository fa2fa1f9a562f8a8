use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::database::types::DbUuid;
use crate::database::Database;

/// A registered account. The password is only ever stored as a bcrypt hash.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbUuid,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: OffsetDateTime,
}

/// A user joined with aggregate usage over the documents they own.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithUsage {
    #[sqlx(flatten)]
    pub user: User,
    pub document_count: i64,
    pub storage: i64,
}

impl User {
    /// Insert a new user. The caller is responsible for normalizing the email
    /// and hashing the password; uniqueness is enforced by the schema.
    pub async fn create(
        email: &str,
        username: &str,
        password_hash: &str,
        is_admin: bool,
        db: &Database,
    ) -> Result<User, sqlx::Error> {
        let id = DbUuid::generate();
        let created_at = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, is_admin, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(id)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .bind(is_admin)
        .bind(created_at)
        .execute(&**db)
        .await?;

        Self::get(*id, db).await?.ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn get(id: Uuid, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, is_admin, created_at
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(DbUuid::from(id))
        .fetch_optional(&**db)
        .await
    }

    pub async fn find_by_email(email: &str, db: &Database) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, username, password_hash, is_admin, created_at
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&**db)
        .await
    }

    pub async fn count(db: &Database) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&**db)
            .await
    }

    /// Flip the admin flag on an account, addressed by email. Returns false if
    /// no such account exists. Only reachable through operator tooling.
    pub async fn set_admin(
        email: &str,
        is_admin: bool,
        db: &Database,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_admin = ?1 WHERE email = ?2")
            .bind(is_admin)
            .bind(email)
            .execute(&**db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// All users annotated with document count and storage total, newest
    /// registration first. Full scan over documents, acceptable at this scale.
    pub async fn list_with_usage(db: &Database) -> Result<Vec<UserWithUsage>, sqlx::Error> {
        sqlx::query_as::<_, UserWithUsage>(
            r#"
            SELECT
                u.id, u.email, u.username, u.password_hash, u.is_admin, u.created_at,
                COUNT(d.id) AS document_count,
                COALESCE(SUM(d.size), 0) AS storage
            FROM users u
            LEFT JOIN documents d ON d.uploaded_by = u.id
            GROUP BY u.id
            ORDER BY u.created_at DESC
            "#,
        )
        .fetch_all(&**db)
        .await
    }
}
