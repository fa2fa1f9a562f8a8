use std::path::PathBuf;

use clap::Args;
use url::Url;

use docvault_service::database::models::User;
use docvault_service::database::DatabaseSetupError;
use docvault_service::Database;

/// Admin accounts are provisioned by direct store edit, not through the API.
/// This op opens the sqlite file the server uses and flips the flag in place.
#[derive(Args, Debug, Clone)]
pub struct GrantAdmin {
    /// Email of the account to promote
    #[arg(long)]
    pub email: String,

    /// Path to the sqlite database file
    #[arg(long, default_value = "docvault.sqlite")]
    pub db_path: PathBuf,

    /// Revoke the admin flag instead of granting it
    #[arg(long)]
    pub revoke: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum GrantAdminError {
    #[error("invalid database path: {0}")]
    InvalidPath(#[from] url::ParseError),
    #[error("database error: {0}")]
    Setup(#[from] DatabaseSetupError),
    #[error("database error: {0}")]
    Query(#[from] sqlx::Error),
    #[error("no user registered with email {0}")]
    NoSuchUser(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for GrantAdmin {
    type Error = GrantAdminError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let database_url = Url::parse(&format!("sqlite://{}", self.db_path.display()))?;
        let db = Database::connect(&database_url).await?;

        let email = self.email.trim().to_ascii_lowercase();
        let updated = User::set_admin(&email, !self.revoke, &db).await?;
        if !updated {
            return Err(GrantAdminError::NoSuchUser(email));
        }

        let verb = if self.revoke { "revoked from" } else { "granted to" };
        Ok(format!("admin {} {}", verb, email))
    }
}
