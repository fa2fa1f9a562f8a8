use std::sync::Arc;

use url::Url;

use crate::auth::TokenAuthority;
use crate::database::{Database, DatabaseSetupError};
use crate::service_config::Config;

/// Shared per-request state: the database handle and the token authority.
/// Cheap to clone, one instance per process.
#[derive(Clone)]
pub struct State {
    database: Database,
    tokens: Arc<TokenAuthority>,
}

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        let database_url = match &config.sqlite_path {
            Some(path) => Url::parse(&format!("sqlite://{}", path.display()))?,
            None => Url::parse("sqlite::memory:")?,
        };
        let database = Database::connect(&database_url).await?;

        let tokens = TokenAuthority::new(config.token_secret.as_bytes(), config.token_ttl);

        Ok(Self {
            database,
            tokens: Arc::new(tokens),
        })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn tokens(&self) -> &TokenAuthority {
        &self.tokens
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("invalid database url: {0}")]
    InvalidDatabaseUrl(#[from] url::ParseError),

    #[error("failed to set up the database: {0}")]
    DatabaseSetup(#[from] DatabaseSetupError),
}
