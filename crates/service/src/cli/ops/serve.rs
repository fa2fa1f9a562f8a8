use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use docvault_service::{spawn_service, ServiceConfig};

const DEFAULT_TOKEN_SECRET: &str = "insecure-dev-secret";

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Port for the HTTP API server
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Path to the sqlite database file
    #[arg(long, default_value = "docvault.sqlite")]
    pub db_path: PathBuf,

    /// Secret used to sign bearer tokens
    #[arg(long, env = "DOCVAULT_TOKEN_SECRET", default_value = DEFAULT_TOKEN_SECRET)]
    pub token_secret: String,

    /// How many days an issued token remains valid
    #[arg(long, default_value_t = 30)]
    pub token_ttl_days: u64,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let log_level = self
            .log_level
            .parse::<tracing::Level>()
            .map_err(|_| ServeError::InvalidLogLevel(self.log_level.clone()))?;

        if self.token_secret == DEFAULT_TOKEN_SECRET {
            eprintln!(
                "Warning: signing tokens with the built-in dev secret; \
                 set DOCVAULT_TOKEN_SECRET in production"
            );
        }

        let config = ServiceConfig {
            api_port: self.port,
            sqlite_path: Some(self.db_path.clone()),
            token_secret: self.token_secret.clone(),
            token_ttl: Duration::from_secs(self.token_ttl_days * 24 * 60 * 60),
            log_level,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;

        Ok("shutdown complete".to_string())
    }
}
