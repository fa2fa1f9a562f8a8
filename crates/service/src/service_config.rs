use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug)]
pub struct Config {
    // http server configuration
    /// Port for the HTTP API server.
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // credential configuration
    /// secret used to sign bearer tokens
    pub token_secret: String,
    /// how long an issued bearer token remains valid
    pub token_ttl: Duration,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}
