// Service modules
pub mod auth;
pub mod database;
pub mod http_server;
pub mod process;
pub mod service_config;
pub mod service_state;

// Re-exports for consumers (CLI binary, tests)
pub use database::Database;
pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
