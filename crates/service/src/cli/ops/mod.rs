mod docs;
mod grant_admin;
mod health;
mod login;
mod register;
mod serve;
mod stats;
mod upload;
mod version;

pub use docs::Docs;
pub use grant_admin::GrantAdmin;
pub use health::Health;
pub use login::Login;
pub use register::Register;
pub use serve::Serve;
pub use stats::Stats;
pub use upload::Upload;
pub use version::Version;
