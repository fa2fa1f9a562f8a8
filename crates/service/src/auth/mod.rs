pub mod identity;
pub mod password;
pub mod tokens;

pub use identity::{AdminIdentity, AuthError, Identity};
pub use tokens::{TokenAuthority, TokenError};
