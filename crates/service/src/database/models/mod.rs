mod document;
mod user;

pub use document::Document;
pub use user::{User, UserWithUsage};
