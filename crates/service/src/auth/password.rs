//! Thin wrapper over bcrypt so cost selection lives in one place.

pub use bcrypt::BcryptError;

pub fn hash(password: &str) -> Result<String, BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify(password: &str, password_hash: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(password, password_hash)
}
