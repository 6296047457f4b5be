use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("could not hash password: {0}")]
    Hash(password_hash::Error),

    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
}

// argon2id v19 with the crate's default cost parameters
fn hasher() -> Argon2<'static> {
    Argon2::default()
}

/// One-way transform of `plain` into a PHC string (`$argon2id$...`).
/// A fresh salt is drawn per call, so equal inputs give different outputs.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    hasher()
        .hash_password(plain.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(PasswordError::Hash)
}

/// Re-derives the digest with the salt and parameters embedded in `phc` and
/// compares in constant time.
pub fn verify_password(plain: &str, phc: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(phc).map_err(PasswordError::MalformedHash)?;
    match hasher().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::MalformedHash(e)),
    }
}
