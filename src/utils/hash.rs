use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::middleware::error::AppError;

pub fn hash_password(pwd: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(pwd.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::Generic {
            description: err.to_string(),
        })
}

pub fn verify_password(hash: &str, pwd: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(pwd.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
