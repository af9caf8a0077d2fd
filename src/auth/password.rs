// Password hashing and validation service

use crate::auth::error::AuthError;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Password service for hashing and verification
pub struct PasswordService;

impl PasswordService {
    /// Hash a password using Argon2id with a per-password random salt.
    pub fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|_| AuthError::PasswordHashError)?
            .to_string();
        Ok(hash)
    }

    /// Verify a password against a stored hash. Comparison timing is
    /// governed by the Argon2 verify primitive, not string equality.
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed = PasswordHash::new(hash).map_err(|_| AuthError::PasswordHashError)?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Validate password strength requirements
    pub fn validate_strength(password: &str) -> Result<(), AuthError> {
        if password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::WeakPassword);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() {
        let hash = PasswordService::hash_password("analytical1").unwrap();
        assert!(PasswordService::verify_password("analytical1", &hash).unwrap());
        assert!(!PasswordService::verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = PasswordService::hash_password("analytical1").unwrap();
        let second = PasswordService::hash_password("analytical1").unwrap();
        assert_ne!(first, second, "same password must produce distinct salted hashes");
    }

    #[test]
    fn strength_boundary_at_eight_chars() {
        assert_eq!(
            PasswordService::validate_strength("seven77"),
            Err(AuthError::WeakPassword)
        );
        assert!(PasswordService::validate_strength("eight888").is_ok());
    }

    #[test]
    fn garbage_hash_is_an_error_not_a_match() {
        assert_eq!(
            PasswordService::verify_password("anything", "not-a-phc-string"),
            Err(AuthError::PasswordHashError)
        );
    }
}
