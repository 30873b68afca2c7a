use argon2::password_hash::{self, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand_core::OsRng;
use secrecy::{ExposeSecret, Secret};

/// Encode the password using argon2
#[tracing::instrument(skip(password))]
pub fn encode_password(password: &Secret<String>) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);

    Ok(Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)?
        .to_string())
}

/// Check if the candidate matches the stored hash
#[tracing::instrument(skip_all)]
pub fn verify_password(
    password_hash: &str,
    candidate: &Secret<String>,
) -> Result<bool, password_hash::Error> {
    let parsed_hash = PasswordHash::new(password_hash)?;
    Ok(Argon2::default()
        .verify_password(candidate.expose_secret().as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let password = Secret::new("hunter2".to_string());
        let hash = encode_password(&password).unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password(&hash, &password).unwrap());
        assert!(!verify_password(&hash, &Secret::new("wrong".to_string())).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", &Secret::new("x".to_string())).is_err());
    }
}
