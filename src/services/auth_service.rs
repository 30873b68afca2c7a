use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;
use thiserror::Error;

use crate::auth::password::{encode_password, verify_password};
use crate::auth::{JwtError, JwtKeys};
use crate::database::models::user::normalize_email;
use crate::database::models::{NewUser, PublicUser, UserRole};
use crate::database::{DatabaseError, UserStore};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{0}")]
    MissingFields(&'static str),
    #[error("User already exists")]
    UserExists,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
    #[error(transparent)]
    Token(#[from] JwtError),
    #[error(transparent)]
    Persistence(#[from] DatabaseError),
}

/// Issued on successful registration or login
#[derive(Debug)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        password: Option<Secret<String>>,
    ) -> Result<Session, AuthError> {
        const MISSING: &str = "All fields are required";

        let name = non_blank(name).ok_or(AuthError::MissingFields(MISSING))?;
        let email = non_blank(email)
            .map(normalize_email)
            .ok_or(AuthError::MissingFields(MISSING))?;
        let password = password
            .filter(|p| !p.expose_secret().is_empty())
            .ok_or(AuthError::MissingFields(MISSING))?;

        if self.users.find_user_by_email(&email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let password_hash = tokio::task::spawn_blocking(move || encode_password(&password))
            .await
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?
            .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        let user = self
            .users
            .insert_user(NewUser {
                name: name.to_string(),
                email,
                password_hash,
                role: UserRole::User,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Conflict(_) => AuthError::UserExists,
                other => AuthError::Persistence(other),
            })?;

        tracing::info!("Registered user {}", user.id);

        Ok(Session {
            token: self.keys.generate_jwt(&user)?,
            user: PublicUser::from(&user),
        })
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: Option<&str>,
        password: Option<Secret<String>>,
    ) -> Result<Session, AuthError> {
        const MISSING: &str = "Email and password are required";

        let email = non_blank(email)
            .map(normalize_email)
            .ok_or(AuthError::MissingFields(MISSING))?;
        let password = password
            .filter(|p| !p.expose_secret().is_empty())
            .ok_or(AuthError::MissingFields(MISSING))?;

        let user = self
            .users
            .find_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let stored_hash = user.password_hash.clone();
        let matches =
            tokio::task::spawn_blocking(move || verify_password(&stored_hash, &password))
                .await
                .map_err(|e| AuthError::PasswordHash(e.to_string()))?
                .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

        if !matches {
            tracing::warn!("Failed login attempt for user {}", user.id);
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Session {
            token: self.keys.generate_jwt(&user)?,
            user: PublicUser::from(&user),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
