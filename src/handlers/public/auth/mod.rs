// handlers/public/auth/mod.rs - Token acquisition endpoints

use serde::Serialize;

use crate::database::models::PublicUser;
use crate::services::Session;

pub mod login; // POST /api/auth/login
pub mod register; // POST /api/auth/register

pub use login::login_post;
pub use register::register_post;

/// Body returned by both register and login
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub user: PublicUser,
    pub token: String,
}

impl SessionResponse {
    pub fn new(message: &'static str, session: Session) -> Self {
        Self {
            message,
            user: session.user,
            token: session.token,
        }
    }
}
