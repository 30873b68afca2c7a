// handlers/public/auth/register.rs - POST /api/auth/register handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use secrecy::Secret;
use serde::Deserialize;

use super::SessionResponse;
use crate::app::AppState;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

/// Create an account and hand back a token for it.
///
/// 400 when a field is missing or the email is already registered.
pub async fn register_post(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let request = json_body(payload)?;

    let session = state
        .auth
        .register(
            request.name.as_deref(),
            request.email.as_deref(),
            request.password,
        )
        .await?;

    Ok(ApiResponse::created(SessionResponse::new(
        "Registration successful",
        session,
    )))
}
