// handlers/public/auth/login.rs - POST /api/auth/login handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use secrecy::Secret;
use serde::Deserialize;

use super::SessionResponse;
use crate::app::AppState;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<Secret<String>>,
}

/// Unknown email and wrong password both answer "Invalid credentials".
pub async fn login_post(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<SessionResponse> {
    let request = json_body(payload)?;

    let session = state
        .auth
        .login(request.email.as_deref(), request.password)
        .await?;

    Ok(ApiResponse::success(SessionResponse::new(
        "Login successful",
        session,
    )))
}
