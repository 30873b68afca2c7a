// handlers/mod.rs - Handler tiers
//
// Public (no auth) → Protected (bearer JWT required)
pub mod protected; // /api/summaries/*
pub mod public; // /health, /api/auth/*

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::error::ApiError;

/// Unwrap a JSON body, turning axum's rejection into our `{message}` error shape
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}
