// handlers/protected/summaries/delete.rs - DELETE /api/summaries/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};
use serde_json::{json, Value};

use super::parse_summary_id;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// Removes the summary together with its article.
pub async fn summary_delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let id = parse_summary_id(&id)?;

    state
        .summaries
        .delete(user.id, id)
        .await
        .map_err(|e| ApiError::from_summary(e, "Failed to delete summary."))?;

    Ok(ApiResponse::success(json!({
        "message": "Summary and linked article deleted successfully."
    })))
}
