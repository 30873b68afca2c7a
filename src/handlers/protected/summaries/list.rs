// handlers/protected/summaries/list.rs - GET /api/summaries handler

use axum::{extract::State, Extension};

use crate::app::AppState;
use crate::database::models::SummaryWithArticle;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub async fn summary_list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<Vec<SummaryWithArticle>> {
    let summaries = state
        .summaries
        .list(user.id)
        .await
        .map_err(|e| ApiError::from_summary(e, "Failed to fetch summaries."))?;

    Ok(ApiResponse::success(summaries))
}
