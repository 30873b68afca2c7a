// handlers/protected/summaries/show.rs - GET /api/summaries/:id handler

use axum::{
    extract::{Path, State},
    Extension,
};

use super::parse_summary_id;
use crate::app::AppState;
use crate::database::models::SummaryWithArticle;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

pub async fn summary_show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<SummaryWithArticle> {
    let id = parse_summary_id(&id)?;

    let summary = state
        .summaries
        .get(user.id, id)
        .await
        .map_err(|e| ApiError::from_summary(e, "Error fetching summary."))?;

    Ok(ApiResponse::success(summary))
}
