// handlers/protected/summaries/update.rs - PUT /api/summaries/:id handler

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use super::parse_summary_id;
use crate::app::AppState;
use crate::database::models::SummaryWithArticle;
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSummaryRequest {
    pub summary_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateSummaryResponse {
    pub message: &'static str,
    pub summary: SummaryWithArticle,
}

/// A blank or absent `summaryText` leaves the stored text untouched.
pub async fn summary_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSummaryRequest>, JsonRejection>,
) -> ApiResult<UpdateSummaryResponse> {
    let id = parse_summary_id(&id)?;
    let request = match payload {
        Err(JsonRejection::MissingJsonContentType(_)) => UpdateSummaryRequest::default(),
        other => json_body(other)?,
    };

    let summary = state
        .summaries
        .update(user.id, id, request.summary_text.as_deref())
        .await
        .map_err(|e| ApiError::from_summary(e, "Failed to update summary."))?;

    Ok(ApiResponse::success(UpdateSummaryResponse {
        message: "Summary updated successfully.",
        summary,
    }))
}
