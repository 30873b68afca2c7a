// handlers/protected/summaries/create.rs - POST /api/summaries handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};

use crate::app::AppState;
use crate::database::models::{Article, Summary};
use crate::error::ApiError;
use crate::handlers::json_body;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::ArticleSubmission;

const FAILURE: &str = "Server error while summarizing the article.";

#[derive(Debug, Deserialize)]
pub struct CreateSummaryRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateSummaryResponse {
    pub message: &'static str,
    pub article: Article,
    pub summary: Summary,
}

/// Store the article, summarize it, store the summary. 201 with both records.
pub async fn summary_create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<CreateSummaryRequest>, JsonRejection>,
) -> ApiResult<CreateSummaryResponse> {
    let request = json_body(payload)?;
    tracing::debug!("User {} submitting article {:?}", user.id, request.title);

    let created = state
        .summaries
        .create(
            user.id,
            ArticleSubmission {
                title: request.title,
                author: request.author,
                content: request.content,
            },
        )
        .await
        .map_err(|e| ApiError::from_summary(e, FAILURE))?;

    Ok(ApiResponse::created(CreateSummaryResponse {
        message: "Article and summary created successfully.",
        article: created.article,
        summary: created.summary,
    }))
}
