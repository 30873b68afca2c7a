use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Author recorded when the submitter doesn't name one
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// A stored piece of submitted text. The owner is fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: Uuid,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    pub title: String,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Article {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Insert payload; fields are already trimmed and validated.
#[derive(Debug, Clone)]
pub struct NewArticle {
    pub user_id: Uuid,
    pub title: String,
    pub author: String,
    pub content: String,
}

impl NewArticle {
    /// Trims every field and applies the author default.
    /// Returns `None` when the title or content is blank.
    pub fn normalized(
        user_id: Uuid,
        title: Option<&str>,
        author: Option<&str>,
        content: Option<&str>,
    ) -> Option<Self> {
        let title = title.map(str::trim).filter(|s| !s.is_empty())?;
        let content = content.map(str::trim).filter(|s| !s.is_empty())?;
        let author = author
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_AUTHOR);

        Some(Self {
            user_id,
            title: title.to_string(),
            author: author.to_string(),
            content: content.to_string(),
        })
    }
}
