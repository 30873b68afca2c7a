use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::article::Article;

/// Generated condensation of exactly one article.
///
/// Has no owner column. Access is decided by the owner of the linked article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: Uuid,
    #[serde(rename = "article")]
    pub article_id: Uuid,
    pub summary_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Summary {
    pub fn with_article(self, article: Article) -> SummaryWithArticle {
        SummaryWithArticle {
            id: self.id,
            article,
            summary_text: self.summary_text,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewSummary {
    pub article_id: Uuid,
    pub summary_text: String,
}

/// Summary joined with its article, as returned by the read endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryWithArticle {
    pub id: Uuid,
    pub article: Article,
    pub summary_text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
