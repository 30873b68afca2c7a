use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Article, NewArticle, NewSummary, NewUser, Summary, SummaryWithArticle, User};

/// Persistence seam for articles and summaries.
///
/// Implementations must keep at most one summary per article and report a
/// second insert for the same article as `DatabaseError::Conflict`.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn insert_article(&self, article: NewArticle) -> Result<Article, DatabaseError>;

    /// Also removes the article's summary. Returns `false` when no article had that id.
    async fn delete_article(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn insert_summary(&self, summary: NewSummary) -> Result<Summary, DatabaseError>;

    /// Summary by id with its article, if the article still exists.
    async fn find_summary(
        &self,
        id: Uuid,
    ) -> Result<Option<(Summary, Option<Article>)>, DatabaseError>;

    /// Every summary whose article belongs to `user_id`, newest first.
    async fn list_summaries_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SummaryWithArticle>, DatabaseError>;

    async fn update_summary_text(
        &self,
        id: Uuid,
        summary_text: &str,
    ) -> Result<Option<Summary>, DatabaseError>;

    /// Returns `false` when no summary had that id.
    async fn delete_summary(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

/// Persistence seam for registered users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fails with `DatabaseError::Conflict` when the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
}
