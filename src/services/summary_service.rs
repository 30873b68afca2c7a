use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Article, NewArticle, NewSummary, Summary, SummaryWithArticle};
use crate::database::{DatabaseError, SummaryStore};
use crate::services::summarizer::{Summarizer, SummarizerError};

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Title and content are required.")]
    Validation,
    #[error("Summary not found.")]
    NotFound,
    #[error("Not authorized.")]
    Forbidden,
    #[error("Summarization failed: {0}")]
    Upstream(#[from] SummarizerError),
    #[error("Persistence failed: {0}")]
    Persistence(#[from] DatabaseError),
}

/// Fields accepted when submitting an article. Unvalidated.
#[derive(Debug, Default, Clone)]
pub struct ArticleSubmission {
    pub title: Option<String>,
    pub author: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedSummary {
    pub article: Article,
    pub summary: Summary,
}

/// Article → summarization → summary pipeline plus owner-scoped reads and writes.
#[derive(Clone)]
pub struct SummaryService {
    store: Arc<dyn SummaryStore>,
    summarizer: Arc<dyn Summarizer>,
}

impl SummaryService {
    pub fn new(store: Arc<dyn SummaryStore>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self { store, summarizer }
    }

    pub fn store(&self) -> &Arc<dyn SummaryStore> {
        &self.store
    }

    /// Persist the article, summarize its raw content, persist the summary.
    ///
    /// When summarizing or the summary insert fails the article is removed again,
    /// so a failed request leaves nothing behind.
    #[tracing::instrument(skip(self, submission))]
    pub async fn create(
        &self,
        user_id: Uuid,
        submission: ArticleSubmission,
    ) -> Result<CreatedSummary, SummaryError> {
        let new_article = NewArticle::normalized(
            user_id,
            submission.title.as_deref(),
            submission.author.as_deref(),
            submission.content.as_deref(),
        )
        .ok_or(SummaryError::Validation)?;

        // The upstream gets the text exactly as submitted.
        let raw_content = submission.content.unwrap_or_default();

        let article = self.store.insert_article(new_article).await?;
        tracing::debug!("Stored article {} for user {}", article.id, user_id);

        let summary_text = match self.summarizer.summarize(&raw_content).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("Summarization failed for article {}: {}", article.id, e);
                self.discard_article(article.id).await;
                return Err(SummaryError::Upstream(e));
            }
        };

        let summary = match self
            .store
            .insert_summary(NewSummary {
                article_id: article.id,
                summary_text,
            })
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!("Could not store summary for article {}: {}", article.id, e);
                self.discard_article(article.id).await;
                return Err(SummaryError::Persistence(e));
            }
        };

        tracing::info!("Created summary {} for article {}", summary.id, article.id);
        Ok(CreatedSummary { article, summary })
    }

    pub async fn list(&self, user_id: Uuid) -> Result<Vec<SummaryWithArticle>, SummaryError> {
        Ok(self.store.list_summaries_for_user(user_id).await?)
    }

    pub async fn get(&self, user_id: Uuid, id: Uuid) -> Result<SummaryWithArticle, SummaryError> {
        let (summary, article) = self.authorized(user_id, id).await?;
        Ok(summary.with_article(article))
    }

    /// Replace the text when `summary_text` is non-blank; otherwise leave it as is.
    pub async fn update(
        &self,
        user_id: Uuid,
        id: Uuid,
        summary_text: Option<&str>,
    ) -> Result<SummaryWithArticle, SummaryError> {
        let (summary, article) = self.authorized(user_id, id).await?;

        let replacement = summary_text.map(str::trim).filter(|s| !s.is_empty());
        let summary = match replacement {
            Some(text) => self
                .store
                .update_summary_text(id, text)
                .await?
                .ok_or(SummaryError::NotFound)?,
            None => summary,
        };

        Ok(summary.with_article(article))
    }

    /// Delete the linked article, then the summary.
    ///
    /// Removing the article cascades to the summary in both stores, so the
    /// second delete normally finds nothing left.
    pub async fn delete(&self, user_id: Uuid, id: Uuid) -> Result<(), SummaryError> {
        let (summary, article) = self.authorized(user_id, id).await?;

        if !self.store.delete_article(article.id).await? {
            tracing::warn!("Article {} of summary {} was already gone", article.id, summary.id);
        }
        self.store.delete_summary(summary.id).await?;

        tracing::info!("Deleted summary {} and article {}", summary.id, article.id);
        Ok(())
    }

    /// Look up a summary and check that its article belongs to `user_id`.
    async fn authorized(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> Result<(Summary, Article), SummaryError> {
        let (summary, article) = self
            .store
            .find_summary(id)
            .await?
            .ok_or(SummaryError::NotFound)?;

        match article {
            Some(article) if article.is_owned_by(user_id) => Ok((summary, article)),
            _ => {
                tracing::warn!("User {} denied access to summary {}", user_id, id);
                Err(SummaryError::Forbidden)
            }
        }
    }

    async fn discard_article(&self, article_id: Uuid) {
        if let Err(e) = self.store.delete_article(article_id).await {
            tracing::error!("Could not remove orphaned article {}: {}", article_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedSummarizer {
        reply: Result<String, u16>,
        calls: AtomicUsize,
    }

    impl FixedSummarizer {
        fn ok(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(status: u16) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl Summarizer for FixedSummarizer {
        async fn summarize(&self, _text: &str) -> Result<String, SummarizerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(SummarizerError::ServerError {
                    status: *status,
                    body: "upstream down".to_string(),
                }),
            }
        }
    }

    fn submission(title: Option<&str>, content: Option<&str>) -> ArticleSubmission {
        ArticleSubmission {
            title: title.map(str::to_string),
            author: None,
            content: content.map(str::to_string),
        }
    }

    fn service(store: &Arc<MemoryStore>, summarizer: Arc<FixedSummarizer>) -> SummaryService {
        SummaryService::new(store.clone(), summarizer)
    }

    #[tokio::test]
    async fn create_links_article_to_caller() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store, FixedSummarizer::ok("short"));
        let user = Uuid::new_v4();

        let created = svc
            .create(user, submission(Some("T"), Some("long text")))
            .await
            .unwrap();

        assert_eq!(created.article.user_id, user);
        assert_eq!(created.article.author, "Unknown");
        assert_eq!(created.summary.article_id, created.article.id);
        assert_eq!(created.summary.summary_text, "short");
    }

    #[tokio::test]
    async fn validation_failure_skips_store_and_upstream() {
        let store = Arc::new(MemoryStore::new());
        let summarizer = FixedSummarizer::ok("short");
        let svc = service(&store, summarizer.clone());

        let err = svc
            .create(Uuid::new_v4(), submission(None, Some("x")))
            .await
            .unwrap_err();

        assert!(matches!(err, SummaryError::Validation));
        assert_eq!(store.article_count().await, 0);
        assert_eq!(summarizer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn upstream_failure_removes_article() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store, FixedSummarizer::failing(503));

        let err = svc
            .create(Uuid::new_v4(), submission(Some("T"), Some("text")))
            .await
            .unwrap_err();

        assert!(matches!(err, SummaryError::Upstream(_)));
        assert_eq!(store.article_count().await, 0);
        assert_eq!(store.summary_count().await, 0);
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store, FixedSummarizer::ok("short"));
        let owner = Uuid::new_v4();
        let intruder = Uuid::new_v4();
        let created = svc
            .create(owner, submission(Some("T"), Some("text")))
            .await
            .unwrap();
        let id = created.summary.id;

        assert!(matches!(svc.get(intruder, id).await, Err(SummaryError::Forbidden)));
        assert!(matches!(
            svc.update(intruder, id, Some("hijack")).await,
            Err(SummaryError::Forbidden)
        ));
        assert!(matches!(svc.delete(intruder, id).await, Err(SummaryError::Forbidden)));

        let still = svc.get(owner, id).await.unwrap();
        assert_eq!(still.summary_text, "short");
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store, FixedSummarizer::ok("short"));
        let user = Uuid::new_v4();
        let id = Uuid::new_v4();

        assert!(matches!(svc.get(user, id).await, Err(SummaryError::NotFound)));
        assert!(matches!(svc.update(user, id, Some("x")).await, Err(SummaryError::NotFound)));
        assert!(matches!(svc.delete(user, id).await, Err(SummaryError::NotFound)));
    }

    #[tokio::test]
    async fn blank_update_is_a_no_op() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store, FixedSummarizer::ok("short"));
        let user = Uuid::new_v4();
        let id = svc
            .create(user, submission(Some("T"), Some("text")))
            .await
            .unwrap()
            .summary
            .id;

        assert_eq!(svc.update(user, id, None).await.unwrap().summary_text, "short");
        assert_eq!(svc.update(user, id, Some("   ")).await.unwrap().summary_text, "short");
        assert_eq!(
            svc.update(user, id, Some("rewritten")).await.unwrap().summary_text,
            "rewritten"
        );
        assert_eq!(svc.get(user, id).await.unwrap().summary_text, "rewritten");
    }

    #[tokio::test]
    async fn delete_cascades_to_article() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store, FixedSummarizer::ok("short"));
        let user = Uuid::new_v4();
        let created = svc
            .create(user, submission(Some("T"), Some("text")))
            .await
            .unwrap();

        svc.delete(user, created.summary.id).await.unwrap();

        assert!(store.article(created.article.id).await.is_none());
        assert!(matches!(
            svc.get(user, created.summary.id).await,
            Err(SummaryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn removing_article_takes_summary_with_it() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(&store, FixedSummarizer::ok("short"));
        let user = Uuid::new_v4();
        let created = svc
            .create(user, submission(Some("T"), Some("text")))
            .await
            .unwrap();
        store.delete_article(created.article.id).await.unwrap();

        assert!(matches!(
            svc.get(user, created.summary.id).await,
            Err(SummaryError::NotFound)
        ));
        assert!(matches!(
            svc.delete(user, created.summary.id).await,
            Err(SummaryError::NotFound)
        ));
        assert!(svc.list(user).await.unwrap().is_empty());
    }
}
