use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Article, NewArticle, NewSummary, NewUser, Summary, SummaryWithArticle, User};
use super::store::{SummaryStore, UserStore};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    articles: HashMap<Uuid, Article>,
    summaries: HashMap<Uuid, Summary>,
}

/// In-process store with the same contract as `PgStore`; no persistence across restarts.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn article(&self, id: Uuid) -> Option<Article> {
        self.tables.read().await.articles.get(&id).cloned()
    }

    pub async fn article_count(&self) -> usize {
        self.tables.read().await.articles.len()
    }

    pub async fn summary_count(&self) -> usize {
        self.tables.read().await.summaries.len()
    }
}

#[async_trait]
impl SummaryStore for MemoryStore {
    async fn insert_article(&self, article: NewArticle) -> Result<Article, DatabaseError> {
        let now = Utc::now();
        let article = Article {
            id: Uuid::new_v4(),
            user_id: article.user_id,
            title: article.title,
            author: article.author,
            content: article.content,
            created_at: now,
            updated_at: now,
        };

        let mut tables = self.tables.write().await;
        tables.articles.insert(article.id, article.clone());
        Ok(article)
    }

    /// Cascades to the article's summary, as the `summaries.article_id` foreign key does.
    async fn delete_article(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.articles.remove(&id).is_none() {
            return Ok(false);
        }
        tables.summaries.retain(|_, summary| summary.article_id != id);
        Ok(true)
    }

    async fn insert_summary(&self, summary: NewSummary) -> Result<Summary, DatabaseError> {
        let mut tables = self.tables.write().await;

        if !tables.articles.contains_key(&summary.article_id) {
            return Err(DatabaseError::NotFound(format!(
                "article {} does not exist",
                summary.article_id
            )));
        }
        if tables
            .summaries
            .values()
            .any(|s| s.article_id == summary.article_id)
        {
            return Err(DatabaseError::Conflict(
                "Summary for this article already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let summary = Summary {
            id: Uuid::new_v4(),
            article_id: summary.article_id,
            summary_text: summary.summary_text,
            created_at: now,
            updated_at: now,
        };
        tables.summaries.insert(summary.id, summary.clone());
        Ok(summary)
    }

    async fn find_summary(
        &self,
        id: Uuid,
    ) -> Result<Option<(Summary, Option<Article>)>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.summaries.get(&id).map(|summary| {
            let article = tables.articles.get(&summary.article_id).cloned();
            (summary.clone(), article)
        }))
    }

    async fn list_summaries_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SummaryWithArticle>, DatabaseError> {
        let tables = self.tables.read().await;

        let mut owned: Vec<SummaryWithArticle> = tables
            .summaries
            .values()
            .filter_map(|summary| {
                let article = tables.articles.get(&summary.article_id)?;
                article
                    .is_owned_by(user_id)
                    .then(|| summary.clone().with_article(article.clone()))
            })
            .collect();

        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(owned)
    }

    async fn update_summary_text(
        &self,
        id: Uuid,
        summary_text: &str,
    ) -> Result<Option<Summary>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.summaries.get_mut(&id).map(|summary| {
            summary.summary_text = summary_text.to_string();
            summary.updated_at = Utc::now();
            summary.clone()
        }))
    }

    async fn delete_summary(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.summaries.remove(&id).is_some())
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(DatabaseError::Conflict("User already exists".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }
}
