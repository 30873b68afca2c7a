use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::manager::{DatabaseError, DatabaseManager};
use super::models::{
    Article, NewArticle, NewSummary, NewUser, Summary, SummaryWithArticle, User, UserRole,
};
use super::store::{SummaryStore, UserStore};

/// PostgreSQL-backed store sharing one connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Flat row of `summaries LEFT JOIN articles`
#[derive(Debug, FromRow)]
struct SummaryArticleRow {
    id: Uuid,
    article_id: Uuid,
    summary_text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    a_id: Option<Uuid>,
    a_user_id: Option<Uuid>,
    a_title: Option<String>,
    a_author: Option<String>,
    a_content: Option<String>,
    a_created_at: Option<DateTime<Utc>>,
    a_updated_at: Option<DateTime<Utc>>,
}

impl SummaryArticleRow {
    fn split(self) -> (Summary, Option<Article>) {
        let article = match (
            self.a_id,
            self.a_user_id,
            self.a_title,
            self.a_author,
            self.a_content,
            self.a_created_at,
            self.a_updated_at,
        ) {
            (
                Some(id),
                Some(user_id),
                Some(title),
                Some(author),
                Some(content),
                Some(created_at),
                Some(updated_at),
            ) => Some(Article {
                id,
                user_id,
                title,
                author,
                content,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        let summary = Summary {
            id: self.id,
            article_id: self.article_id,
            summary_text: self.summary_text,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        (summary, article)
    }
}

const SUMMARY_JOIN_SELECT: &str = r#"
    SELECT
        s.id, s.article_id, s.summary_text, s.created_at, s.updated_at,
        a.id AS a_id, a.user_id AS a_user_id, a.title AS a_title, a.author AS a_author,
        a.content AS a_content, a.created_at AS a_created_at, a.updated_at AS a_updated_at
    FROM summaries s
    LEFT JOIN articles a ON a.id = s.article_id
"#;

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = DatabaseError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&row.role)
            .ok_or_else(|| DatabaseError::QueryError(format!("unknown user role '{}'", row.role)))?;

        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl SummaryStore for PgStore {
    async fn insert_article(&self, article: NewArticle) -> Result<Article, DatabaseError> {
        let query = r#"
            INSERT INTO articles (id, user_id, title, author, content)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, author, content, created_at, updated_at
        "#;

        let row = sqlx::query_as::<_, Article>(query)
            .bind(Uuid::new_v4())
            .bind(article.user_id)
            .bind(&article.title)
            .bind(&article.author)
            .bind(&article.content)
            .fetch_one(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete_article(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_summary(&self, summary: NewSummary) -> Result<Summary, DatabaseError> {
        let query = r#"
            INSERT INTO summaries (id, article_id, summary_text)
            VALUES ($1, $2, $3)
            RETURNING id, article_id, summary_text, created_at, updated_at
        "#;

        sqlx::query_as::<_, Summary>(query)
            .bind(Uuid::new_v4())
            .bind(summary.article_id)
            .bind(&summary.summary_text)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "Summary for this article"))
    }

    async fn find_summary(
        &self,
        id: Uuid,
    ) -> Result<Option<(Summary, Option<Article>)>, DatabaseError> {
        let query = format!("{} WHERE s.id = $1", SUMMARY_JOIN_SELECT);

        let row = sqlx::query_as::<_, SummaryArticleRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(SummaryArticleRow::split))
    }

    async fn list_summaries_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<SummaryWithArticle>, DatabaseError> {
        let query = format!(
            "{} WHERE a.user_id = $1 ORDER BY s.created_at DESC, s.id DESC",
            SUMMARY_JOIN_SELECT
        );

        let rows = sqlx::query_as::<_, SummaryArticleRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                let (summary, article) = row.split();
                article.map(|article| summary.with_article(article))
            })
            .collect())
    }

    async fn update_summary_text(
        &self,
        id: Uuid,
        summary_text: &str,
    ) -> Result<Option<Summary>, DatabaseError> {
        let query = r#"
            UPDATE summaries
            SET summary_text = $2, updated_at = now()
            WHERE id = $1
            RETURNING id, article_id, summary_text, created_at, updated_at
        "#;

        let row = sqlx::query_as::<_, Summary>(query)
            .bind(id)
            .bind(summary_text)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn delete_summary(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM summaries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> Result<User, DatabaseError> {
        let query = r#"
            INSERT INTO users (id, name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, role, created_at, updated_at
        "#;

        let row = sqlx::query_as::<_, UserRow>(query)
            .bind(Uuid::new_v4())
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DatabaseError::from_write(e, "User"))?;

        row.try_into()
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let query = r#"
            SELECT id, name, email, password_hash, role, created_at, updated_at
            FROM users
            WHERE email = $1
        "#;

        sqlx::query_as::<_, UserRow>(query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }
}
