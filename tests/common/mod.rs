#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{header as header_is, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use summarize_api::config::AppConfig;
use summarize_api::database::MemoryStore;
use summarize_api::services::NlpCloudClient;
use summarize_api::{app, AppState};

pub const NLP_TOKEN: &str = "test-nlp-token";

/// An app wired to an in-memory store and a mock summarization API
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub nlp: MockServer,
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let nlp = MockServer::start().await;

        let vars: HashMap<&str, String> = HashMap::from([
            ("DATABASE_URL", "postgres://unused/test".to_string()),
            ("JWT_SECRET", "integration-secret".to_string()),
            ("NLP_CLOUD_API_KEY", NLP_TOKEN.to_string()),
            ("NLP_CLOUD_URL", nlp.uri()),
            ("SUMMARIZER_TIMEOUT_SECS", "2".to_string()),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).cloned())?;

        let store = Arc::new(MemoryStore::new());
        let summarizer = Arc::new(NlpCloudClient::new(&config.summarizer)?);
        let state = AppState::with_store(config, store.clone(), summarizer)?;

        Ok(Self {
            router: app(state),
            store,
            nlp,
        })
    }

    /// Answer every summarization call with `status` and `body`
    pub async fn mock_summarizer(&self, status: u16, body: Value) {
        Mock::given(method("POST"))
            .and(path("/summarization"))
            .and(header_is("authorization", format!("Token {}", NLP_TOKEN).as_str()))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.nlp)
            .await;
    }

    pub async fn summarizer_calls(&self) -> usize {
        self.nlp
            .received_requests()
            .await
            .map(|requests| requests.len())
            .unwrap_or_default()
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    /// Register a fresh account and return its bearer token
    pub async fn register(&self, email: &str) -> Result<String> {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": "Reader", "email": email, "password": "hunter22" })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
        body["token"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("no token in {}", body))
    }

    /// Submit an article and return the created summary's id
    pub async fn create_summary(&self, token: &str, title: &str) -> Result<String> {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/summaries",
                Some(token),
                Some(json!({ "title": title, "content": format!("{} body text", title) })),
            )
            .await?;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["summary"]["id"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| anyhow::anyhow!("no summary id in {}", body))
    }
}
