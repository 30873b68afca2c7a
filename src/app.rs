use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::database::{SummaryStore, UserStore};
use crate::handlers::{protected, public};
use crate::middleware::jwt_auth_middleware;
use crate::services::{AuthService, Summarizer, SummaryService};

/// Everything a handler may reach; cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub auth: AuthService,
    pub summaries: SummaryService,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        auth: AuthService,
        store: Arc<dyn SummaryStore>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            auth,
            summaries: SummaryService::new(store, summarizer),
        }
    }

    /// Wire a single backing store into both the user and summary seams.
    pub fn with_store<S>(
        config: AppConfig,
        store: Arc<S>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self, crate::auth::JwtError>
    where
        S: SummaryStore + UserStore + 'static,
    {
        let keys = crate::auth::JwtKeys::new(&config.security)?;
        let auth = AuthService::new(store.clone(), keys);
        Ok(Self::new(config, auth, store, summarizer))
    }
}

pub fn app(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Public
        .route("/health", get(public::health))
        .merge(auth_public_routes())
        // Protected
        .merge(summary_routes(state.clone()))
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use public::auth;

    Router::new()
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
}

fn summary_routes(state: AppState) -> Router<AppState> {
    use protected::summaries;

    Router::new()
        .route(
            "/api/summaries",
            get(summaries::summary_list).post(summaries::summary_create),
        )
        .route(
            "/api/summaries/:id",
            get(summaries::summary_show)
                .put(summaries::summary_update)
                .delete(summaries::summary_delete),
        )
        .route_layer(axum::middleware::from_fn_with_state(
            state,
            jwt_auth_middleware,
        ))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.is_development() && config.security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
