//! Application setup and router assembly.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use analysis::{Foundation, OpenAi, RateLimiter, ResponseCache};

use crate::config::Config;
use crate::server::middleware::rate_limit_middleware;
use crate::server::routes::{analyze_990_handler, health_handler, process_pdf_handler};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<dyn analysis::Ai>,
    pub text_cache: Arc<ResponseCache<String>>,
    pub analysis_cache: Arc<ResponseCache<Foundation>>,
    pub rate_limiter: Arc<RateLimiter>,
    pub config: Arc<Config>,
    pub started_at: Instant,
}

impl AppState {
    /// Build state with the OpenAI client configured from `config`.
    pub fn new(config: Config) -> Self {
        let ai = OpenAi::new(config.openai_api_key.clone())
            .with_model(config.openai_model.clone())
            .with_max_tokens(config.openai_max_tokens)
            .with_temperature(config.openai_temperature);
        Self::with_ai(config, Arc::new(ai))
    }

    /// Build state with an injected AI implementation (tests use a mock).
    pub fn with_ai(config: Config, ai: Arc<dyn analysis::Ai>) -> Self {
        Self {
            ai,
            text_cache: Arc::new(ResponseCache::new()),
            analysis_cache: Arc::new(ResponseCache::new()),
            rate_limiter: Arc::new(RateLimiter::new(
                config.rate_limit_max_requests,
                config.rate_limit_window,
            )),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}

/// Build the Axum application router
pub fn build_app(state: AppState) -> Router {
    // CORS: the browser client uploads files and polls results
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    // Leave headroom above the configured file cap for multipart framing.
    let body_limit = state.config.max_file_size + 64 * 1024;

    Router::new()
        .route("/api/process-pdf", post(process_pdf_handler))
        .route("/api/analyze-990", post(analyze_990_handler))
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
