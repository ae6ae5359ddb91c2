//! Face Classifier Web Server
//!
//! Single-page UI and REST API in front of the inference pipeline.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use inference_engine::{InferenceError, InferencePipeline, TensorLayout, ResizeFilter};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_governor::GovernorLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

pub mod config;
pub mod error;
pub mod html;
pub mod presentation;
pub mod rate_limit;
mod routes;

pub use config::{AppConfig, ConfigError, LogFormat, LoggingConfig, PresentationConfig};
pub use error::ApiError;
pub use rate_limit::RateLimitConfig;

/// Application state shared across handlers.
///
/// Built once at startup and never mutated afterwards.
pub struct AppState {
    /// Loaded inference pipeline
    pub pipeline: InferencePipeline,
    /// Page text and label styles
    pub presentation: PresentationConfig,
    /// Rate limiting for the classify routes
    pub rate_limit: RateLimitConfig,
    /// Largest accepted request body (bytes)
    pub max_upload_bytes: usize,
    /// Whether the pipeline serves fixed scores
    pub mock: bool,
    /// Prometheus exporter, when installed
    pub metrics: Option<PrometheusHandle>,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Create application state around an already built pipeline
    pub fn new(pipeline: InferencePipeline, config: &AppConfig) -> Self {
        Self {
            pipeline,
            presentation: config.presentation.clone(),
            rate_limit: config.rate_limit.clone(),
            max_upload_bytes: config.server.max_upload_bytes,
            mock: config.engine.mock_scores.is_some(),
            metrics: None,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }

    /// Attach the Prometheus exporter handle
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Build the pipeline named in `config`.
///
/// Fails with `ModelUnavailable` if the model cannot be loaded; no request
/// is ever served in that case.
pub fn build_pipeline(config: &AppConfig) -> Result<InferencePipeline, InferenceError> {
    match &config.engine.mock_scores {
        Some(scores) => {
            warn!("Engine running in mock mode with fixed scores {:?}", scores);
            InferencePipeline::mock(config.model.clone(), scores.clone())
        }
        None => InferencePipeline::load(config.model.clone()),
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: u64,
    pub version: String,
    pub uptime_seconds: u64,
    pub model: ModelStatus,
}

/// Loaded model details
#[derive(Debug, Serialize)]
pub struct ModelStatus {
    pub name: String,
    pub labels: Vec<String>,
    pub input_shape: [usize; 4],
    pub layout: TensorLayout,
    pub resize_filter: ResizeFilter,
    pub mock: bool,
}

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut classify = Router::new()
        .route("/classify", post(routes::classify::classify_html))
        .route("/api/v1/classify", post(routes::classify::classify_json));

    if let Some(governor) = rate_limit::create_governor_config(&state.rate_limit) {
        info!(
            "Rate limiting classify routes: burst={}, replenish every {}s",
            state.rate_limit.burst_size, state.rate_limit.per_second
        );
        classify = classify
            .layer(GovernorLayer { config: governor })
            .layer(middleware::map_response(error::json_rate_limit_response));
    } else if state.rate_limit.enabled {
        warn!("Rate limit settings unusable, classify routes are unlimited");
    }

    Router::new()
        .route("/", get(routes::page::index))
        .route("/api/v1/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .merge(classify)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(state.max_upload_bytes)),
        )
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let config = state.pipeline.config();
    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp,
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        model: ModelStatus {
            name: state.pipeline.model_name().to_string(),
            labels: state.pipeline.labels().iter().map(str::to_string).collect(),
            input_shape: config.input_shape(),
            layout: config.layout,
            resize_filter: config.resize_filter,
            mock: state.mock,
        },
    };

    Json(response)
}

/// Prometheus exposition
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Initialize logging
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level: Level = config
        .level
        .parse()
        .map_err(|_| format!("invalid log level '{}'", config.level))?;

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    match config.format {
        LogFormat::Pretty => tracing::subscriber::set_global_default(builder.finish())?,
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish())?,
    }

    Ok(())
}

/// Run the server
pub async fn run_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let pipeline = build_pipeline(&config).map_err(|e| {
        error!("Refusing to start: {}", e);
        e
    })?;

    let metrics = PrometheusBuilder::new().install_recorder()?;
    let state = Arc::new(AppState::new(pipeline, &config).with_metrics(metrics));
    let app = create_router(state);

    info!("Starting web server on {}", config.server.addr);

    let listener = tokio::net::TcpListener::bind(&config.server.addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Web server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
