//! Browser UI and JSON endpoints.

mod form;
mod handlers;
mod page;

pub use form::{FormRejection, Upload, UploadForm};
pub use handlers::{RecipeRequest, RecipeResponse};
pub use page::{render_page, PageView};

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::ServerConfig;
use crate::pipeline::FlavorPipeline;

/// Shared error response used by all JSON endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<FlavorPipeline>,
}

impl AppState {
    pub fn new(pipeline: FlavorPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

pub fn create_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/analyze", post(handlers::analyze_page))
        .route("/api/analyze", post(handlers::analyze_json))
        .route("/api/recipe", post(handlers::recipe_json))
        .route("/health", get(handlers::health_check))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Bind and serve until the process is stopped
pub async fn serve(pipeline: FlavorPipeline, config: &ServerConfig) -> std::io::Result<()> {
    info!("Using '{}' ingredient extractor", pipeline.extractor_name());
    let app = create_router(AppState::new(pipeline), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind.as_str()).await?;
    info!("FlavorAI listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await
}
