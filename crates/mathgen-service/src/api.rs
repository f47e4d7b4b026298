//! HTTP API for question generation.
//!
//! # Endpoints
//!
//! - `GET /` - Service banner
//! - `POST /api/generate-math-questions` - Generate a batch of questions
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use mathgen_client::ChatCompletionClient;
//! use mathgen_service::{create_router, AppState, Config, Pipeline};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let client = ChatCompletionClient::new(config.provider_settings()?);
//! let state = AppState::new(config, Pipeline::new(Arc::new(client)));
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8000").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use mathgen_core::{GenerateRequest, QuestionBatch};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, warn};

use crate::{Config, MathGenError, Pipeline};

/// Banner returned by `GET /`.
pub const SERVICE_BANNER: &str = "Math Question Generator API";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response body for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    /// Service banner.
    pub message: String,
}

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub detail: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Config,
    /// Generation pipeline shared by all requests.
    pub pipeline: Pipeline,
}

impl AppState {
    /// Creates a new `AppState`.
    #[must_use]
    pub const fn new(config: Config, pipeline: Pipeline) -> Self {
        Self { config, pipeline }
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The request body could not be decoded.
    Body(JsonRejection),
    /// The pipeline failed.
    Generation(MathGenError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Body(rejection)
    }
}

impl From<MathGenError> for ApiError {
    fn from(err: MathGenError) -> Self {
        Self::Generation(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Body(rejection) => (rejection.status(), rejection.body_text()),
            Self::Generation(err) => (status_for(&err), err.to_string()),
        };

        if status.is_server_error() {
            error!(status = status.as_u16(), detail = %message, "Question generation failed");
        } else {
            warn!(status = status.as_u16(), detail = %message, "Rejected generation request");
        }

        let body = Json(ErrorResponse { detail: message });
        (status, body).into_response()
    }
}

/// HTTP status for a pipeline failure.
fn status_for(err: &MathGenError) -> StatusCode {
    match err {
        MathGenError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        MathGenError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        _ if err.is_upstream_error() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all API endpoints.
///
/// The router carries permissive CORS for browser frontends and request
/// tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new().route("/generate-math-questions", post(handle_generate));

    Router::new()
        .route("/", get(handle_root))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `GET /`.
async fn handle_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_BANNER.to_string(),
    })
}

/// Handler for `POST /api/generate-math-questions`.
///
/// Runs the pipeline under the configured deadline.
async fn handle_generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<QuestionBatch>, ApiError> {
    let Json(request) = payload?;

    let deadline = state.config.timeout_duration();
    let batch = tokio::time::timeout(deadline, state.pipeline.generate(&request))
        .await
        .map_err(|_| MathGenError::timeout(deadline.as_secs()))??;

    Ok(Json(batch))
}
