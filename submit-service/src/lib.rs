pub mod error;
pub mod handler;
pub mod state;
pub mod store;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use error::ApiError;
pub use state::AppState;
pub use store::{AirtableFields, AirtableStore, RecordStore};

pub const SUBMIT_PATH: &str = "/api/submit";

/// API routes only.
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route(SUBMIT_PATH, post(handler::submit_handler))
        .route("/api/config", get(handler::config_handler))
        .route("/health", get(handler::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes plus the form page served from `static_dir`.
pub fn app(state: AppState, static_dir: &str) -> Router {
    api_router(state).fallback_service(ServeDir::new(static_dir))
}
