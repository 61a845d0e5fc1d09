use axum::routing::{get, post};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SCREENSHOT_URL_PREFIX;
use crate::state::SharedState;

pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let screenshots = ServeDir::new(&state.config.screenshot_dir);

    Router::new()
        // Health
        .route("/health", get(crate::routes::health::health))
        // Analysis
        .route("/api/analyze", post(crate::routes::analyze::analyze))
        // Stored screenshots
        .nest_service(SCREENSHOT_URL_PREFIX, screenshots)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
