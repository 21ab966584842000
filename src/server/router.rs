use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use std::path::Path;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::server::{
    controller::{content::get_content, health::health, job::run_job},
    state::AppState,
};

pub fn router(assets_dir: &Path) -> Router<AppState> {
    // Content is read by the site frontend from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    Router::new()
        .route("/health", get(health))
        .route("/api/content", get(get_content).layer(cors))
        .route("/api/jobs/{name}", post(run_job))
        .nest_service("/assets", ServeDir::new(assets_dir))
        .layer(TraceLayer::new_for_http())
}
