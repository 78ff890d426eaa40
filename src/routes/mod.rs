use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::middleware::cors_middleware;
use crate::state::AppState;
use crate::views;

/// Configura todas las rutas de la aplicación
pub fn create_router(state: AppState) -> Router {
    let cors = cors_middleware(&state.config.cors_origins);

    Router::new()
        .route("/", get(views::page::home))
        .route("/health", get(api::health::health))
        .nest("/api", api::create_api_router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
