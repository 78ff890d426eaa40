//! API endpoints
//!
//! Este módulo contiene los endpoints JSON: lectura del contenido, refresco
//! diario, diagnóstico del cache y health check.

pub mod content;
pub mod debug_cache;
pub mod health;
pub mod refresh;

use axum::{
    middleware::from_fn_with_state,
    routing::get,
    Router,
};

use crate::middleware::auth::require_refresh_token;
use crate::state::AppState;

/// Crear el router de la API
pub fn create_api_router(state: AppState) -> Router<AppState> {
    let refresh = Router::new()
        .route(
            "/refresh-content",
            get(refresh::refresh_content).post(refresh::refresh_content),
        )
        .route_layer(from_fn_with_state(state, require_refresh_token));

    Router::new()
        .route("/content", get(content::get_content))
        .route("/debug-cache", get(debug_cache::debug_cache))
        .merge(refresh)
}
