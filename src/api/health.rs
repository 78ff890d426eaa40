use axum::{extract::State, response::Json};
use serde_json::json;

use crate::state::AppState;

/// Health check simple
pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let store_ok = state.store.ping().await;

    Json(json!({
        "status": if store_ok { "ok" } else { "degraded" },
        "store": {
            "backend": state.store.backend_name(),
            "connected": store_ok,
        },
        "environment": state.config.environment,
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
