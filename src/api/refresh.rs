use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::models::ContentOutcome;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub content: String,
    pub cached: bool,
    pub message: String,
    pub date: String,
    pub outcome: ContentOutcome,
}

/// Endpoint de refresco: genera como máximo una vez por día
///
/// Lo llama un cron externo. Llamarlo varias veces el mismo día es seguro:
/// las llamadas siguientes devuelven el contenido cacheado. Siempre 200.
pub async fn refresh_content(State(state): State<AppState>) -> Json<RefreshResponse> {
    tracing::info!("🔄 Refresco de contenido solicitado");
    let resolved = state.content.resolve_content(chrono::Utc::now()).await;

    tracing::info!(
        "🔄 Refresco terminado: {:?} (fecha {})",
        resolved.outcome,
        resolved.date
    );

    Json(RefreshResponse {
        success: resolved.is_success(),
        cached: resolved.from_cache,
        message: resolved.outcome.message().to_string(),
        date: resolved.date.to_string(),
        outcome: resolved.outcome,
        content: resolved.content,
    })
}
