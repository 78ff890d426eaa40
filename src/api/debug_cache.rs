use axum::{extract::State, response::Json};

use crate::services::CacheSnapshot;
use crate::state::AppState;
use crate::utils::errors::AppResult;

/// Endpoint de diagnóstico: qué claves de contenido existen
///
/// Sin efectos secundarios. Los errores del store se devuelven tal cual.
pub async fn debug_cache(State(state): State<AppState>) -> AppResult<Json<CacheSnapshot>> {
    let snapshot = state.inspector.snapshot(chrono::Utc::now()).await?;
    tracing::debug!("🔍 Diagnóstico de cache: {} claves", snapshot.found_keys.len());
    Ok(Json(snapshot))
}
