use axum::{extract::State, response::Json};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ContentResponse {
    pub content: String,
    pub date: String,
}

/// Endpoint de lectura: último contenido disponible, nunca genera
pub async fn get_content(State(state): State<AppState>) -> Json<ContentResponse> {
    let resolved = state.content.latest_content(chrono::Utc::now()).await;
    tracing::debug!("📄 Contenido servido para {} ({:?})", resolved.date, resolved.outcome);

    Json(ContentResponse {
        content: resolved.content,
        date: resolved.date.to_string(),
    })
}
