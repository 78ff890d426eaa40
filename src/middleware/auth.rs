//! Middleware de autenticación del endpoint de refresco
//!
//! Si `REFRESH_TOKEN` está configurado, el cron externo debe enviar
//! `Authorization: Bearer <token>`. Sin token configurado el endpoint es
//! público (el gate ya es idempotente por día).

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::state::AppState;
use crate::utils::errors::AppError;

pub async fn require_refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.refresh_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let token = headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".to_string()))?;

    if token.as_bytes().ct_eq(expected.as_bytes()).unwrap_u8() == 0 {
        return Err(AppError::Unauthorized("Invalid refresh token".to_string()));
    }

    Ok(next.run(request).await)
}
