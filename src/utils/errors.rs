//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del sistema y su conversión
//! a respuestas HTTP. Solo los endpoints de diagnóstico y administración
//! devuelven errores al cliente; la página y el gate siempre degradan.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores de la API (endpoints de operador)
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Cache store error: {0}")]
    Store(#[from] anyhow::Error),

    #[error("Template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

/// Errores del proveedor de generación de texto
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned status {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Provider returned no text")]
    EmptyResponse,

    #[error("Generation provider is not configured: {0}")]
    NotConfigured(String),

    #[error("Grounded and fallback attempts failed: {grounded}; {fallback}")]
    BothAttemptsFailed { grounded: String, fallback: String },
}

/// Errores al leer la configuración del entorno
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Unknown timezone: {0}")]
    UnknownTimezone(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Unauthorized(msg) => {
                tracing::warn!("🔒 Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: "Unauthorized".to_string(),
                        message: msg,
                        details: None,
                        code: Some("UNAUTHORIZED".to_string()),
                    },
                )
            }

            AppError::Store(e) => {
                tracing::error!("❌ Cache store error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Cache Store Error".to_string(),
                        message: "An error occurred while accessing the cache store".to_string(),
                        details: Some(json!({ "store_error": format!("{:#}", e) })),
                        code: Some("STORE_ERROR".to_string()),
                    },
                )
            }

            AppError::Render(e) => {
                tracing::error!("❌ Template rendering error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "Template rendering failed".to_string(),
                        details: None,
                        code: Some("RENDER_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_maps_to_500() {
        let response = AppError::Store(anyhow::anyhow!("connection refused")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_render_error_maps_to_500() {
        let response = AppError::from(askama::Error::from(std::fmt::Error)).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_maps_to_401() {
        let response = AppError::Unauthorized("missing token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
