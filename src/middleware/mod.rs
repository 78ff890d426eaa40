//! Middleware del sistema
//!
//! Este módulo contiene el middleware de CORS y la protección del
//! endpoint de refresco.

pub mod auth;
pub mod cors;

pub use auth::require_refresh_token;
pub use cors::cors_middleware;
