//! Kuşadası daily content
//!
//! Página de turismo que se renueva una vez al día: un cron externo llama a
//! `/api/refresh-content`, el gate genera el artículo con Gemini como máximo
//! una vez por fecha civil y lo guarda en Redis; la página lee siempre lo
//! último disponible sin generar.

pub mod api;
pub mod cache;
pub mod clients;
pub mod config;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;

pub use routes::create_router;
pub use state::AppState;
