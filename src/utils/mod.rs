//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores y fechas civiles.

pub mod date;
pub mod errors;

pub use date::{civil_date, DateKey};
pub use errors::{AppError, AppResult, ConfigError, GenerationError};
