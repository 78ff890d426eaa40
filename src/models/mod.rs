//! Modelos de datos
//!
//! Este módulo contiene las estructuras del contenido diario y el resultado
//! del gate de generación.

pub mod content;

pub use content::{ContentEntry, ContentOutcome, ResolvedContent};
