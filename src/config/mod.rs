//! Configuración del proyecto
//!
//! Este módulo contiene la configuración del servidor y la del contenido
//! diario (TTLs, retención, prompts, políticas).

pub mod content;
pub mod environment;

pub use content::{ContentConfig, FlagStrategy, GenerationPolicy, ProviderConfig};
pub use environment::EnvironmentConfig;
