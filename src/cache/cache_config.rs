//! Configuración de cache
//!
//! Este módulo contiene la configuración de la conexión a Redis.

use serde::{Deserialize, Serialize};

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub redis_url: String,
    /// Timeout de cada comando, en segundos
    pub command_timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            command_timeout_secs: 5,
        }
    }
}

impl CacheConfig {
    pub fn with_url(redis_url: impl Into<String>) -> Self {
        Self {
            redis_url: redis_url.into(),
            ..Self::default()
        }
    }
}
