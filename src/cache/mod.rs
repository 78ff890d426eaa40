//! Cache
//!
//! Este módulo contiene el store clave-valor donde vive el contenido diario.
//! El gate solo conoce el trait `CacheOperations`; Redis y el store en
//! memoria son intercambiables.

pub mod cache_config;
pub mod memory_store;
pub mod redis_client;

pub use cache_config::CacheConfig;
pub use memory_store::MemoryStore;
pub use redis_client::RedisClient;

use anyhow::Result;

/// Operaciones de cache (get / set con TTL / delete)
///
/// Los valores son texto; el formato de cada clave lo decide quien la escribe.
/// Las implementaciones devuelven los errores del backend; el gate decide
/// cómo degradar.
#[async_trait::async_trait]
pub trait CacheOperations: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()>;

    /// Compare-and-set: escribe solo si la clave no existe. Devuelve `true`
    /// si la escritura se hizo.
    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool>;

    /// Borrar una clave inexistente no es un error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Borra la clave solo si su valor sigue siendo `expected`, de forma
    /// atómica. Devuelve `true` si se borró.
    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool>;

    async fn exists(&self, key: &str) -> Result<bool>;

    /// Segundos restantes, `None` si la clave no existe o no expira
    async fn ttl(&self, key: &str) -> Result<Option<u64>>;

    /// Verificar si el backend responde
    async fn ping(&self) -> bool;

    /// Nombre del backend para logs y diagnóstico
    fn backend_name(&self) -> &'static str;
}
