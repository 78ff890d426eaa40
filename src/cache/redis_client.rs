use anyhow::{anyhow, Result};
use redis::{aio::ConnectionManager, AsyncCommands};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{CacheConfig, CacheOperations};

// GET + DEL en un solo paso para no borrar un valor escrito por otro
const DELETE_IF_EQUALS_SCRIPT: &str = r#"
if redis.call("GET", KEYS[1]) == ARGV[1] then
    return redis.call("DEL", KEYS[1])
end
return 0
"#;

/// Cliente Redis con connection manager y operaciones async
#[derive(Clone)]
pub struct RedisClient {
    manager: ConnectionManager,
    config: CacheConfig,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(config: CacheConfig) -> Result<Self> {
        info!("🔗 Conectando a Redis: {}", redact_url(&config.redis_url));

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self { manager, config })
    }

    /// Ejecutar un comando con el timeout configurado
    async fn with_timeout<T, F>(&self, key: &str, op: &'static str, fut: F) -> Result<T>
    where
        F: Future<Output = redis::RedisResult<T>>,
    {
        let timeout = Duration::from_secs(self.config.command_timeout_secs);
        match tokio::time::timeout(timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!("⚠️ Error de Redis en {} para clave {}: {}", op, key, e);
                Err(anyhow!("Redis {} failed for {}: {}", op, key, e))
            }
            Err(_) => {
                warn!("⏰ Timeout de Redis en {} para clave {}", op, key);
                Err(anyhow!("Redis {} timed out for {}", op, key))
            }
        }
    }
}

#[async_trait::async_trait]
impl CacheOperations for RedisClient {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.manager.clone();
        let value: Option<String> = self.with_timeout(key, "GET", conn.get(key)).await?;

        match &value {
            Some(_) => debug!("📥 Cache HIT para clave: {}", key),
            None => debug!("❌ Cache MISS para clave: {}", key),
        }
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) -> Result<()> {
        let mut conn = self.manager.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("EX").arg(ttl_secs);

        let _: () = self.with_timeout(key, "SET", cmd.query_async(&mut conn)).await?;
        debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl_secs);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: &str, ttl_secs: u64) -> Result<bool> {
        let mut conn = self.manager.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(key).arg(value).arg("NX").arg("EX").arg(ttl_secs);

        let reply: Option<String> = self
            .with_timeout(key, "SET NX", cmd.query_async(&mut conn))
            .await?;
        let acquired = reply.is_some();
        debug!("🔐 Cache SET NX para clave: {} -> {}", key, acquired);
        Ok(acquired)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.manager.clone();
        let count: i64 = self.with_timeout(key, "DEL", conn.del(key)).await?;
        debug!("🗑️ Cache DELETE para clave: {} (eliminados: {})", key, count);
        Ok(())
    }

    async fn delete_if_equals(&self, key: &str, expected: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let script = redis::Script::new(DELETE_IF_EQUALS_SCRIPT);
        let mut invocation = script.key(key);
        invocation.arg(expected);

        let removed: i64 = self
            .with_timeout(key, "EVAL", invocation.invoke_async(&mut conn))
            .await?;
        debug!("🗑️ Cache DELETE condicional para clave: {} -> {}", key, removed == 1);
        Ok(removed == 1)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.manager.clone();
        let exists: bool = self.with_timeout(key, "EXISTS", conn.exists(key)).await?;
        debug!("🔍 Cache EXISTS para clave {}: {}", key, exists);
        Ok(exists)
    }

    async fn ttl(&self, key: &str) -> Result<Option<u64>> {
        let mut conn = self.manager.clone();
        let ttl: i64 = self.with_timeout(key, "TTL", conn.ttl(key)).await?;

        // -2: no existe, -1: sin expiración
        if ttl > 0 {
            debug!("⏰ Cache TTL para clave {}: {}s", key, ttl);
            Ok(Some(ttl as u64))
        } else {
            Ok(None)
        }
    }

    async fn ping(&self) -> bool {
        let mut conn = self.manager.clone();
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) => response == "PONG",
            Err(_) => false,
        }
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }
}

/// Ocultar la contraseña de la URL de Redis en los logs
fn redact_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
