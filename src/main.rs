use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use kusadasi_daily::cache::{CacheConfig, CacheOperations, MemoryStore, RedisClient};
use kusadasi_daily::clients::{ContentGenerator, GeminiClient, UnconfiguredGenerator};
use kusadasi_daily::config::{ContentConfig, EnvironmentConfig};
use kusadasi_daily::{create_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏖️ Kuşadası Daily Content");
    info!("================================================");

    let env_config = EnvironmentConfig::from_env()?;
    let content_config = ContentConfig::from_env()?;

    info!(
        "🌍 Destino: {} (zona horaria: {})",
        content_config.destination,
        content_config.timezone.name()
    );
    info!(
        "⚙️ Estrategia del flag: {:?}, política: {:?}",
        content_config.flag_strategy, content_config.policy
    );

    // Inicializar store
    let store: Arc<dyn CacheOperations> = match &env_config.redis_url {
        Some(url) => match RedisClient::new(CacheConfig::with_url(url.clone())).await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                error!("❌ Error conectando a Redis: {}", e);
                return Err(anyhow::anyhow!("Error de Redis: {}", e));
            }
        },
        None => {
            warn!("⚠️ REDIS_URL no configurado, usando store en memoria");
            Arc::new(MemoryStore::new())
        }
    };

    // Inicializar proveedor de generación
    let generator: Arc<dyn ContentGenerator> = match GeminiClient::new(&content_config.provider) {
        Ok(client) => {
            info!("🤖 Gemini configurado (modelo: {})", content_config.provider.model);
            Arc::new(client)
        }
        Err(e) => {
            warn!("⚠️ Generación deshabilitada: {}", e);
            Arc::new(UnconfiguredGenerator::new(e.to_string()))
        }
    };

    if env_config.refresh_token.is_none() {
        warn!("⚠️ REFRESH_TOKEN no configurado, /api/refresh-content es público");
    }

    let addr: SocketAddr = env_config.server_url().parse()?;
    let app = create_router(AppState::new(env_config, content_config, store, generator));

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  / - Página con el contenido del día");
    info!("   GET  /health - Health check");
    info!("   GET  /api/content - Último contenido (sin generar)");
    info!("   GET|POST /api/refresh-content - Generación diaria idempotente");
    info!("   GET  /api/debug-cache - Diagnóstico del cache");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            e
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
