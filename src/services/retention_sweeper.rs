//! Limpieza de contenido antiguo
//!
//! Complementa los TTL: después de cada generación borra `content:<fecha>`
//! para cada día de la ventana de retención (por defecto del día 8 al 30
//! antes de hoy). Los borrados son idempotentes y best-effort.

use futures::future::join_all;
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::CacheOperations;
use crate::utils::date::DateKey;

/// Resultado de una pasada de limpieza
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub attempted: usize,
    pub failed: usize,
}

pub struct RetentionSweeper {
    store: Arc<dyn CacheOperations>,
    window_start: u32,
    window_end: u32,
}

impl RetentionSweeper {
    pub fn new(store: Arc<dyn CacheOperations>, window_start: u32, window_end: u32) -> Self {
        Self {
            store,
            window_start,
            window_end,
        }
    }

    /// Claves a borrar para `today`
    pub fn expired_keys(&self, today: DateKey) -> Vec<String> {
        (self.window_start..=self.window_end)
            .map(|days| today.days_ago(days).content_key())
            .collect()
    }

    /// Borrar las entradas fuera de la ventana de retención
    pub async fn sweep(&self, today: DateKey) -> SweepReport {
        let keys = self.expired_keys(today);

        let results = join_all(keys.iter().map(|key| self.store.delete(key))).await;

        let mut report = SweepReport {
            attempted: keys.len(),
            failed: 0,
        };
        for (key, result) in keys.iter().zip(results) {
            if let Err(e) = result {
                report.failed += 1;
                warn!("⚠️ No se pudo borrar {}: {:#}", key, e);
            }
        }

        info!(
            "🧹 Limpieza de contenido antiguo: {} claves, {} errores",
            report.attempted, report.failed
        );
        report
    }
}
