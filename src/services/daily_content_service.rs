//! Gate de generación diaria
//!
//! Decide en cada petición si servir el cache, servir el contenido de ayer,
//! llamar al proveedor (de pago) o devolver un placeholder. Como máximo una
//! generación por fecha civil: el flag `generated:<fecha>` se consulta antes
//! de cada intento y se escribe después de cada éxito.
//!
//! Con `FlagStrategy::CheckThenSet` la secuencia leer flag / generar /
//! escribir flag no es atómica: dos peticiones simultáneas pueden llamar
//! ambas al proveedor y la última escritura del contenido gana.
//! `FlagStrategy::Lock` cierra esa carrera con `SET NX` sobre
//! `generating:<fecha>`.
//!
//! Ninguna operación pública devuelve error: siempre hay algo que mostrar.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::generation_service::GenerationService;
use super::retention_sweeper::RetentionSweeper;
use crate::cache::CacheOperations;
use crate::clients::ContentGenerator;
use crate::config::{ContentConfig, FlagStrategy};
use crate::models::{ContentEntry, ContentOutcome, ResolvedContent};
use crate::utils::date::{civil_date, DateKey};

const FLAG_VALUE: &str = "true";

pub struct DailyContentService {
    store: Arc<dyn CacheOperations>,
    generation: GenerationService,
    sweeper: RetentionSweeper,
    config: Arc<ContentConfig>,
}

impl DailyContentService {
    pub fn new(
        store: Arc<dyn CacheOperations>,
        generator: Arc<dyn ContentGenerator>,
        config: Arc<ContentConfig>,
    ) -> Self {
        let sweeper = RetentionSweeper::new(
            store.clone(),
            config.retention_window_start,
            config.retention_window_end,
        );

        Self {
            store,
            generation: GenerationService::new(generator, config.clone()),
            sweeper,
            config,
        }
    }

    pub fn config(&self) -> &ContentConfig {
        &self.config
    }

    /// Fecha civil de `now` en la zona horaria del servicio
    pub fn today(&self, now: DateTime<Utc>) -> DateKey {
        civil_date(now, self.config.timezone)
    }

    /// Resolver el contenido del día, generando si hace falta
    pub async fn resolve_content(&self, now: DateTime<Utc>) -> ResolvedContent {
        let today = self.today(now);

        let flag_set = match self.store.exists(&today.flag_key()).await {
            Ok(exists) => exists,
            Err(e) => {
                // Sin saber si ya se generó hoy no se llama al proveedor
                warn!("⚠️ No se pudo leer el flag de {}: {:#}", today, e);
                return self.stale_or_placeholder(today, ContentOutcome::Fallback).await;
            }
        };

        match (flag_set, self.read_entry(today).await) {
            (true, Some(entry)) => {
                info!("📥 Contenido de {} servido desde cache", today);
                return ResolvedContent::from_entry(entry, ContentOutcome::Cached);
            }
            (true, None) => {
                warn!("⚠️ Flag de {} presente sin contenido, no se regenera", today);
                return self.limit_reached(today);
            }
            (false, Some(entry)) => {
                // El contenido es inmutable: se restaura el flag en vez de regenerar
                warn!("⚠️ Contenido de {} sin flag, restaurando flag", today);
                self.write_flag(today).await;
                return ResolvedContent::from_entry(entry, ContentOutcome::Cached);
            }
            (false, None) => {}
        }

        if !self.config.should_generate_today(now) {
            info!("📅 La política no permite generar el {}", today);
            let mut latest = self.latest_content(now).await;
            latest.outcome = ContentOutcome::NotScheduled;
            return latest;
        }

        let lock_token = match self.config.flag_strategy {
            FlagStrategy::CheckThenSet => None,
            FlagStrategy::Lock => {
                let token = Uuid::new_v4().to_string();
                match self
                    .store
                    .set_if_absent(&today.lock_key(), &token, self.config.lock_ttl_secs)
                    .await
                {
                    Ok(true) => Some(token),
                    Ok(false) => {
                        info!("🔐 Generación de {} ya en curso en otra petición", today);
                        return self.stale_or_placeholder(today, ContentOutcome::InProgress).await;
                    }
                    Err(e) => {
                        warn!("⚠️ No se pudo tomar el lock de {}: {:#}", today, e);
                        return self.stale_or_placeholder(today, ContentOutcome::Fallback).await;
                    }
                }
            }
        };

        if let Some(token) = &lock_token {
            // Otra petición pudo terminar y soltar el lock después de nuestra lectura del flag
            if let Some(done) = self.completed_meanwhile(today).await {
                self.release_lock(today, token).await;
                return done;
            }
        }

        info!("🤖 Generando contenido para {}", today);
        let result = self.generation.generate_article(now).await;

        let resolved = match result {
            Ok(text) => {
                let entry = ContentEntry::new(text, now, today);
                self.persist(&entry).await;
                self.sweeper.sweep(today).await;
                ResolvedContent::from_entry(entry, ContentOutcome::Generated)
            }
            Err(e) => {
                // Sin flag: una llamada posterior puede reintentar
                error!("❌ Error generando contenido para {}: {}", today, e);
                self.stale_or_placeholder(today, ContentOutcome::Fallback).await
            }
        };

        if let Some(token) = &lock_token {
            self.release_lock(today, token).await;
        }

        resolved
    }

    /// Último contenido disponible, sin generar nunca
    ///
    /// Hoy, ayer y luego hasta `lookback_days` días hacia atrás.
    pub async fn latest_content(&self, now: DateTime<Utc>) -> ResolvedContent {
        let today = self.today(now);

        for days in 0..=self.config.lookback_days {
            let date = today.days_ago(days);
            if let Some(entry) = self.read_entry(date).await {
                let outcome = if days == 0 {
                    ContentOutcome::Cached
                } else {
                    ContentOutcome::Fallback
                };
                return ResolvedContent::from_entry(entry, outcome);
            }
        }

        ResolvedContent::placeholder(
            self.config.welcome_message.clone(),
            today,
            ContentOutcome::Placeholder,
        )
    }

    /// Leer y decodificar la entrada de una fecha; los errores cuentan como ausencia
    async fn read_entry(&self, date: DateKey) -> Option<ContentEntry> {
        match self.store.get(&date.content_key()).await {
            Ok(Some(raw)) => ContentEntry::decode(&raw, date),
            Ok(None) => None,
            Err(e) => {
                warn!("⚠️ Error leyendo contenido de {}: {:#}", date, e);
                None
            }
        }
    }

    /// Contenido de hoy o de ayer, o el mensaje de bienvenida
    ///
    /// `found` es el resultado cuando hay contenido; sin contenido el
    /// placeholder conserva `InProgress` y cualquier otro caso es `Placeholder`.
    async fn stale_or_placeholder(
        &self,
        today: DateKey,
        found: ContentOutcome,
    ) -> ResolvedContent {
        for date in [today, today.days_ago(1)] {
            if let Some(entry) = self.read_entry(date).await {
                return ResolvedContent::from_entry(entry, found);
            }
        }

        let missing = match found {
            ContentOutcome::InProgress => ContentOutcome::InProgress,
            _ => ContentOutcome::Placeholder,
        };
        ResolvedContent::placeholder(self.config.welcome_message.clone(), today, missing)
    }

    fn limit_reached(&self, today: DateKey) -> ResolvedContent {
        ResolvedContent::placeholder(
            self.config.limit_reached_message.clone(),
            today,
            ContentOutcome::LimitReached,
        )
    }

    /// Revisar flag y contenido otra vez con el lock tomado
    async fn completed_meanwhile(&self, today: DateKey) -> Option<ResolvedContent> {
        let flag_set = match self.store.exists(&today.flag_key()).await {
            Ok(exists) => exists,
            Err(e) => {
                warn!("⚠️ No se pudo releer el flag de {}: {:#}", today, e);
                return Some(self.stale_or_placeholder(today, ContentOutcome::Fallback).await);
            }
        };

        match (flag_set, self.read_entry(today).await) {
            (_, Some(entry)) => {
                info!("📥 Contenido de {} generado por otra petición", today);
                Some(ResolvedContent::from_entry(entry, ContentOutcome::Cached))
            }
            (true, None) => Some(self.limit_reached(today)),
            (false, None) => None,
        }
    }

    /// Soltar el lock solo si todavía guarda nuestro token
    async fn release_lock(&self, today: DateKey, token: &str) {
        match self.store.delete_if_equals(&today.lock_key(), token).await {
            Ok(true) => {}
            Ok(false) => warn!("⚠️ El lock de {} expiró o pertenece a otra petición", today),
            Err(e) => warn!("⚠️ No se pudo liberar el lock de {}: {:#}", today, e),
        }
    }

    async fn persist(&self, entry: &ContentEntry) {
        match entry.encode() {
            Ok(raw) => {
                if let Err(e) = self
                    .store
                    .set(&entry.date.content_key(), &raw, self.config.content_ttl_secs)
                    .await
                {
                    error!("❌ No se pudo guardar el contenido de {}: {:#}", entry.date, e);
                }
            }
            Err(e) => error!("❌ No se pudo serializar el contenido de {}: {}", entry.date, e),
        }

        // El flag se escribe aunque falle el contenido: no se vuelve a pagar hoy
        self.write_flag(entry.date).await;
        info!("💾 Contenido de {} guardado", entry.date);
    }

    async fn write_flag(&self, date: DateKey) {
        if let Err(e) = self
            .store
            .set(&date.flag_key(), FLAG_VALUE, self.config.flag_ttl_secs)
            .await
        {
            error!("❌ No se pudo guardar el flag de {}: {:#}", date, e);
        }
    }
}
