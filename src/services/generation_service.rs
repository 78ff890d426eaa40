//! Llamada de generación
//!
//! Produce un artículo con el proveedor externo. Primero con búsqueda web;
//! si falla, un único intento sin grounding con el prompt relajado y una
//! nota de que el contenido no se verificó en vivo.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::clients::{ContentGenerator, GenerationRequest};
use crate::config::ContentConfig;
use crate::utils::errors::GenerationError;

pub struct GenerationService {
    generator: Arc<dyn ContentGenerator>,
    config: Arc<ContentConfig>,
}

impl GenerationService {
    pub fn new(generator: Arc<dyn ContentGenerator>, config: Arc<ContentConfig>) -> Self {
        Self { generator, config }
    }

    /// Generar el artículo del día
    pub async fn generate_article(&self, now: DateTime<Utc>) -> Result<String, GenerationError> {
        let prompt = self.with_time(self.config.render_prompt(), now);
        let grounded = GenerationRequest::grounded(prompt);

        let grounded_error = match self.generator.generate(&grounded).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("✅ Artículo generado con grounding ({})", self.generator.provider_name());
                return Ok(text);
            }
            Ok(_) => GenerationError::EmptyResponse,
            Err(e) => e,
        };

        warn!(
            "⚠️ Generación con grounding falló ({}), reintentando sin búsqueda web",
            grounded_error
        );

        let fallback_prompt = self.with_time(self.config.render_fallback_prompt(), now);
        let fallback = GenerationRequest::ungrounded(fallback_prompt);

        match self.generator.generate(&fallback).await {
            Ok(text) if !text.trim().is_empty() => {
                info!("✅ Artículo generado sin grounding");
                Ok(format!("{}\n\n{}", text.trim_end(), self.config.unverified_note))
            }
            Ok(_) => Err(GenerationError::BothAttemptsFailed {
                grounded: grounded_error.to_string(),
                fallback: GenerationError::EmptyResponse.to_string(),
            }),
            Err(e) => Err(GenerationError::BothAttemptsFailed {
                grounded: grounded_error.to_string(),
                fallback: e.to_string(),
            }),
        }
    }

    /// Añadir la hora local actual al prompt si está activado
    fn with_time(&self, prompt: String, now: DateTime<Utc>) -> String {
        if !self.config.inject_current_time {
            return prompt;
        }
        let local = now.with_timezone(&self.config.timezone);
        format!(
            "{}\n\nCurrent local date and time in {}: {}.",
            prompt,
            self.config.timezone.name(),
            local.format("%A, %B %-d, %Y %H:%M")
        )
    }
}
