//! Inspección del cache para diagnóstico
//!
//! Solo lectura. A diferencia del gate, los errores del store se propagan
//! para que el operador los vea.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::cache::CacheOperations;
use crate::models::ContentEntry;
use crate::utils::date::{civil_date, DateKey};
use chrono_tz::Tz;

const PREVIEW_CHARS: usize = 100;
const INSPECTED_DAYS: u32 = 7;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundKey {
    pub key: String,
    pub has_content: bool,
    pub content_length: usize,
    pub generated: bool,
    pub ttl_seconds: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheSnapshot {
    pub backend: &'static str,
    pub timezone: String,
    pub current_date: DateKey,
    pub today_key: String,
    pub yesterday_key: String,
    pub today_content: Option<String>,
    pub yesterday_content: Option<String>,
    pub today_generated: bool,
    pub found_keys: Vec<FoundKey>,
}

pub struct CacheInspector {
    store: Arc<dyn CacheOperations>,
    timezone: Tz,
}

impl CacheInspector {
    pub fn new(store: Arc<dyn CacheOperations>, timezone: Tz) -> Self {
        Self { store, timezone }
    }

    pub async fn snapshot(&self, now: DateTime<Utc>) -> Result<CacheSnapshot> {
        let today = civil_date(now, self.timezone);
        let yesterday = today.days_ago(1);

        let today_entry = self.read(today).await?;
        let yesterday_entry = self.read(yesterday).await?;

        let mut found_keys = Vec::new();
        for days in 0..INSPECTED_DAYS {
            let date = today.days_ago(days);
            if let Some(entry) = self.read(date).await? {
                found_keys.push(FoundKey {
                    key: date.content_key(),
                    has_content: true,
                    content_length: entry.content.chars().count(),
                    generated: self.store.exists(&date.flag_key()).await?,
                    ttl_seconds: self.store.ttl(&date.content_key()).await?,
                });
            }
        }

        Ok(CacheSnapshot {
            backend: self.store.backend_name(),
            timezone: self.timezone.name().to_string(),
            current_date: today,
            today_key: today.content_key(),
            yesterday_key: yesterday.content_key(),
            today_content: today_entry.as_ref().map(|e| preview(&e.content)),
            yesterday_content: yesterday_entry.as_ref().map(|e| preview(&e.content)),
            today_generated: self.store.exists(&today.flag_key()).await?,
            found_keys,
        })
    }

    async fn read(&self, date: DateKey) -> Result<Option<ContentEntry>> {
        Ok(self
            .store
            .get(&date.content_key())
            .await?
            .and_then(|raw| ContentEntry::decode(&raw, date)))
    }
}

/// Primeros caracteres del texto, con "..." si se corta
fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", cut)
    }
}
