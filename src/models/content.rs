//! Modelos del contenido diario
//!
//! `ContentEntry` es la forma persistida en `content:<fecha>`. Las versiones
//! anteriores guardaban el texto plano; `ContentEntry::decode` acepta ambas.

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::date::DateKey;

/// Entrada de contenido persistida
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentEntry {
    pub content: String,
    pub generated_at: DateTime<Utc>,
    pub date: DateKey,
}

/// Formas que puede tener el valor guardado
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredContent {
    Entry(ContentEntry),
    Partial(PartialEntry),
    Plain(String),
}

/// Objeto con `content` pero con metadatos ausentes o mal tipados
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartialEntry {
    content: String,
    #[serde(default)]
    generated_at: Option<serde_json::Value>,
    #[serde(default)]
    date: Option<serde_json::Value>,
}

impl ContentEntry {
    pub fn new(content: String, generated_at: DateTime<Utc>, date: DateKey) -> Self {
        Self {
            content,
            generated_at,
            date,
        }
    }

    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decodificar un valor leído de `key_date`
    ///
    /// Acepta el objeto `{content, generatedAt, date}`, un objeto con solo
    /// `content` válido, un string JSON o texto sin formato. Los metadatos
    /// que faltan toman la fecha de la clave y la medianoche UTC de esa fecha
    /// como `generated_at`. Un JSON válido sin `content` de texto, o un texto
    /// vacío, se considera ausente.
    pub fn decode(raw: &str, key_date: DateKey) -> Option<Self> {
        let value = match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => value,
            // Texto sin formato JSON escrito por versiones anteriores
            Err(_) => return Self::non_empty(Self::legacy(raw.to_string(), key_date)),
        };

        let entry = match serde_json::from_value::<StoredContent>(value).ok()? {
            StoredContent::Entry(entry) => entry,
            StoredContent::Partial(partial) => Self::from_partial(partial, key_date),
            StoredContent::Plain(text) => Self::legacy(text, key_date),
        };

        Self::non_empty(entry)
    }

    fn non_empty(entry: Self) -> Option<Self> {
        if entry.content.trim().is_empty() {
            None
        } else {
            Some(entry)
        }
    }

    fn from_partial(partial: PartialEntry, key_date: DateKey) -> Self {
        let mut entry = Self::legacy(partial.content, key_date);

        if let Some(date) = partial.date.and_then(|v| serde_json::from_value(v).ok()) {
            entry.date = date;
        }
        if let Some(generated_at) = partial
            .generated_at
            .and_then(|v| serde_json::from_value(v).ok())
        {
            entry.generated_at = generated_at;
        }
        entry
    }

    fn legacy(content: String, key_date: DateKey) -> Self {
        Self {
            content,
            generated_at: key_date.date().and_time(NaiveTime::MIN).and_utc(),
            date: key_date,
        }
    }
}

/// Cómo se obtuvo el contenido devuelto por el gate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentOutcome {
    /// La generación de hoy ya se hizo; contenido servido desde el cache
    Cached,
    /// Contenido recién generado y guardado
    Generated,
    /// El flag de hoy existe pero el contenido se perdió
    LimitReached,
    /// La política no permite generar hoy; se sirve lo último disponible
    NotScheduled,
    /// Otra petición tiene el lock de generación
    InProgress,
    /// La generación falló; se sirve contenido anterior
    Fallback,
    /// No hay contenido disponible
    Placeholder,
}

impl ContentOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            ContentOutcome::Cached => "Content already generated today, served from cache",
            ContentOutcome::Generated => "Fresh content generated and cached",
            ContentOutcome::LimitReached => "Daily generation limit reached",
            ContentOutcome::NotScheduled => "No generation scheduled today, serving latest content",
            ContentOutcome::InProgress => "Generation already in progress, serving latest content",
            ContentOutcome::Fallback => "Generation failed, serving previous content",
            ContentOutcome::Placeholder => "No content available yet",
        }
    }
}

/// Resultado del gate: siempre algo mostrable
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedContent {
    pub content: String,
    /// Fecha de la entrada servida, o hoy si es un placeholder
    pub date: DateKey,
    pub outcome: ContentOutcome,
    /// `true` si el texto viene del store
    pub from_cache: bool,
}

impl ResolvedContent {
    pub fn from_entry(entry: ContentEntry, outcome: ContentOutcome) -> Self {
        Self {
            content: entry.content,
            date: entry.date,
            outcome,
            from_cache: outcome != ContentOutcome::Generated,
        }
    }

    pub fn placeholder(
        content: impl Into<String>,
        today: DateKey,
        outcome: ContentOutcome,
    ) -> Self {
        Self {
            content: content.into(),
            date: today,
            outcome,
            from_cache: false,
        }
    }

    /// El endpoint de refresco considera éxito solo si hay contenido de hoy
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ContentOutcome::Cached | ContentOutcome::Generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> DateKey {
        DateKey::new(NaiveDate::from_ymd_opt(y, m, d).unwrap())
    }

    #[test]
    fn test_decode_structured_entry() {
        let generated_at = Utc.with_ymd_and_hms(2026, 10, 16, 3, 0, 0).unwrap();
        let entry = ContentEntry::new(
            "Sunny skies in town today.".to_string(),
            generated_at,
            date(2026, 10, 16),
        );
        let raw = entry.encode().unwrap();

        assert!(raw.contains("\"generatedAt\""));
        assert_eq!(ContentEntry::decode(&raw, date(2026, 10, 16)), Some(entry));
    }

    #[test]
    fn test_decode_legacy_json_string() {
        let decoded = ContentEntry::decode("\"Yesterday's update.\"", date(2026, 10, 15)).unwrap();

        assert_eq!(decoded.content, "Yesterday's update.");
        assert_eq!(decoded.date, date(2026, 10, 15));
        assert_eq!(decoded.generated_at, Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_decode_legacy_raw_text() {
        let decoded = ContentEntry::decode("Merhaba from Kusadasi!", date(2026, 10, 14)).unwrap();
        assert_eq!(decoded.content, "Merhaba from Kusadasi!");
    }

    #[test]
    fn test_decode_object_with_missing_metadata() {
        let decoded =
            ContentEntry::decode(r#"{"content":"Sunny.","date":"2026-10-16"}"#, date(2026, 10, 16))
                .unwrap();

        assert_eq!(decoded.content, "Sunny.");
        assert_eq!(decoded.date, date(2026, 10, 16));
        assert_eq!(decoded.generated_at, Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_decode_object_with_mistyped_metadata() {
        let raw = r#"{"content":"Ferry times.","generatedAt":12345,"date":"yesterday"}"#;
        let decoded = ContentEntry::decode(raw, date(2026, 10, 15)).unwrap();

        assert_eq!(decoded.content, "Ferry times.");
        assert_eq!(decoded.date, date(2026, 10, 15));
        assert_eq!(decoded.generated_at, Utc.with_ymd_and_hms(2026, 10, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_decode_json_without_content_is_absent() {
        assert!(ContentEntry::decode(r#"{"text":"Sunny."}"#, date(2026, 10, 16)).is_none());
        assert!(ContentEntry::decode(r#"{"content":42}"#, date(2026, 10, 16)).is_none());
    }

    #[test]
    fn test_decode_empty_is_absent() {
        assert!(ContentEntry::decode("\"\"", date(2026, 10, 14)).is_none());
        assert!(ContentEntry::decode("   ", date(2026, 10, 14)).is_none());
    }

    #[test]
    fn test_success_only_for_todays_content() {
        let today = date(2026, 10, 16);
        let limit = ResolvedContent::placeholder("x", today, ContentOutcome::LimitReached);
        assert!(!limit.is_success());

        let entry = ContentEntry::new("x".to_string(), Utc::now(), today);
        let generated = ResolvedContent::from_entry(entry, ContentOutcome::Generated);
        assert!(generated.is_success());
        assert!(!generated.from_cache);
    }
}
