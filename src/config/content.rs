//! Configuración del contenido diario
//!
//! Destino, zona horaria de referencia, TTLs, ventana de retención, prompts
//! y políticas del gate de generación.

use chrono::{DateTime, Utc, Weekday};
use chrono_tz::Tz;
use std::collections::BTreeSet;
use std::str::FromStr;

use super::environment::{optional_var, parse_var};
use crate::utils::date::local_weekday;
use crate::utils::errors::ConfigError;

pub const DEFAULT_DESTINATION: &str = "Kusadasi, Turkey";
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Istanbul;

/// 25 horas: cubre un retraso de una hora en el cron diario
pub const DEFAULT_CONTENT_TTL_SECS: u64 = 25 * 60 * 60;
/// 23 horas: expira antes que el contenido para que empiece un ciclo nuevo
pub const DEFAULT_FLAG_TTL_SECS: u64 = 23 * 60 * 60;
/// Mayor que dos intentos al proveedor con el timeout por defecto
pub const DEFAULT_LOCK_TTL_SECS: u64 = 300;

pub const DEFAULT_RETENTION_WINDOW_START: u32 = 8;
pub const DEFAULT_RETENTION_WINDOW_END: u32 = 30;
/// Días hacia atrás (después de hoy) que revisa la lectura de la página
pub const DEFAULT_LOOKBACK_DAYS: u32 = 7;

pub const DEFAULT_PROMPT_TEMPLATE: &str = "You are the {destination} tourist website and your job is to bring daily news about {destination}. \
Search for current information and write engaging daily content about {destination} tourism, events, weather, local attractions, restaurants, or cultural highlights. \
Include real-time information such as current weather, recent events, new restaurant openings, seasonal activities, or any current news about {destination}. \
Keep it fresh and interesting for visitors. Write in a friendly, informative tone. \
Only state facts you can verify from the search results; do not invent events, schedules or prices.";

pub const DEFAULT_FALLBACK_PROMPT_TEMPLATE: &str = "You are the {destination} tourist website. \
Write a short, friendly article for visitors about {destination}: seasonal activities, local attractions, food and cultural highlights. \
Stick to well-known, timeless information and do not mention specific dates, events, schedules or prices.";

pub const DEFAULT_UNVERIFIED_NOTE: &str = "Note: today's update was written without live web verification. Please confirm schedules and opening hours locally.";

pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to Kusadasi! Your daily dose of tourism updates will appear here soon. Content refreshes daily at 6 AM Turkish Time.";

pub const DEFAULT_LIMIT_REACHED_MESSAGE: &str = "Daily content limit reached. Please check back tomorrow for fresh Kusadasi updates!";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 60;

/// Política de días en los que se permite generar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationPolicy {
    Always,
    Weekdays(BTreeSet<WeekdayKey>),
}

/// `chrono::Weekday` no implementa `Ord`; se guarda por número desde el lunes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct WeekdayKey(u32);

impl From<Weekday> for WeekdayKey {
    fn from(day: Weekday) -> Self {
        Self(day.num_days_from_monday())
    }
}

impl GenerationPolicy {
    pub fn should_generate_today(&self, now: DateTime<Utc>, tz: Tz) -> bool {
        match self {
            GenerationPolicy::Always => true,
            GenerationPolicy::Weekdays(days) => {
                days.contains(&WeekdayKey::from(local_weekday(now, tz)))
            }
        }
    }
}

impl FromStr for GenerationPolicy {
    type Err = ConfigError;

    /// `always` o una lista de días separada por comas (`mon,thu`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("always") {
            return Ok(GenerationPolicy::Always);
        }

        let mut days = BTreeSet::new();
        for part in trimmed.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let day = Weekday::from_str(part).map_err(|_| ConfigError::InvalidValue {
                key: "GENERATION_DAYS",
                value: s.to_string(),
            })?;
            days.insert(WeekdayKey::from(day));
        }

        if days.is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "GENERATION_DAYS",
                value: s.to_string(),
            });
        }
        Ok(GenerationPolicy::Weekdays(days))
    }
}

/// Cómo se protege el flag de generación contra llamadas concurrentes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStrategy {
    /// Leer el flag, generar y luego escribirlo. Dos peticiones simultáneas
    /// pueden llamar ambas al proveedor.
    CheckThenSet,
    /// `SET NX` sobre `generating:<fecha>` antes de llamar al proveedor.
    /// El lock guarda un token propio y solo se libera si sigue siendo
    /// nuestro. Su TTL debe superar dos timeouts del proveedor; si expira
    /// durante la generación otra petición puede entrar.
    Lock,
}

impl FromStr for FlagStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "check-then-set" | "check_then_set" => Ok(FlagStrategy::CheckThenSet),
            "lock" | "compare-and-set" => Ok(FlagStrategy::Lock),
            _ => Err(ConfigError::InvalidValue {
                key: "GENERATION_FLAG_STRATEGY",
                value: s.to_string(),
            }),
        }
    }
}

/// Configuración del proveedor de texto (Gemini)
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout_secs: DEFAULT_PROVIDER_TIMEOUT_SECS,
        }
    }
}

/// Configuración del contenido diario
#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub destination: String,
    pub timezone: Tz,
    pub content_ttl_secs: u64,
    pub flag_ttl_secs: u64,
    pub lock_ttl_secs: u64,
    pub retention_window_start: u32,
    pub retention_window_end: u32,
    pub lookback_days: u32,
    pub prompt_template: String,
    pub fallback_prompt_template: String,
    pub unverified_note: String,
    pub inject_current_time: bool,
    pub welcome_message: String,
    pub limit_reached_message: String,
    pub policy: GenerationPolicy,
    pub flag_strategy: FlagStrategy,
    pub provider: ProviderConfig,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            destination: DEFAULT_DESTINATION.to_string(),
            timezone: DEFAULT_TIMEZONE,
            content_ttl_secs: DEFAULT_CONTENT_TTL_SECS,
            flag_ttl_secs: DEFAULT_FLAG_TTL_SECS,
            lock_ttl_secs: DEFAULT_LOCK_TTL_SECS,
            retention_window_start: DEFAULT_RETENTION_WINDOW_START,
            retention_window_end: DEFAULT_RETENTION_WINDOW_END,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
            fallback_prompt_template: DEFAULT_FALLBACK_PROMPT_TEMPLATE.to_string(),
            unverified_note: DEFAULT_UNVERIFIED_NOTE.to_string(),
            inject_current_time: true,
            welcome_message: DEFAULT_WELCOME_MESSAGE.to_string(),
            limit_reached_message: DEFAULT_LIMIT_REACHED_MESSAGE.to_string(),
            policy: GenerationPolicy::Always,
            flag_strategy: FlagStrategy::CheckThenSet,
            provider: ProviderConfig::default(),
        }
    }
}

impl ContentConfig {
    /// Leer la configuración desde variables de entorno
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let timezone = match optional_var("CONTENT_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::UnknownTimezone(name))?,
            None => defaults.timezone,
        };

        let policy = match optional_var("GENERATION_DAYS") {
            Some(value) => value.parse()?,
            None => defaults.policy,
        };

        let flag_strategy = match optional_var("GENERATION_FLAG_STRATEGY") {
            Some(value) => value.parse()?,
            None => defaults.flag_strategy,
        };

        let provider = ProviderConfig {
            api_key: optional_var("GEMINI_API_KEY").or_else(|| optional_var("GOOGLE_AI_API_KEY")),
            model: optional_var("GEMINI_MODEL").unwrap_or(defaults.provider.model),
            base_url: optional_var("GEMINI_BASE_URL").unwrap_or(defaults.provider.base_url),
            timeout_secs: parse_var("GEMINI_TIMEOUT_SECS", defaults.provider.timeout_secs)?,
        };

        let config = Self {
            destination: optional_var("DESTINATION").unwrap_or(defaults.destination),
            timezone,
            content_ttl_secs: parse_var("CONTENT_TTL_SECS", defaults.content_ttl_secs)?,
            flag_ttl_secs: parse_var("FLAG_TTL_SECS", defaults.flag_ttl_secs)?,
            lock_ttl_secs: parse_var("LOCK_TTL_SECS", defaults.lock_ttl_secs)?,
            retention_window_start: parse_var(
                "RETENTION_WINDOW_START",
                defaults.retention_window_start,
            )?,
            retention_window_end: parse_var(
                "RETENTION_WINDOW_END",
                defaults.retention_window_end,
            )?,
            lookback_days: parse_var("CONTENT_LOOKBACK_DAYS", defaults.lookback_days)?,
            prompt_template: optional_var("PROMPT_TEMPLATE").unwrap_or(defaults.prompt_template),
            fallback_prompt_template: optional_var("FALLBACK_PROMPT_TEMPLATE")
                .unwrap_or(defaults.fallback_prompt_template),
            unverified_note: optional_var("UNVERIFIED_NOTE").unwrap_or(defaults.unverified_note),
            inject_current_time: parse_var("INJECT_CURRENT_TIME", defaults.inject_current_time)?,
            welcome_message: optional_var("WELCOME_MESSAGE").unwrap_or(defaults.welcome_message),
            limit_reached_message: optional_var("LIMIT_REACHED_MESSAGE")
                .unwrap_or(defaults.limit_reached_message),
            policy,
            flag_strategy,
            provider,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validar rangos que no se pueden expresar con tipos
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retention_window_start == 0
            || self.retention_window_start > self.retention_window_end
        {
            return Err(ConfigError::InvalidValue {
                key: "RETENTION_WINDOW_START",
                value: format!("{}..={}", self.retention_window_start, self.retention_window_end),
            });
        }
        if self.content_ttl_secs == 0 || self.flag_ttl_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "CONTENT_TTL_SECS",
                value: format!("content={} flag={}", self.content_ttl_secs, self.flag_ttl_secs),
            });
        }
        // Dos intentos (con y sin búsqueda) deben caber dentro del lock
        let worst_case_secs = self.provider.timeout_secs.saturating_mul(2);
        if self.flag_strategy == FlagStrategy::Lock && self.lock_ttl_secs <= worst_case_secs {
            return Err(ConfigError::InvalidValue {
                key: "LOCK_TTL_SECS",
                value: format!(
                    "{} (must exceed 2 x GEMINI_TIMEOUT_SECS = {})",
                    self.lock_ttl_secs, worst_case_secs
                ),
            });
        }
        if self.flag_ttl_secs >= self.content_ttl_secs {
            tracing::warn!(
                "⚠️ FLAG_TTL_SECS ({}) no es menor que CONTENT_TTL_SECS ({})",
                self.flag_ttl_secs,
                self.content_ttl_secs
            );
        }
        Ok(())
    }

    /// Prompt principal (con búsqueda web) para el destino configurado
    pub fn render_prompt(&self) -> String {
        self.prompt_template.replace("{destination}", &self.destination)
    }

    /// Prompt relajado para el intento sin búsqueda web
    pub fn render_fallback_prompt(&self) -> String {
        self.fallback_prompt_template.replace("{destination}", &self.destination)
    }

    pub fn should_generate_today(&self, now: DateTime<Utc>) -> bool {
        self.policy.should_generate_today(now, self.timezone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("always".parse::<GenerationPolicy>().unwrap(), GenerationPolicy::Always);

        let policy: GenerationPolicy = "mon, thu".parse().unwrap();
        match policy {
            GenerationPolicy::Weekdays(days) => {
                assert!(days.contains(&WeekdayKey::from(Weekday::Mon)));
                assert!(days.contains(&WeekdayKey::from(Weekday::Thu)));
                assert_eq!(days.len(), 2);
            }
            other => panic!("unexpected policy: {:?}", other),
        }

        assert!("".parse::<GenerationPolicy>().is_err());
        assert!("funday".parse::<GenerationPolicy>().is_err());
    }

    #[test]
    fn test_weekday_policy_uses_local_weekday() {
        let policy: GenerationPolicy = "mon".parse().unwrap();
        // Domingo 22:00 UTC ya es lunes 01:00 en Estambul
        let sunday_night_utc = Utc.with_ymd_and_hms(2026, 10, 11, 22, 0, 0).unwrap();

        assert!(policy.should_generate_today(sunday_night_utc, chrono_tz::Europe::Istanbul));
        assert!(!policy.should_generate_today(sunday_night_utc, chrono_tz::UTC));
    }

    #[test]
    fn test_flag_strategy_parsing() {
        assert_eq!("lock".parse::<FlagStrategy>().unwrap(), FlagStrategy::Lock);
        assert_eq!("check-then-set".parse::<FlagStrategy>().unwrap(), FlagStrategy::CheckThenSet);
        assert!("maybe".parse::<FlagStrategy>().is_err());
    }

    #[test]
    fn test_prompts_only_depend_on_destination() {
        let config = ContentConfig {
            destination: "Ephesus".to_string(),
            ..ContentConfig::default()
        };

        let prompt = config.render_prompt();
        assert!(prompt.contains("Ephesus"));
        assert!(!prompt.contains("{destination}"));
        assert!(config.render_fallback_prompt().contains("Ephesus"));
    }

    #[test]
    fn test_validate_rejects_inverted_retention_window() {
        let config = ContentConfig {
            retention_window_start: 31,
            retention_window_end: 30,
            ..ContentConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(ContentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_lock_shorter_than_two_provider_timeouts() {
        let mut config = ContentConfig {
            flag_strategy: FlagStrategy::Lock,
            lock_ttl_secs: 120,
            ..ContentConfig::default()
        };
        config.provider.timeout_secs = 60;
        assert!(config.validate().is_err());

        config.lock_ttl_secs = 121;
        assert!(config.validate().is_ok());

        // Sin lock el TTL no importa
        config.flag_strategy = FlagStrategy::CheckThenSet;
        config.lock_ttl_secs = 1;
        assert!(config.validate().is_ok());

        let defaults = ContentConfig {
            flag_strategy: FlagStrategy::Lock,
            ..ContentConfig::default()
        };
        assert!(defaults.validate().is_ok());
    }
}
