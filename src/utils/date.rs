//! Manejo de fechas civiles
//!
//! Todas las claves del cache se derivan de la fecha civil en la zona horaria
//! de referencia del servicio. Nunca se lee el reloj dentro de este módulo:
//! el instante `now` siempre llega como parámetro.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefijo de las entradas de contenido
pub const CONTENT_KEY_PREFIX: &str = "content";
/// Prefijo del flag de generación diaria
pub const FLAG_KEY_PREFIX: &str = "generated";
/// Prefijo del lock de generación (estrategia compare-and-set)
pub const LOCK_KEY_PREFIX: &str = "generating";

/// Fecha civil usada como clave del cache (`YYYY-MM-DD`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Fecha `days` días antes de esta
    pub fn days_ago(&self, days: u32) -> Self {
        Self(self.0 - Duration::days(i64::from(days)))
    }

    pub fn content_key(&self) -> String {
        format!("{}:{}", CONTENT_KEY_PREFIX, self)
    }

    pub fn flag_key(&self) -> String {
        format!("{}:{}", FLAG_KEY_PREFIX, self)
    }

    pub fn lock_key(&self) -> String {
        format!("{}:{}", LOCK_KEY_PREFIX, self)
    }

    /// Fecha legible para la cabecera de la página ("Friday, October 16, 2026")
    pub fn long_format(&self) -> String {
        self.0.format("%A, %B %-d, %Y").to_string()
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Fecha civil de `now` en la zona horaria `tz`
pub fn civil_date(now: DateTime<Utc>, tz: Tz) -> DateKey {
    DateKey(now.with_timezone(&tz).date_naive())
}

/// Día de la semana local de `now` en `tz`
pub fn local_weekday(now: DateTime<Utc>, tz: Tz) -> chrono::Weekday {
    now.with_timezone(&tz).weekday()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_civil_date_crosses_midnight_in_local_timezone() {
        // 22:30 UTC del 15 de octubre ya es 16 de octubre en Estambul (UTC+3)
        let now = Utc.with_ymd_and_hms(2026, 10, 15, 22, 30, 0).unwrap();

        assert_eq!(civil_date(now, chrono_tz::UTC).to_string(), "2026-10-15");
        assert_eq!(civil_date(now, chrono_tz::Europe::Istanbul).to_string(), "2026-10-16");
    }

    #[test]
    fn test_keys_follow_layout() {
        let date = DateKey::new(NaiveDate::from_ymd_opt(2026, 3, 7).unwrap());

        assert_eq!(date.content_key(), "content:2026-03-07");
        assert_eq!(date.flag_key(), "generated:2026-03-07");
        assert_eq!(date.lock_key(), "generating:2026-03-07");
    }

    #[test]
    fn test_days_ago_crosses_month_boundary() {
        let date = DateKey::new(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());

        assert_eq!(date.days_ago(1).to_string(), "2026-02-28");
        assert_eq!(date.days_ago(0), date);
    }

    #[test]
    fn test_long_format() {
        let date = DateKey::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        assert_eq!(date.long_format(), "Friday, October 16, 2026");
    }
}
