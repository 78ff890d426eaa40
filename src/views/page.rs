//! Página principal
//!
//! Muestra el último contenido disponible. Nunca dispara una generación; si
//! el contenido no se puede leer aparece el mensaje de bienvenida.

use askama::Template;
use axum::{extract::State, response::Html};

use super::navigation::{MenuItem, LOGO_URL, MENU_ITEMS};
use crate::models::ResolvedContent;
use crate::state::AppState;
use crate::utils::date::DateKey;
use crate::utils::errors::AppResult;

/// Página completa; incluye `navigation.html` con los mismos campos
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub logo_url: &'static str,
    pub menu_items: &'static [MenuItem],
    pub today: String,
    pub content_date: DateKey,
    pub content: &'a str,
}

impl<'a> HomeTemplate<'a> {
    pub fn new(resolved: &'a ResolvedContent, today: DateKey) -> Self {
        Self {
            logo_url: LOGO_URL,
            menu_items: &MENU_ITEMS,
            today: today.long_format(),
            content_date: resolved.date,
            content: &resolved.content,
        }
    }
}

/// Handler de `GET /`
pub async fn home(State(state): State<AppState>) -> AppResult<Html<String>> {
    let now = chrono::Utc::now();
    let resolved = state.content.latest_content(now).await;
    let today = state.content.today(now);

    let html = HomeTemplate::new(&resolved, today).render()?;
    Ok(Html(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContentOutcome;
    use chrono::NaiveDate;

    #[test]
    fn test_home_template_escapes_content() {
        let today = DateKey::new(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap());
        let resolved = ResolvedContent::placeholder(
            "Cruise ships <today> & tomorrow",
            today,
            ContentOutcome::Placeholder,
        );

        let html = HomeTemplate::new(&resolved, today).render().unwrap();

        assert!(html.contains("Cruise ships &lt;today&gt; &amp; tomorrow"));
        assert!(!html.contains("<today>"));
        assert!(html.contains("Friday, October 16, 2026"));
        assert!(html.contains(r#"data-date="2026-10-16""#));
        assert!(html.contains("https://www.kusadasi.biz/ephesus/"));
    }
}
