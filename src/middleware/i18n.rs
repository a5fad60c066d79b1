// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

use crate::common::i18n::{DEFAULT_LOCALE, SUPPORTED_LOCALES};

// Idioma das mensagens de erro, lido do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Locale {
    /// Primeiro idioma da lista que temos catálogo. "id-ID" vira "id".
    pub fn from_header(raw: &str) -> Self {
        accept_language::parse(raw)
            .iter()
            .map(|tag| tag.split('-').next().unwrap_or(tag).to_ascii_lowercase())
            .find(|lang| SUPPORTED_LOCALES.contains(&lang.as_str()))
            .map(Locale)
            .unwrap_or_default()
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LOCALE.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let locale = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|value| value.to_str().ok())
            .map(Locale::from_header)
            .unwrap_or_default();

        Ok(locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_is_dropped() {
        assert_eq!(Locale::from_header("id-ID,id;q=0.9").0, "id");
        assert_eq!(Locale::from_header("pt-BR").0, "pt");
    }

    #[test]
    fn skips_languages_without_catalog() {
        assert_eq!(Locale::from_header("fr-FR,fr;q=0.9,id;q=0.8").0, "id");
    }

    #[test]
    fn falls_back_to_english() {
        assert_eq!(Locale::from_header("ja").0, "en");
        assert_eq!(Locale::from_header("").0, "en");
    }
}
