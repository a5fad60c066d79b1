// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

pub const DEFAULT_LOCALE: &str = "en";
pub const SUPPORTED_LOCALES: &[&str] = &["en", "id", "pt"];

// Os catálogos vão embutidos no binário; nada para carregar do disco em produção.
const CATALOGS: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("id", include_str!("../../locales/id.json")),
    ("pt", include_str!("../../locales/pt.json")),
];

/// Mensagens traduzidas, indexadas por idioma e chave (`errors.not_found`, `validation.required`...).
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
}

impl I18nStore {
    pub fn load_embedded() -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("catálogo de mensagens '{}' inválido", lang))?;
            catalogs.insert(lang.to_string(), messages);
        }
        Ok(Self { catalogs })
    }

    /// Idioma pedido -> idioma padrão -> a própria chave.
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LOCALE).and_then(|c| c.get(key)))
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }

    /// Igual a `translate`, substituindo `{nome}` pelos argumentos.
    pub fn translate_with(&self, lang: &str, key: &str, args: &[(&str, &str)]) -> String {
        let mut message = self.translate(lang, key);
        for (name, value) in args {
            message = message.replace(&format!("{{{}}}", name), value);
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_has_the_same_keys() {
        let store = I18nStore::load_embedded().unwrap();
        let base = &store.catalogs[DEFAULT_LOCALE];
        for (lang, catalog) in &store.catalogs {
            for key in base.keys() {
                assert!(catalog.contains_key(key), "'{}' sem a chave '{}'", lang, key);
            }
        }
    }

    #[test]
    fn every_supported_locale_has_a_catalog() {
        let store = I18nStore::load_embedded().unwrap();
        assert_eq!(store.catalogs.len(), SUPPORTED_LOCALES.len());
        for lang in SUPPORTED_LOCALES {
            assert!(store.catalogs.contains_key(*lang), "sem catálogo para '{}'", lang);
        }
    }

    #[test]
    fn unknown_language_falls_back_to_english() {
        let store = I18nStore::load_embedded().unwrap();
        assert_eq!(
            store.translate("fr", "errors.forbidden"),
            store.translate("en", "errors.forbidden")
        );
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::load_embedded().unwrap();
        assert_eq!(store.translate("id", "errors.nope"), "errors.nope");
    }

    #[test]
    fn arguments_are_interpolated() {
        let store = I18nStore::load_embedded().unwrap();
        let msg = store.translate_with("id", "errors.duplicate_name", &[("name", "Workshop A")]);
        assert!(msg.contains("Workshop A"));
        assert!(!msg.contains("{name}"));
    }
}
