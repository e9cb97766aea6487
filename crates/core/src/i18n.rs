//! Locale negotiation and message catalog resolution.
//!
//! Message catalogs are JSON trees embedded at compile time, one per
//! supported locale. Translation is done through an explicit [`Localizer`]
//! rather than ambient global state so tests (and the API middleware) can
//! bind a locale per call site.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde_json::Value;

/// Locale used when negotiation fails or a candidate is unsupported.
pub const DEFAULT_LOCALE: &str = "en";

/// Locales with an embedded message catalog.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "pt"];

static EN_RAW: &str = include_str!("../locales/en.json");
static PT_RAW: &str = include_str!("../locales/pt.json");

fn catalog(locale: &str) -> &'static Value {
    static CATALOGS: OnceLock<HashMap<&'static str, Value>> = OnceLock::new();
    let catalogs = CATALOGS.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert(
            "en",
            serde_json::from_str(EN_RAW).expect("embedded en.json must be valid JSON"),
        );
        map.insert(
            "pt",
            serde_json::from_str(PT_RAW).expect("embedded pt.json must be valid JSON"),
        );
        map
    });
    catalogs
        .get(locale)
        .unwrap_or_else(|| &catalogs[DEFAULT_LOCALE])
}

/// Map an arbitrary locale candidate onto a supported locale.
///
/// Only the primary subtag is considered (`pt-BR` matches `pt`); anything
/// unsupported resolves to [`DEFAULT_LOCALE`].
pub fn normalize_locale(candidate: Option<&str>) -> &'static str {
    let Some(candidate) = candidate else {
        return DEFAULT_LOCALE;
    };
    let primary = candidate
        .split('-')
        .next()
        .unwrap_or_default()
        .to_lowercase();
    SUPPORTED_LOCALES
        .iter()
        .find(|l| **l == primary)
        .copied()
        .unwrap_or(DEFAULT_LOCALE)
}

/// Resolve a locale from an `Accept-Language` header value.
///
/// Entries are scanned in order; the first one whose primary subtag is a
/// supported locale wins. Quality weights are ignored.
pub fn parse_accept_language(header_value: Option<&str>) -> &'static str {
    let Some(header_value) = header_value else {
        return DEFAULT_LOCALE;
    };
    for entry in header_value.split(',') {
        let locale_part = entry.split(';').next().unwrap_or_default().trim();
        if locale_part.is_empty() {
            continue;
        }
        let primary = locale_part
            .split('-')
            .next()
            .unwrap_or_default()
            .to_lowercase();
        if let Some(locale) = SUPPORTED_LOCALES.iter().find(|l| **l == primary) {
            return locale;
        }
    }
    DEFAULT_LOCALE
}

/// A translator bound to one locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Localizer {
    locale: &'static str,
}

impl Localizer {
    /// Create a localizer for the given locale, normalizing unsupported
    /// values to the default.
    pub fn new(locale: &str) -> Self {
        Self {
            locale: normalize_locale(Some(locale)),
        }
    }

    /// Create a localizer from the `CODEJUDGE_LOCALE` environment variable,
    /// falling back to the default locale.
    pub fn from_env() -> Self {
        match std::env::var("CODEJUDGE_LOCALE") {
            Ok(value) => Self::new(&value),
            Err(_) => Self::default(),
        }
    }

    /// The locale this localizer resolves against.
    pub fn locale(&self) -> &'static str {
        self.locale
    }

    /// Translate a dotted key path; the key itself is returned when missing.
    pub fn translate(&self, key: &str) -> String {
        self.translate_with(key, None, &[])
    }

    /// Translate with a fallback string for missing keys.
    pub fn translate_or(&self, key: &str, default: &str) -> String {
        self.translate_with(key, Some(default), &[])
    }

    /// Translate with an optional fallback and `{{token}}` interpolation.
    ///
    /// Tokens present in the template but absent from `values` are replaced
    /// with an empty string.
    pub fn translate_with(
        &self,
        key: &str,
        default: Option<&str>,
        values: &[(&str, &str)],
    ) -> String {
        let template = resolve(catalog(self.locale), key)
            .or(default)
            .unwrap_or(key);
        interpolate(template, values)
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self {
            locale: DEFAULT_LOCALE,
        }
    }
}

fn resolve<'a>(tree: &'a Value, key: &str) -> Option<&'a str> {
    let mut current = tree;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str()
}

fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    if !template.contains("{{") {
        return template.to_string();
    }
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) => {
                let token = after[..end].trim();
                let value = values
                    .iter()
                    .find(|(k, _)| *k == token)
                    .map(|(_, v)| *v)
                    .unwrap_or("");
                out.push_str(value);
                rest = &after[end + 2..];
            }
            // Unterminated placeholder: emit the remainder verbatim.
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Locale negotiation ---

    #[test]
    fn normalize_matches_primary_subtag() {
        assert_eq!(normalize_locale(Some("pt-BR")), "pt");
        assert_eq!(normalize_locale(Some("PT")), "pt");
        assert_eq!(normalize_locale(Some("fr")), DEFAULT_LOCALE);
        assert_eq!(normalize_locale(None), DEFAULT_LOCALE);
    }

    #[test]
    fn accept_language_first_supported_entry_wins() {
        assert_eq!(parse_accept_language(Some("fr-FR, pt-BR;q=0.8, en;q=0.5")), "pt");
        assert_eq!(parse_accept_language(Some("de, fr")), DEFAULT_LOCALE);
        assert_eq!(parse_accept_language(None), DEFAULT_LOCALE);
        assert_eq!(parse_accept_language(Some("")), DEFAULT_LOCALE);
    }

    // --- Resolution & interpolation ---

    #[test]
    fn translate_resolves_dotted_keys() {
        let t = Localizer::new("en");
        assert_eq!(t.translate("common.status_ok"), "ok");
    }

    #[test]
    fn translate_interpolates_values() {
        let t = Localizer::new("en");
        assert_eq!(
            t.translate_with("challenges.created", None, &[("name", "Rust CLI")]),
            "Challenge \"Rust CLI\" created"
        );
    }

    #[test]
    fn missing_key_falls_back_to_default_then_key() {
        let t = Localizer::new("en");
        assert_eq!(t.translate("missing.key"), "missing.key");
        assert_eq!(t.translate_or("missing.key", "fallback"), "fallback");
    }

    #[test]
    fn unmatched_tokens_become_empty() {
        assert_eq!(interpolate("X {{n}}", &[("n", "5")]), "X 5");
        assert_eq!(interpolate("X {{other}}!", &[("n", "5")]), "X !");
        assert_eq!(interpolate("no tokens", &[]), "no tokens");
    }

    #[test]
    fn unsupported_locale_uses_default_catalog() {
        let t = Localizer::new("zz");
        assert_eq!(t.locale(), DEFAULT_LOCALE);
        assert_eq!(t.translate("common.status_ok"), "ok");
    }

    #[test]
    fn portuguese_catalog_resolves() {
        let t = Localizer::new("pt");
        assert_eq!(t.translate("common.status_ok"), "ok");
        assert_ne!(
            t.translate("evaluations.started"),
            Localizer::new("en").translate("evaluations.started")
        );
    }
}
