//! Option labels per locale.

use std::collections::BTreeMap;

/// Label catalogue: locale -> `"key.option"` -> text.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Active locale, if one was chosen.
    locale: Option<String>,
    /// All known labels.
    labels: BTreeMap<String, BTreeMap<String, String>>,
}

impl Catalog {
    /// Catalogue over `labels` with no active locale.
    pub fn new(labels: BTreeMap<String, BTreeMap<String, String>>) -> Self {
        Self {
            locale: None,
            labels,
        }
    }

    /// Switch the active locale.
    pub fn set_locale(&mut self, locale: &str) {
        self.locale = Some(locale.to_string());
    }

    /// The active locale.
    pub fn locale(&self) -> Option<&str> {
        self.locale.as_deref()
    }

    /// Display label for `option` of the choice bound to `key`.
    ///
    /// Looks up the active locale, then its language (`es-MX` -> `es`), then falls back to
    /// the option value itself.
    pub fn label(&self, key: &str, option: &str) -> String {
        let Some(locale) = self.locale.as_deref() else {
            return option.to_string();
        };
        let id = format!("{key}.{option}");
        let language = locale.split(['-', '_']).next().unwrap_or(locale);
        [locale, language]
            .iter()
            .find_map(|loc| self.labels.get(*loc).and_then(|m| m.get(&id)))
            .cloned()
            .unwrap_or_else(|| option.to_string())
    }
}
