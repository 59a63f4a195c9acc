use serde::Deserialize;
use snafu::ResultExt;
use std::collections::HashMap;
use std::path::Path;

use crate::Result;
use crate::error::{CatalogFileSnafu, CatalogParseSnafu};

/// Rule key used when a language has no pattern for the failing rule.
pub const FALLBACK_RULE: &str = "_fallback";

/// Used only when neither the requested nor the default language resolve.
pub const LAST_RESORT_PATTERN: &str = "field `{field}` is invalid";

const EN: &[(&str, &str)] = &[
    (FALLBACK_RULE, "field `{field}` failed on the `{rule}` rule"),
    ("required", "field `{field}` is required"),
    ("gt", "field `{field}` must contain more than `{param}` elements"),
    ("lt", "field `{field}` must contain less than `{param}` elements"),
    ("gte", "field `{field}` must be at least `{param}`"),
    ("lte", "field `{field}` must be at most `{param}`"),
    ("email", "field `{field}` is not valid email"),
    ("url", "field `{field}` is not valid url"),
    ("min", "length of `{field}` field value is shorter than `{param}`"),
    ("max", "length of `{field}` field value is greater than `{param}`"),
    ("len", "length of `{field}` field value must be exactly `{param}`"),
];

const RU: &[(&str, &str)] = &[
    (
        FALLBACK_RULE,
        "Ошибка валидации для свойства `{field}` с правилом `{rule}`",
    ),
    ("required", "Свойство `{field}` обязательно для заполнения"),
    ("gt", "Свойство `{field}` должно содержать более `{param}` элементов"),
    ("email", "Свойство `{field}` должно содержать корректный email"),
    ("min", "Длина значения свойства `{field}` меньше `{param}`"),
    ("max", "Длина значения свойства `{field}` больше `{param}`"),
];

/// Message patterns per language and rule. Patterns may use the `{field}`,
/// `{rule}` and `{param}` placeholders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    langs: HashMap<String, HashMap<String, String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// The catalog shipped with the crate: `en` and `ru`.
    pub fn builtin() -> Self {
        Catalog::new().with_patterns("en", EN).with_patterns("ru", RU)
    }

    /// Parses a TOML catalog, one table per language:
    ///
    /// ```toml
    /// [de]
    /// required = "Feld `{field}` ist erforderlich"
    /// ```
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context(CatalogParseSnafu)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).context(CatalogFileSnafu {
            path: path.to_path_buf(),
        })?;
        Self::from_toml(&contents)
    }

    pub fn with_pattern(mut self, lang: &str, rule: &str, pattern: &str) -> Self {
        self.langs
            .entry(lang.to_string())
            .or_default()
            .insert(rule.to_string(), pattern.to_string());
        self
    }

    fn with_patterns(self, lang: &str, patterns: &[(&str, &str)]) -> Self {
        patterns
            .iter()
            .fold(self, |catalog, (rule, pattern)| {
                catalog.with_pattern(lang, rule, pattern)
            })
    }

    /// Entries from `other` are added, replacing patterns for the same rule.
    pub fn merge(mut self, other: Catalog) -> Self {
        for (lang, patterns) in other.langs {
            self.langs.entry(lang).or_default().extend(patterns);
        }
        self
    }

    pub fn has_lang(&self, lang: &str) -> bool {
        self.langs.contains_key(lang)
    }

    pub fn languages(&self) -> Vec<&str> {
        let mut langs: Vec<&str> = self.langs.keys().map(|k| k.as_str()).collect();
        langs.sort();
        langs
    }

    /// Finds the catalog entry for a language tag: exact match first, then the
    /// primary subtag (`en-US` -> `en`).
    pub fn resolve_lang<'a>(&'a self, lang: &str) -> Option<&'a str> {
        let lang = lang.trim();
        if let Some((key, _)) = self.langs.get_key_value(lang) {
            return Some(key.as_str());
        }

        let primary = lang.split(['-', '_']).next()?.to_lowercase();
        self.langs
            .get_key_value(primary.as_str())
            .map(|(key, _)| key.as_str())
    }

    /// Pattern for `rule` in `lang`, or that language's fallback pattern.
    pub fn pattern(&self, lang: &str, rule: &str) -> Option<&str> {
        let patterns = self.langs.get(lang)?;
        patterns
            .get(rule)
            .or_else(|| patterns.get(FALLBACK_RULE))
            .map(|p| p.as_str())
    }
}

/// Fills in the placeholders of a catalog pattern. Inserted values are never
/// scanned for placeholders themselves.
pub fn format_pattern(pattern: &str, field: &str, rule: &str, param: Option<&str>) -> String {
    let mut out = String::with_capacity(pattern.len() + field.len());
    let mut rest = pattern;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];

        let placeholder = [
            ("{field}", field),
            ("{rule}", rule),
            ("{param}", param.unwrap_or_default()),
        ]
        .into_iter()
        .find(|(key, _)| tail.starts_with(key));

        match placeholder {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
