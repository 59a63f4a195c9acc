use std::sync::Arc;
use tracing::warn;

use crate::catalog::{Catalog, LAST_RESORT_PATTERN, format_pattern};
use crate::path::{field_name, split_field, split_namespace};
use crate::tree::ValidationTree;
use crate::validators::{FieldFailure, FieldViolation};

/// Renders validation failures into localized, nested message trees.
#[derive(Debug, Clone)]
pub struct Renderer {
    catalog: Arc<Catalog>,
    default_lang: String,
}

impl Renderer {
    pub fn new(catalog: Catalog, default_lang: impl Into<String>) -> Self {
        Renderer {
            catalog: Arc::new(catalog),
            default_lang: default_lang.into(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn default_lang(&self) -> &str {
        &self.default_lang
    }

    pub fn render(&self, failures: &[FieldFailure], lang: &str) -> ValidationTree {
        let lang = self.resolve_lang(lang);
        let mut tree = ValidationTree::new();

        for failure in failures {
            let keys = split_namespace(&failure.namespace);
            let message = self.format_failure(failure, lang);
            tree.insert(&keys, message);
        }

        tree
    }

    /// Violations already carry their text; only empty descriptions are
    /// filled in from the catalog.
    pub fn render_violations(&self, violations: &[FieldViolation], lang: &str) -> ValidationTree {
        let lang = self.resolve_lang(lang);
        let mut tree = ValidationTree::new();

        for violation in violations {
            let keys = split_field(&violation.field);
            let message = if violation.description.is_empty() {
                let field = keys.last().map(|k| k.as_str()).unwrap_or_default();
                let pattern = self.pattern(lang, "invalid");
                format_pattern(pattern, field, "invalid", None)
            } else {
                violation.description.clone()
            };
            tree.insert(&keys, message);
        }

        tree
    }

    /// The localized message for one failure.
    pub fn message(&self, failure: &FieldFailure, lang: &str) -> String {
        let lang = self.resolve_lang(lang);
        self.format_failure(failure, lang)
    }

    // `lang` must already be resolved against the catalog
    fn format_failure(&self, failure: &FieldFailure, lang: &str) -> String {
        let field = field_name(&failure.namespace);
        let pattern = self.pattern(lang, &failure.rule);
        format_pattern(pattern, &field, &failure.rule, failure.param.as_deref())
    }

    fn pattern<'a>(&'a self, lang: &str, rule: &str) -> &'a str {
        self.catalog
            .pattern(lang, rule)
            .or_else(|| self.catalog.pattern(&self.default_lang, rule))
            .unwrap_or(LAST_RESORT_PATTERN)
    }

    fn resolve_lang<'a>(&'a self, lang: &'a str) -> &'a str {
        match self.catalog.resolve_lang(lang) {
            Some(resolved) => resolved,
            None => {
                warn!(
                    "Language {:?} not in catalog, using {:?}",
                    lang, self.default_lang
                );
                &self.default_lang
            }
        }
    }
}
