use axum::http::StatusCode;
use snafu::ensure;
use tracing::debug;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::dto::{ErrorObject, Message};
use crate::error::{ConfigSnafu, debug_payload};
use crate::renderer::Renderer;
use crate::{DEFAULT_LANG, Error, Result};

/// Turns an `Error` into a status code and a wire-level `ErrorObject`.
#[derive(Debug, Clone)]
pub struct Classifier {
    renderer: Renderer,
    debug: bool,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::new(Renderer::new(Catalog::builtin(), DEFAULT_LANG))
    }
}

impl Classifier {
    pub fn new(renderer: Renderer) -> Self {
        Classifier {
            renderer,
            debug: false,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = config.catalog()?;

        ensure!(
            catalog.has_lang(&config.default_lang),
            ConfigSnafu {
                msg: format!(
                    "Default language {:?} is missing from the catalog.",
                    config.default_lang
                )
            }
        );

        let renderer = Renderer::new(catalog, config.default_lang.clone());
        Ok(Classifier::new(renderer).with_debug(config.debug))
    }

    /// When set, responses carry the error's source chain in `debug`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn classify(&self, err: &Error, lang: &str) -> (StatusCode, ErrorObject) {
        let status_code = StatusCode::from(err);

        let error = match err {
            Error::Validation { failures } => {
                ErrorObject::validation(self.renderer.render(failures, lang))
            }
            Error::Violations { violations } => {
                ErrorObject::validation(self.renderer.render_violations(violations, lang))
            }
            Error::Fields { errors } => ErrorObject::new(Message::Fields(
                errors
                    .iter()
                    .map(|(field, e)| (field.clone(), e.to_string()))
                    .collect(),
            )),
            _ => ErrorObject::new(err.to_string()),
        };

        debug!(status = status_code.as_u16(), lang, "Classified error: {}", err);

        if self.debug {
            return (status_code, error.with_debug(debug_payload(err)));
        }
        (status_code, error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Node;
    use crate::validators::{FieldFailure, FieldViolation};
    use std::collections::BTreeMap;
    use validator::Validate;

    fn classify(err: &Error) -> (StatusCode, ErrorObject) {
        Classifier::default().classify(err, "en")
    }

    #[test]
    fn test_common_error() {
        let (status, obj) = classify(&Error::from("common err"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(obj, ErrorObject::new("common err"));
    }

    #[test]
    fn test_sentinels() {
        let (status, obj) = classify(&Error::RouteNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(obj, ErrorObject::new("route not found"));

        let (status, obj) = classify(&Error::MethodNotAllowed);
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(obj, ErrorObject::new("method not allowed"));

        let (status, obj) = classify(&Error::RecordNotFound);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(obj, ErrorObject::new("record not found"));

        let (status, obj) = classify(&Error::InternalServer);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(obj, ErrorObject::new("internal server error"));
    }

    #[test]
    fn test_store_errors() {
        let no_rows = std::io::Error::new(std::io::ErrorKind::NotFound, "sql: no rows in result set");
        let err = Error::from_store_with(no_rows, |e| e.kind() == std::io::ErrorKind::NotFound);
        let (status, obj) = classify(&err);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(obj, ErrorObject::new("record not found"));

        let conn_done = std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "sql: connection is already closed",
        );
        let err = Error::from_store_with(conn_done, |e| e.kind() == std::io::ErrorKind::NotFound);
        let (status, obj) = classify(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(obj, ErrorObject::new("sql: connection is already closed"));
    }

    #[test]
    fn test_errors_list() {
        let err = Error::from(vec![Error::from("common err 1"), Error::from("common err 2")]);
        let (status, obj) = classify(&err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(obj, ErrorObject::new("common err 1; common err 2"));

        let err = Error::from(vec![Error::from("only one")]);
        let (_, obj) = classify(&err);
        assert_eq!(obj, ErrorObject::new("only one"));
    }

    #[test]
    fn test_errors_map() {
        let mut errors = BTreeMap::new();
        errors.insert("common_err".to_string(), Error::from("common err"));
        errors.insert("lookup".to_string(), Error::RecordNotFound);
        let (status, obj) = classify(&Error::from(errors));

        let mut expected = BTreeMap::new();
        expected.insert("common_err".to_string(), "common err".to_string());
        expected.insert("lookup".to_string(), "record not found".to_string());

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(obj, ErrorObject::new(Message::Fields(expected)));
    }

    #[derive(Debug, Validate)]
    struct Nested {
        #[validate(required, email)]
        email: Option<String>,
    }

    #[derive(Debug, Validate)]
    struct MyStruct {
        #[validate(length(min = 1))]
        string: String,

        #[validate(nested)]
        nested: Nested,

        #[validate(email)]
        email: String,
    }

    #[test]
    fn test_validation_error() {
        let data = MyStruct {
            string: "".to_string(),
            nested: Nested { email: None },
            email: "foo@bar".to_string(),
        };
        let err = Error::from_validation("MyStruct", &data.validate().unwrap_err());
        let (status, obj) = classify(&err);

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(obj.message.is_none());

        let tree = obj.validation.unwrap();
        assert_eq!(
            tree.messages(&["nested", "email"]).unwrap(),
            &["field `email` is required".to_string()]
        );
        assert_eq!(
            tree.messages(&["string"]).unwrap(),
            &["length of `string` field value is shorter than `1`".to_string()]
        );
        assert!(matches!(tree.get("nested"), Some(Node::Branch(_))));
    }

    #[test]
    fn test_violations() {
        let err = Error::from(vec![FieldViolation::new("name", "name is taken")]);
        let (status, obj) = classify(&err);
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            obj.validation.unwrap().messages(&["name"]).unwrap(),
            &["name is taken".to_string()]
        );
    }

    #[test]
    fn test_language_is_used() {
        let err = Error::from(vec![FieldFailure::new("User.Name", "required")]);
        let (_, obj) = Classifier::default().classify(&err, "ru");
        assert_eq!(
            obj.validation.unwrap().messages(&["name"]).unwrap(),
            &["Свойство `name` обязательно для заполнения".to_string()]
        );
    }

    #[test]
    fn test_debug_payload() {
        let classifier = Classifier::default().with_debug(true);
        let (_, obj) = classifier.classify(&Error::RouteNotFound, "en");
        assert_eq!(obj.debug.unwrap()["error"], "route not found");

        let (_, obj) = Classifier::default().classify(&Error::RouteNotFound, "en");
        assert!(obj.debug.is_none());
    }

    #[test]
    fn test_from_config() {
        let config = Config::from_toml("default_lang = \"ru\"\ndebug = true").unwrap();
        let classifier = Classifier::from_config(&config).unwrap();
        assert_eq!(classifier.renderer().default_lang(), "ru");

        let config = Config::from_toml("default_lang = \"fr\"").unwrap();
        assert!(Classifier::from_config(&config).is_err());
    }

    #[test]
    fn test_from_config_with_catalog_file() {
        let path = std::env::temp_dir().join(format!("errjson-catalog-{}.toml", std::process::id()));
        std::fs::write(&path, "[de]\nrequired = \"Feld `{field}` ist erforderlich\"\n").unwrap();

        let config = Config {
            default_lang: "de".to_string(),
            catalog_path: Some(path.clone()),
            debug: false,
        };
        let classifier = Classifier::from_config(&config);
        std::fs::remove_file(&path).unwrap();
        let classifier = classifier.unwrap();

        let err = Error::from(vec![FieldFailure::new("User.Name", "required")]);
        let (status, obj) = classifier.classify(&err, "de-AT");
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            obj.validation.unwrap().messages(&["name"]).unwrap(),
            &["Feld `name` ist erforderlich".to_string()]
        );

        // Built-in languages are still available next to the file's
        let (_, obj) = classifier.classify(&err, "en");
        assert_eq!(
            obj.validation.unwrap().messages(&["name"]).unwrap(),
            &["field `name` is required".to_string()]
        );
    }
}
