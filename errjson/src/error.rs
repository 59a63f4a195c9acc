use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, LazyLock};

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::{body::Body, http::StatusCode, response::Response};
use snafu::{Backtrace, ErrorCompat, IntoError, Snafu};
use validator::ValidationErrors;

use crate::classifier::Classifier;
use crate::dto::ErrorResponse;
use crate::validators::{FieldFailure, FieldViolation, flatten_errors};

pub type Result<T> = std::result::Result<T, Error>;

/// Renders errors that never reach a configured `Classifier`.
static DEFAULT_CLASSIFIER: LazyLock<Classifier> = LazyLock::new(Classifier::default);

/// Root segment used when validation errors are converted without a struct name.
const PAYLOAD_ROOT: &str = "Payload";

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("route not found"))]
    RouteNotFound,

    #[snafu(display("method not allowed"))]
    MethodNotAllowed,

    #[snafu(display("record not found"))]
    RecordNotFound,

    #[snafu(display("internal server error"))]
    InternalServer,

    #[snafu(display("{}", source))]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[snafu(display("{}", join_errors(errors)))]
    Many { errors: Vec<Error> },

    #[snafu(display("{}", join_fields(errors)))]
    Fields { errors: BTreeMap<String, Error> },

    #[snafu(display("validation failed"))]
    Validation { failures: Vec<FieldFailure> },

    #[snafu(display("validation failed"))]
    Violations { violations: Vec<FieldViolation> },

    #[snafu(display("{}", msg))]
    JsonRejection {
        msg: String,
        source: JsonRejection,
        backtrace: Backtrace,
    },

    #[snafu(display("Error reading catalog file {:?}: {}", path, source))]
    CatalogFile {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Error parsing catalog: {}", source))]
    CatalogParse {
        source: toml::de::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Error parsing config: {}", source))]
    ConfigParse {
        source: toml::de::Error,
        backtrace: Backtrace,
    },

    #[snafu(display("Config error: {}", msg))]
    Config { msg: String },

    #[snafu(display("{}", msg))]
    Whatever { msg: String },
}

/// Lets a storage layer say whether one of its errors means "no matching row".
pub trait StoreError: std::error::Error + Send + Sync + 'static {
    fn is_no_rows(&self) -> bool;
}

fn join_errors(errors: &[Error]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<String>>()
        .join("; ")
}

fn join_fields(errors: &BTreeMap<String, Error>) -> String {
    errors
        .iter()
        .map(|(field, e)| format!("{}: {}", field, e))
        .collect::<Vec<String>>()
        .join("; ")
}

impl Error {
    /// Maps a storage error, turning "no rows" into `RecordNotFound`.
    pub fn from_store<E: StoreError>(err: E) -> Self {
        if err.is_no_rows() {
            return Error::RecordNotFound;
        }
        Error::Store {
            source: Box::new(err),
        }
    }

    /// Same as `from_store` for error types that cannot implement `StoreError`
    /// here, e.g. a driver's own error enum.
    pub fn from_store_with<E, F>(err: E, is_no_rows: F) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
        F: FnOnce(&E) -> bool,
    {
        if is_no_rows(&err) {
            return Error::RecordNotFound;
        }
        Error::Store {
            source: Box::new(err),
        }
    }

    /// Converts validator output, `root` being the name of the validated struct.
    pub fn from_validation(root: &str, errors: &ValidationErrors) -> Self {
        Error::Validation {
            failures: flatten_errors(root, errors),
        }
    }

    /// False only for error collections that turned out to be empty.
    pub fn has_errors(&self) -> bool {
        match self {
            Error::Many { errors } => !errors.is_empty(),
            Error::Fields { errors } => !errors.is_empty(),
            Error::Validation { failures } => !failures.is_empty(),
            Error::Violations { violations } => !violations.is_empty(),
            _ => true,
        }
    }
}

// Allow string slices to be converted to Error
impl From<&str> for Error {
    fn from(val: &str) -> Self {
        Self::Whatever {
            msg: val.to_string(),
        }
    }
}

impl From<String> for Error {
    fn from(val: String) -> Self {
        Self::Whatever { msg: val }
    }
}

impl From<Vec<Error>> for Error {
    fn from(errors: Vec<Error>) -> Self {
        Self::Many { errors }
    }
}

impl From<BTreeMap<String, Error>> for Error {
    fn from(errors: BTreeMap<String, Error>) -> Self {
        Self::Fields { errors }
    }
}

impl From<Vec<FieldFailure>> for Error {
    fn from(failures: Vec<FieldFailure>) -> Self {
        Self::Validation { failures }
    }
}

impl From<Vec<FieldViolation>> for Error {
    fn from(violations: Vec<FieldViolation>) -> Self {
        Self::Violations { violations }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        let msg = rejection.body_text();
        JsonRejectionSnafu { msg }.into_error(rejection)
    }
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Self::from_validation(PAYLOAD_ROOT, &errors)
    }
}

/// Allow Error to be converted to StatusCode
impl From<&Error> for StatusCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::RouteNotFound => StatusCode::NOT_FOUND,
            Error::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Error::RecordNotFound => StatusCode::NOT_FOUND,
            Error::Many { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Fields { .. } => StatusCode::BAD_REQUEST,
            Error::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Violations { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Error::JsonRejection { .. } => StatusCode::BAD_REQUEST,
            Error::Whatever { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Source chain and backtrace of an error, used as the `debug` payload.
pub fn debug_payload(err: &Error) -> serde_json::Value {
    let mut sources: Vec<String> = Vec::new();
    let mut current = std::error::Error::source(err);
    while let Some(e) = current {
        sources.push(e.to_string());
        current = e.source();
    }

    let backtrace = ErrorCompat::backtrace(err).map(|bt| format!("{}", bt));

    serde_json::json!({
        "error": err.to_string(),
        "sources": sources,
        "backtrace": backtrace,
    })
}

pub(crate) fn default_classifier() -> &'static Classifier {
    &DEFAULT_CLASSIFIER
}

// Allow errors to be rendered as response
impl IntoResponse for Error {
    fn into_response(self) -> Response<Body> {
        // Rendered with the built-in catalog; `ErrorInfo` lets a response
        // mapper re-render it in the request's language.
        let (status_code, error) = default_classifier().classify(&self, crate::DEFAULT_LANG);

        let mut res = (status_code, Json(ErrorResponse { error })).into_response();
        res.extensions_mut().insert(ErrorInfo {
            error: Arc::new(self),
        });

        res
    }
}

#[derive(Debug, Clone)]
pub struct ErrorInfo {
    pub error: Arc<Error>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Snafu)]
    enum FakeDbError {
        #[snafu(display("no rows in result set"))]
        NoRows,

        #[snafu(display("connection is already closed"))]
        ConnDone,
    }

    impl StoreError for FakeDbError {
        fn is_no_rows(&self) -> bool {
            matches!(self, FakeDbError::NoRows)
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(StatusCode::from(&Error::RouteNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            StatusCode::from(&Error::MethodNotAllowed),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(StatusCode::from(&Error::RecordNotFound), StatusCode::NOT_FOUND);
        assert_eq!(
            StatusCode::from(&Error::from("common err")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StatusCode::from(&Error::InternalServer),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StatusCode::from(&Error::from(Vec::<FieldFailure>::new())),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_from_store() {
        let err = Error::from_store(FakeDbError::NoRows);
        assert!(matches!(err, Error::RecordNotFound));
        assert_eq!(err.to_string(), "record not found");

        let err = Error::from_store(FakeDbError::ConnDone);
        assert!(matches!(err, Error::Store { .. }));
        assert_eq!(err.to_string(), "connection is already closed");
        assert_eq!(StatusCode::from(&err), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_from_store_with() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing row");
        let err = Error::from_store_with(io, |e| e.kind() == std::io::ErrorKind::NotFound);
        assert!(matches!(err, Error::RecordNotFound));

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "tx done");
        let err = Error::from_store_with(io, |e| e.kind() == std::io::ErrorKind::NotFound);
        assert_eq!(err.to_string(), "tx done");
    }

    #[test]
    fn test_display_many() {
        let err = Error::from(vec![
            Error::from("common err 1"),
            Error::from("common err 2"),
        ]);
        assert_eq!(err.to_string(), "common err 1; common err 2");
    }

    #[test]
    fn test_has_errors() {
        assert!(Error::from("some error").has_errors());
        assert!(Error::from(vec![Error::from("some error")]).has_errors());
        assert!(!Error::from(Vec::<Error>::new()).has_errors());
        assert!(!Error::from(BTreeMap::<String, Error>::new()).has_errors());

        let mut fields = BTreeMap::new();
        fields.insert("some error".to_string(), Error::from("some error"));
        assert!(Error::from(fields).has_errors());
    }

    #[test]
    fn test_default_classifier_is_shared() {
        assert!(std::ptr::eq(default_classifier(), default_classifier()));

        let res = Error::RecordNotFound.into_response();
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let info = res.extensions().get::<ErrorInfo>().unwrap();
        assert!(matches!(*info.error, Error::RecordNotFound));
    }

    #[test]
    fn test_debug_payload() {
        let err = Error::from_store(FakeDbError::ConnDone);
        let payload = debug_payload(&err);
        assert_eq!(payload["error"], "connection is already closed");
        assert_eq!(payload["sources"][0], "connection is already closed");
    }
}
