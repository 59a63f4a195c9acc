use axum::Json;
use axum::response::{IntoResponse, Response};
use tracing::error;

use errjson::dto::ErrorResponse;
use errjson::{Classifier, Error};

/// Classifies `err` in `lang` and builds the JSON error response.
pub fn make_response(classifier: &Classifier, err: &Error, lang: &str) -> Response {
    let (status_code, error) = classifier.classify(err, lang);
    if status_code.is_server_error() {
        error!("{}", err);
    }

    (status_code, Json(ErrorResponse { error })).into_response()
}
