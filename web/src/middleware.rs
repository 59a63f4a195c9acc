use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use errjson::ErrorInfo;

use crate::{lang::negotiate, response::make_response, state::ErrorState};

/// Re-renders `errjson::Error` responses with the configured catalog in the
/// language the client asked for.
pub async fn error_mapper(State(state): State<ErrorState>, request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let lang = negotiate(&parts, state.default_lang());
    let request = Request::from_parts(parts, body);

    let res = next.run(request).await;
    let Some(info) = res.extensions().get::<ErrorInfo>().cloned() else {
        return res;
    };

    make_response(&state.classifier, &info.error, lang.as_str())
}
