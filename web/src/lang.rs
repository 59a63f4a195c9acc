use std::collections::HashMap;
use std::convert::Infallible;

use axum::extract::{FromRef, FromRequestParts, Query};
use axum::http::request::Parts;

use crate::state::ErrorState;

/// Header (and query parameter) carrying the requested language.
pub const LANG_KEY: &str = "lang";

/// The language requested by the client: `lang` header, then `lang` query
/// parameter, then the configured default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lang(pub String);

impl Lang {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S> FromRequestParts<S> for Lang
where
    ErrorState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ErrorState::from_ref(state);
        Ok(negotiate(parts, state.default_lang()))
    }
}

pub fn negotiate(parts: &Parts, default_lang: &str) -> Lang {
    let header = parts
        .headers
        .get(LANG_KEY)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim())
        .filter(|value| !value.is_empty());

    if let Some(lang) = header {
        return Lang(lang.to_string());
    }

    let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
        .ok()
        .and_then(|Query(params)| params.get(LANG_KEY).cloned())
        .filter(|value| !value.trim().is_empty());

    Lang(query.unwrap_or_else(|| default_lang.to_string()))
}
