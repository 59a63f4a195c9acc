use axum::{Router, middleware};

use crate::{
    handler::{method_not_allowed_handler, not_found_handler},
    middleware::error_mapper,
    state::ErrorState,
};

/// Adds the not-found and method-not-allowed fallbacks and the error mapper
/// to an application router. Call it after all routes are registered.
pub fn with_error_handling(router: Router, state: ErrorState) -> Router {
    router
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .layer(middleware::from_fn_with_state(state, error_mapper))
}
