use errjson::Error;

pub async fn not_found_handler() -> Error {
    Error::RouteNotFound
}

pub async fn method_not_allowed_handler() -> Error {
    Error::MethodNotAllowed
}
