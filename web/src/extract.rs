use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use errjson::Error;

/// JSON body that has passed `validator` checks. Rejects with a 400 for
/// unreadable bodies and a 422 carrying the field failures otherwise.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        if let Err(errors) = value.validate() {
            return Err(Error::from_validation(root_name::<T>(), &errors));
        }

        Ok(ValidJson(value))
    }
}

// `my_app::dto::NewUser` -> `NewUser`
fn root_name<T>() -> &'static str {
    let name = std::any::type_name::<T>();
    let name = name.split('<').next().unwrap_or(name);
    name.rsplit("::").next().unwrap_or(name)
}
