mod error;
mod failure;

pub use error::flatten_errors;
pub use failure::{FieldFailure, FieldViolation};
