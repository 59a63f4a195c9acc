use serde::{Deserialize, Serialize};

/// A single failed rule for a field, as reported by a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    /// Dotted/bracketed path including the root struct, e.g. `Struct.Items[2].Email`.
    pub namespace: String,
    pub rule: String,
    pub param: Option<String>,
}

impl FieldFailure {
    pub fn new(namespace: impl Into<String>, rule: impl Into<String>) -> Self {
        FieldFailure {
            namespace: namespace.into(),
            rule: rule.into(),
            param: None,
        }
    }

    pub fn with_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }
}

/// A field violation carrying its own description, as in gRPC `BadRequest`
/// details. The field path has no root segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub description: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, description: impl Into<String>) -> Self {
        FieldViolation {
            field: field.into(),
            description: description.into(),
        }
    }
}
