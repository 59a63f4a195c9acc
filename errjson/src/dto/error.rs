use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tree::ValidationTree;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Error,
    Warning,
    Info,
}

/// Either a plain message or a per-field mapping of messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Text(String),
    Fields(BTreeMap<String, String>),
}

impl From<&str> for Message {
    fn from(val: &str) -> Self {
        Message::Text(val.to_string())
    }
}

impl From<String> for Message {
    fn from(val: String) -> Self {
        Message::Text(val)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationTree>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug: Option<serde_json::Value>,
}

impl ErrorObject {
    pub fn new(message: impl Into<Message>) -> Self {
        ErrorObject {
            message: Some(message.into()),
            error_type: Some(ErrorType::Error),
            code: None,
            validation: None,
            debug: None,
        }
    }

    /// Validation results carry no message, only the rendered tree.
    pub fn validation(tree: ValidationTree) -> Self {
        ErrorObject {
            message: None,
            error_type: Some(ErrorType::Error),
            code: None,
            validation: Some(tree),
            debug: None,
        }
    }

    pub fn with_type(mut self, error_type: ErrorType) -> Self {
        self.error_type = Some(error_type);
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_debug(mut self, debug: serde_json::Value) -> Self {
        self.debug = Some(debug);
        self
    }
}

/// Response envelope: `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorObject,
}
