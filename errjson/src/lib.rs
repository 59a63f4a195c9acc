mod catalog;
mod classifier;
mod config;
pub mod dto;
mod error;
pub mod path;
mod renderer;
pub mod tree;
pub mod validators;

pub use catalog::{Catalog, FALLBACK_RULE, format_pattern};
pub use classifier::Classifier;
pub use config::Config;
pub use error::{Error, ErrorInfo, Result, StoreError, debug_payload};
pub use renderer::Renderer;
pub use tree::{Node, ValidationTree};

/// Language used when nothing else is configured.
pub const DEFAULT_LANG: &str = "en";
