use serde::Deserialize;
use snafu::{ResultExt, ensure};
use std::env;
use std::path::PathBuf;

use crate::catalog::Catalog;
use crate::error::{ConfigParseSnafu, ConfigSnafu};
use crate::{DEFAULT_LANG, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Language used when a request asks for one the catalog lacks
    #[serde(default = "default_lang")]
    pub default_lang: String,

    /// TOML file with extra or overriding message patterns
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    #[serde(default)]
    pub debug: bool,
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            default_lang: default_lang(),
            catalog_path: None,
            debug: false,
        }
    }
}

impl Config {
    pub fn build() -> Result<Self> {
        // Build the config from ENV vars
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Reads `ERRJSON_DEFAULT_LANG`, `ERRJSON_CATALOG_PATH` and `ERRJSON_DEBUG`
    /// through `lookup`.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_lang = lookup("ERRJSON_DEFAULT_LANG").unwrap_or_else(default_lang);
        let catalog_path = lookup("ERRJSON_CATALOG_PATH")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        let debug = match lookup("ERRJSON_DEBUG").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return ConfigSnafu {
                    msg: format!("ERRJSON_DEBUG must be true or false, got {:?}.", other),
                }
                .fail();
            }
        };

        Config {
            default_lang,
            catalog_path,
            debug,
        }
        .validate()
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context(ConfigParseSnafu)?;
        config.validate()
    }

    /// Built-in catalog merged with the one at `catalog_path`, if any.
    pub fn catalog(&self) -> Result<Catalog> {
        let catalog = Catalog::builtin();
        match &self.catalog_path {
            Some(path) => Ok(catalog.merge(Catalog::load(path)?)),
            None => Ok(catalog),
        }
    }

    fn validate(self) -> Result<Self> {
        // Validate config values
        ensure!(
            !self.default_lang.trim().is_empty(),
            ConfigSnafu {
                msg: "Default language is required.".to_string()
            }
        );

        Ok(self)
    }
}
