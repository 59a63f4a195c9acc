use std::sync::Arc;

use errjson::{Classifier, Config, Result};

#[derive(Clone, Default)]
pub struct ErrorState {
    pub classifier: Arc<Classifier>,
}

impl ErrorState {
    pub fn new(classifier: Classifier) -> Self {
        ErrorState {
            classifier: Arc::new(classifier),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(Classifier::from_config(config)?))
    }

    pub fn default_lang(&self) -> &str {
        self.classifier.renderer().default_lang()
    }
}
