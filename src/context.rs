use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AppConfig, LlmProvider};
use crate::domain::ticket::Vocabulary;
use crate::infra::llm::GeminiClient;
use crate::services::LanguageModelService;
use crate::workflow::classify::Classifier;

pub struct AppContext {
    pub config: AppConfig,
    pub classifier: Classifier,
}

impl AppContext {
    pub fn new(config: AppConfig, classifier: Classifier) -> Self {
        Self { config, classifier }
    }

    /// Wire the classifier from configuration. Without an API key no client
    /// is built and every classification short-circuits to the fallback.
    pub fn from_config(config: AppConfig) -> Self {
        let language_model = config.gemini_api_key.clone().map(|api_key| {
            if let LlmProvider::Custom(provider) = &config.llm_provider {
                warn!("custom LLM provider '{provider}' not yet implemented, using Gemini");
            }
            Arc::new(GeminiClient::new(api_key, config.gemini_model.clone()))
                as Arc<dyn LanguageModelService>
        });

        if language_model.is_none() {
            info!("Gemini API key not configured; classification suggestions are disabled");
        }

        let classifier = Classifier::new(
            language_model,
            Vocabulary::ticket_defaults(),
            config.request_timeout,
        );
        Self::new(config, classifier)
    }
}
