use std::sync::Arc;

use crate::{
    config::Config,
    db::{InMemoryResultsStore, ResultsStore},
    error::AppResult,
    services::{
        providers::{LlmProvider, OpenAiProvider},
        Catalog, Gateway, LlmSettings, PromptLog, RecommendationService,
    },
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub recommendations: Arc<RecommendationService>,
    pub catalog: Catalog,
}

impl AppState {
    /// Wires the services around an injected provider and results store
    pub fn new(
        config: &Config,
        provider: Arc<dyn LlmProvider>,
        store: Arc<dyn ResultsStore>,
    ) -> Self {
        let catalog = Catalog::new(config.catalog_path.clone());
        let gateway = Gateway::new(
            provider,
            LlmSettings::from(config),
            PromptLog::new(config.prompt_log_path.clone()),
        );

        Self {
            recommendations: Arc::new(RecommendationService::new(catalog.clone(), gateway, store)),
            catalog,
        }
    }

    /// Production wiring: OpenAI provider and the in-memory results store
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider = Arc::new(OpenAiProvider::new(config)?);
        Ok(Self::new(config, provider, Arc::new(InMemoryResultsStore::new())))
    }
}
