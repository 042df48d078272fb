use std::sync::Arc;

use super::http_client::HttpClient;
use super::OpenAiProvider;
use crate::config::LlmConfig;
use crate::domain::{DomainError, LlmProvider};

/// Factory for creating LLM providers
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create the provider described by the `[llm]` section.
    ///
    /// A missing API key still yields a provider; requests will be rejected by the
    /// remote API and the health probe reports the key as not configured.
    pub fn from_config(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, DomainError> {
        let client = HttpClient::with_timeout(config.request_timeout())?;
        let api_key = config.api_key.clone().unwrap_or_default();

        Ok(Arc::new(OpenAiProvider::with_base_url(
            client,
            api_key,
            &config.base_url,
        )))
    }
}
