use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::health::{LLM_SERVICE, BACKEND_SERVICE, DATABASE_SERVICE};
use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::{ConnectivityError, DomainError, LlmProvider, OrchestratorProbe, ServiceProbe};

/// The serving process is the orchestrator; answering at all means reachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalOrchestratorProbe;

#[async_trait]
impl OrchestratorProbe for LocalOrchestratorProbe {
    async fn ping(&self) -> Result<(), ConnectivityError> {
        Ok(())
    }
}

/// Probes a remote orchestration API with `GET {base_url}/health`
#[derive(Debug, Clone)]
pub struct HttpOrchestratorProbe {
    client: reqwest::Client,
    health_url: String,
}

impl HttpOrchestratorProbe {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            health_url: format!("{}/health", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl OrchestratorProbe for HttpOrchestratorProbe {
    async fn ping(&self) -> Result<(), ConnectivityError> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| ConnectivityError::unreachable(BACKEND_SERVICE, e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ConnectivityError::unreachable(
                BACKEND_SERVICE,
                format!("HTTP {}", response.status()),
            ))
        }
    }
}

/// Pings the workflow store; the detail names the backend
pub struct StorageProbe<E: StorageEntity + 'static> {
    storage: Arc<dyn Storage<E>>,
}

impl<E: StorageEntity + 'static> StorageProbe<E> {
    pub fn new(storage: Arc<dyn Storage<E>>) -> Self {
        Self { storage }
    }
}

#[async_trait]
impl<E: StorageEntity + 'static> ServiceProbe for StorageProbe<E> {
    async fn check(&self) -> Result<String, ConnectivityError> {
        self.storage
            .ping()
            .await
            .map_err(|e| ConnectivityError::unreachable(DATABASE_SERVICE, e.to_string()))?;

        Ok(self.storage.backend_name().to_string())
    }
}

/// Pings the LLM provider; the detail names the configured model
#[derive(Debug)]
pub struct LlmProviderProbe {
    provider: Arc<dyn LlmProvider>,
    model: String,
    api_key_configured: bool,
}

impl LlmProviderProbe {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        api_key_configured: bool,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            api_key_configured,
        }
    }
}

#[async_trait]
impl ServiceProbe for LlmProviderProbe {
    async fn check(&self) -> Result<String, ConnectivityError> {
        if !self.api_key_configured {
            return Err(ConnectivityError::not_configured(
                LLM_SERVICE,
                "LLM API key not configured",
            ));
        }

        self.provider
            .ping()
            .await
            .map_err(|e| ConnectivityError::unreachable(LLM_SERVICE, e.to_string()))?;

        Ok(format!("{} ({})", self.model, self.provider.provider_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm::MockLlmProvider;
    use crate::domain::storage::mock::MockStorage;
    use crate::domain::Workflow;
    use crate::infrastructure::storage::InMemoryStorage;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_local_orchestrator_is_reachable() {
        assert!(LocalOrchestratorProbe.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_http_orchestrator_reachable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let probe =
            HttpOrchestratorProbe::new(&format!("{}/", mock_server.uri()), Duration::from_secs(1))
                .unwrap();

        assert!(probe.ping().await.is_ok());
    }

    #[tokio::test]
    async fn test_http_orchestrator_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let probe = HttpOrchestratorProbe::new(&mock_server.uri(), Duration::from_secs(1)).unwrap();

        let err = probe.ping().await.unwrap_err();
        assert_eq!(err.target(), BACKEND_SERVICE);
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_http_orchestrator_refused() {
        let probe =
            HttpOrchestratorProbe::new("http://127.0.0.1:1", Duration::from_millis(200)).unwrap();

        assert!(matches!(
            probe.ping().await,
            Err(ConnectivityError::Unreachable { .. })
        ));
    }

    #[tokio::test]
    async fn test_storage_probe_names_backend() {
        let probe = StorageProbe::new(Arc::new(InMemoryStorage::<Workflow>::new()));
        assert_eq!(probe.check().await, Ok("memory".to_string()));
    }

    #[tokio::test]
    async fn test_storage_probe_failure() {
        let storage = MockStorage::<Workflow>::new().with_error("connection refused");
        let probe = StorageProbe::new(Arc::new(storage));

        let err = probe.check().await.unwrap_err();
        assert_eq!(err.target(), DATABASE_SERVICE);
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_llm_probe_without_api_key() {
        let provider = Arc::new(MockLlmProvider::new("openai"));
        let probe = LlmProviderProbe::new(provider, "gpt-4o-mini", false);

        assert_eq!(
            probe.check().await.unwrap_err().to_string(),
            "LLM API key not configured"
        );
    }

    #[tokio::test]
    async fn test_llm_probe_reports_model() {
        let provider = Arc::new(MockLlmProvider::new("openai"));
        let probe = LlmProviderProbe::new(provider, "gpt-4o-mini", true);

        assert_eq!(probe.check().await, Ok("gpt-4o-mini (openai)".to_string()));
    }

    #[tokio::test]
    async fn test_llm_probe_ping_failure() {
        let provider = Arc::new(MockLlmProvider::new("openai").with_ping_error("HTTP 401"));
        let probe = LlmProviderProbe::new(provider, "gpt-4o-mini", true);

        let err = probe.check().await.unwrap_err();
        assert!(matches!(err, ConnectivityError::Unreachable { .. }));
        assert!(err.to_string().contains("HTTP 401"));
    }
}
