//! Workflow Builder
//!
//! Define short pipelines of LLM text transformations and run them against input text:
//! - Workflows of 2 to 4 steps drawn from a fixed catalogue (clean, summarize,
//!   extract key points, tag)
//! - Sequential, fail-fast execution where each step consumes the previous output
//! - Composite dependency status (orchestrator, store, LLM provider)

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use api::state::AppState;
use domain::{LlmProvider, OrchestratorProbe, Storage, Workflow, WorkflowExecutor};
use infrastructure::{
    health::{
        HealthAggregator, HttpOrchestratorProbe, LlmProviderProbe, LocalOrchestratorProbe,
        StorageProbe,
    },
    llm::LlmProviderFactory,
    services::WorkflowService,
    storage::{StorageConfig, StorageFactory},
    transform::LlmStepTransformer,
    workflow::{WorkflowExecutorConfig, WorkflowExecutorImpl},
};

const WORKFLOWS_TABLE: &str = "workflows";

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage = create_workflow_storage(config).await?;
    let llm_provider = create_llm_provider(config)?;

    let executor = create_executor(config, llm_provider.clone());
    let workflow_service = WorkflowService::new(storage.clone(), executor);
    let health = create_health_aggregator(config, storage, llm_provider)?;

    Ok(AppState::new(Arc::new(workflow_service), Arc::new(health)))
}

/// Workflow store selected by `storage.backend`
pub async fn create_workflow_storage(
    config: &AppConfig,
) -> anyhow::Result<Arc<dyn Storage<Workflow>>> {
    let storage_config = StorageConfig::from_settings(&config.storage)?;
    info!(backend = ?storage_config.storage_type(), "Initializing workflow storage");

    StorageFactory::create::<Workflow>(&storage_config, WORKFLOWS_TABLE)
        .await
        .context("Failed to initialize workflow storage")
}

/// OpenAI-compatible provider from the `[llm]` section
pub fn create_llm_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn LlmProvider>> {
    if config.llm.api_key.is_none() {
        tracing::warn!("No LLM API key configured; workflow runs will fail until one is set");
    }

    Ok(LlmProviderFactory::from_config(&config.llm)?)
}

/// Pipeline executor backed by the LLM step transformer
pub fn create_executor(
    config: &AppConfig,
    llm_provider: Arc<dyn LlmProvider>,
) -> Arc<dyn WorkflowExecutor> {
    let transformer = LlmStepTransformer::new(llm_provider, &config.llm.model)
        .with_temperature(config.llm.temperature);

    Arc::new(WorkflowExecutorImpl::with_config(
        Arc::new(transformer),
        WorkflowExecutorConfig::from(&config.executor),
    ))
}

/// Health aggregator wired to the configured dependencies
pub fn create_health_aggregator(
    config: &AppConfig,
    storage: Arc<dyn Storage<Workflow>>,
    llm_provider: Arc<dyn LlmProvider>,
) -> anyhow::Result<HealthAggregator> {
    let probe_timeout = config.health.probe_timeout();

    let orchestrator: Arc<dyn OrchestratorProbe> = match config.health.orchestrator_url {
        Some(ref url) => {
            info!(url = %url, "Probing remote orchestrator");
            Arc::new(HttpOrchestratorProbe::new(url, probe_timeout)?)
        }
        None => Arc::new(LocalOrchestratorProbe),
    };

    let llm_probe = LlmProviderProbe::new(
        llm_provider,
        &config.llm.model,
        config.llm.api_key.is_some(),
    );

    Ok(HealthAggregator::new(
        orchestrator,
        Arc::new(StorageProbe::new(storage)),
        Arc::new(llm_probe),
        probe_timeout,
    ))
}
