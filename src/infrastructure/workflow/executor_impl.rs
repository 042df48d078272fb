//! Workflow executor implementation

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::ExecutorConfig;
use crate::domain::{
    StepFailure, StepKind, StepResult, StepTransformer, TransformError, Workflow,
    WorkflowExecutor, WorkflowRun,
};
use crate::infrastructure::observability::{record_step, record_workflow_run};

/// Configuration for the workflow executor
#[derive(Debug, Clone)]
pub struct WorkflowExecutorConfig {
    /// Upper bound for a single transformation call
    pub step_timeout: Duration,
}

impl Default for WorkflowExecutorConfig {
    fn default() -> Self {
        Self {
            step_timeout: Duration::from_secs(60),
        }
    }
}

impl From<&ExecutorConfig> for WorkflowExecutorConfig {
    fn from(config: &ExecutorConfig) -> Self {
        Self {
            step_timeout: config.step_timeout(),
        }
    }
}

/// Sequential, fail-fast pipeline executor.
///
/// Step `i` receives the output of step `i - 1`; the first step receives the run's
/// input text. The first failing step ends the run and no later step is attempted.
#[derive(Debug)]
pub struct WorkflowExecutorImpl {
    transformer: Arc<dyn StepTransformer>,
    config: WorkflowExecutorConfig,
}

impl WorkflowExecutorImpl {
    /// Create a new executor
    pub fn new(transformer: Arc<dyn StepTransformer>) -> Self {
        Self::with_config(transformer, WorkflowExecutorConfig::default())
    }

    /// Create with custom configuration
    pub fn with_config(
        transformer: Arc<dyn StepTransformer>,
        config: WorkflowExecutorConfig,
    ) -> Self {
        Self {
            transformer,
            config,
        }
    }

    /// Execute a single step under the step timeout
    async fn execute_step(&self, kind: StepKind, text: &str) -> Result<String, TransformError> {
        let timeout = self.config.step_timeout;

        match tokio::time::timeout(timeout, self.transformer.transform(kind, text)).await {
            Ok(Ok(output)) if output.trim().is_empty() => Err(TransformError::EmptyOutput),
            Ok(result) => result,
            Err(_) => Err(TransformError::Timeout {
                timeout_ms: timeout.as_millis() as u64,
            }),
        }
    }
}

#[async_trait]
impl WorkflowExecutor for WorkflowExecutorImpl {
    async fn execute(&self, workflow: &Workflow, input_text: &str) -> WorkflowRun {
        let start = Instant::now();
        let mut results: Vec<StepResult> = Vec::with_capacity(workflow.steps().len());
        let mut current = input_text.to_string();

        debug!(
            workflow_id = %workflow.id(),
            steps = workflow.steps().len(),
            "Executing workflow"
        );

        for (index, kind) in workflow.steps().iter().copied().enumerate() {
            let step_start = Instant::now();
            debug!(workflow_id = %workflow.id(), index, step = %kind, "Executing step");

            match self.execute_step(kind, &current).await {
                Ok(output) => {
                    record_step(kind, true, step_start.elapsed());
                    results.push(StepResult::success(kind, output.clone()));
                    current = output;
                }
                Err(error) => {
                    record_step(kind, false, step_start.elapsed());
                    record_workflow_run(false, index + 1, start.elapsed());
                    warn!(
                        workflow_id = %workflow.id(),
                        index,
                        step = %kind,
                        error = %error,
                        "Workflow step failed, aborting run"
                    );

                    return WorkflowRun::aborted(
                        workflow.id().clone(),
                        input_text,
                        results,
                        StepFailure { index, kind, error },
                    );
                }
            }
        }

        record_workflow_run(true, results.len(), start.elapsed());
        info!(
            workflow_id = %workflow.id(),
            steps = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Workflow run completed"
        );

        WorkflowRun::completed(workflow.id().clone(), input_text, results)
    }
}
