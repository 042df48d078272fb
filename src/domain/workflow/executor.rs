//! Workflow executor trait and run result types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::entity::{Workflow, WorkflowId};
use super::error::WorkflowError;
use super::step_kind::StepKind;
use crate::domain::transform::TransformError;

/// Output of one successfully executed step.
///
/// A run's results only ever hold completed steps, so `success` is always true and
/// `error` always `None`. The step that stopped a run is reported as a [`StepFailure`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub kind: StepKind,
    pub output: String,
    pub success: bool,
    /// Kept on the wire for clients that read it; never set by the executor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    /// Create a successful step result
    pub fn success(kind: StepKind, output: impl Into<String>) -> Self {
        Self {
            kind,
            output: output.into(),
            success: true,
            error: None,
        }
    }
}

/// The step that stopped a run
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub index: usize,
    pub kind: StepKind,
    pub error: TransformError,
}

/// Terminal state of a run
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Every step succeeded
    Completed,
    /// The step at `failure.index` failed and no later step was attempted
    Aborted(StepFailure),
}

/// One execution of a workflow against an input text. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowRun {
    workflow_id: WorkflowId,
    input_text: String,
    results: Vec<StepResult>,
    outcome: RunOutcome,
}

impl WorkflowRun {
    pub fn completed(
        workflow_id: WorkflowId,
        input_text: impl Into<String>,
        results: Vec<StepResult>,
    ) -> Self {
        Self {
            workflow_id,
            input_text: input_text.into(),
            results,
            outcome: RunOutcome::Completed,
        }
    }

    pub fn aborted(
        workflow_id: WorkflowId,
        input_text: impl Into<String>,
        results: Vec<StepResult>,
        failure: StepFailure,
    ) -> Self {
        Self {
            workflow_id,
            input_text: input_text.into(),
            results,
            outcome: RunOutcome::Aborted(failure),
        }
    }

    pub fn workflow_id(&self) -> &WorkflowId {
        &self.workflow_id
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    /// Results of the steps that succeeded, in execution order
    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn outcome(&self) -> &RunOutcome {
        &self.outcome
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, RunOutcome::Completed)
    }

    pub fn failure(&self) -> Option<&StepFailure> {
        match &self.outcome {
            RunOutcome::Completed => None,
            RunOutcome::Aborted(failure) => Some(failure),
        }
    }

    /// Output of the last step, if the run completed
    pub fn final_output(&self) -> Option<&str> {
        if !self.is_completed() {
            return None;
        }
        self.results.last().map(|r| r.output.as_str())
    }

    /// Split into the ordered partial results and the error that stopped the run, if any
    pub fn into_parts(self) -> (Vec<StepResult>, Option<WorkflowError>) {
        let error = match self.outcome {
            RunOutcome::Completed => None,
            RunOutcome::Aborted(StepFailure { index, kind, error }) => {
                Some(WorkflowError::transform(index, kind, error))
            }
        };
        (self.results, error)
    }
}

/// Trait for workflow execution
#[async_trait]
pub trait WorkflowExecutor: Send + Sync + std::fmt::Debug {
    /// Run every step of `workflow` in order, feeding each step the previous step's output.
    /// Step failures are reported through the returned run, never as a panic.
    async fn execute(&self, workflow: &Workflow, input_text: &str) -> WorkflowRun;
}
