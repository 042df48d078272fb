//! Workflow service - define, list, delete and run workflows

use std::sync::Arc;

use tracing::info;

use crate::domain::storage::Storage;
use crate::domain::{
    validate_workflow, DomainError, Workflow, WorkflowError, WorkflowExecutor, WorkflowId,
    WorkflowRun,
};

/// Request to create a new workflow
#[derive(Debug, Clone)]
pub struct CreateWorkflowRequest {
    pub name: String,
    pub description: Option<String>,
    /// Step kinds in wire form, validated on create
    pub steps: Vec<String>,
}

impl CreateWorkflowRequest {
    pub fn new(name: impl Into<String>, steps: Vec<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            steps,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Workflow service
pub struct WorkflowService {
    storage: Arc<dyn Storage<Workflow>>,
    executor: Arc<dyn WorkflowExecutor>,
}

impl std::fmt::Debug for WorkflowService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowService")
            .field("storage", &self.storage.backend_name())
            .finish()
    }
}

impl WorkflowService {
    /// Create a new workflow service
    pub fn new(storage: Arc<dyn Storage<Workflow>>, executor: Arc<dyn WorkflowExecutor>) -> Self {
        Self { storage, executor }
    }

    /// Get a workflow by ID
    pub async fn get(&self, id: &str) -> Result<Workflow, DomainError> {
        let workflow_id = Self::parse_id(id)?;

        self.storage
            .get(&workflow_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found(id).into())
    }

    /// List all workflows, oldest first
    pub async fn list(&self) -> Result<Vec<Workflow>, DomainError> {
        let mut workflows = self.storage.list().await?;
        workflows.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });
        Ok(workflows)
    }

    /// Validate and store a new workflow under a fresh ID
    pub async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError> {
        let definition = validate_workflow(
            &request.name,
            request.description.as_deref(),
            request.steps.as_slice(),
        )?;

        let workflow = self
            .storage
            .create(Workflow::new(WorkflowId::generate(), definition))
            .await?;

        info!(
            workflow_id = %workflow.id(),
            steps = workflow.steps().len(),
            "Workflow created"
        );

        Ok(workflow)
    }

    /// Delete a workflow
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        let workflow_id = Self::parse_id(id)?;

        if !self.storage.delete(&workflow_id).await? {
            return Err(WorkflowError::not_found(id).into());
        }

        info!(workflow_id = %workflow_id, "Workflow deleted");
        Ok(())
    }

    /// Run a stored workflow against `input_text`.
    ///
    /// Blank input is rejected before the store is consulted. A failing step does not
    /// make this an `Err`; the returned run carries the partial results and the failure.
    pub async fn run(&self, id: &str, input_text: &str) -> Result<WorkflowRun, DomainError> {
        if input_text.trim().is_empty() {
            return Err(WorkflowError::MissingInput.into());
        }

        let workflow = self.get(id).await?;

        Ok(self.executor.execute(&workflow, input_text).await)
    }

    fn parse_id(id: &str) -> Result<WorkflowId, DomainError> {
        WorkflowId::new(id).map_err(DomainError::from)
    }
}
