//! Application state for shared services

use std::sync::Arc;

use crate::domain::{DomainError, SystemStatus, Workflow, WorkflowRun};
use crate::infrastructure::health::HealthAggregator;
use crate::infrastructure::services::{CreateWorkflowRequest, WorkflowService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub workflow_service: Arc<dyn WorkflowServiceTrait>,
    pub status_service: Arc<dyn StatusServiceTrait>,
}

impl AppState {
    pub fn new(
        workflow_service: Arc<dyn WorkflowServiceTrait>,
        status_service: Arc<dyn StatusServiceTrait>,
    ) -> Self {
        Self {
            workflow_service,
            status_service,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Trait for workflow service operations
#[async_trait::async_trait]
pub trait WorkflowServiceTrait: Send + Sync {
    async fn get(&self, id: &str) -> Result<Workflow, DomainError>;
    async fn list(&self) -> Result<Vec<Workflow>, DomainError>;
    async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError>;
    async fn delete(&self, id: &str) -> Result<(), DomainError>;
    async fn run(&self, id: &str, input_text: &str) -> Result<WorkflowRun, DomainError>;
}

#[async_trait::async_trait]
impl WorkflowServiceTrait for WorkflowService {
    async fn get(&self, id: &str) -> Result<Workflow, DomainError> {
        WorkflowService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<Workflow>, DomainError> {
        WorkflowService::list(self).await
    }

    async fn create(&self, request: CreateWorkflowRequest) -> Result<Workflow, DomainError> {
        WorkflowService::create(self, request).await
    }

    async fn delete(&self, id: &str) -> Result<(), DomainError> {
        WorkflowService::delete(self, id).await
    }

    async fn run(&self, id: &str, input_text: &str) -> Result<WorkflowRun, DomainError> {
        WorkflowService::run(self, id, input_text).await
    }
}

/// Trait for the composite status check
#[async_trait::async_trait]
pub trait StatusServiceTrait: Send + Sync {
    async fn check(&self) -> SystemStatus;
}

#[async_trait::async_trait]
impl StatusServiceTrait for HealthAggregator {
    async fn check(&self) -> SystemStatus {
        HealthAggregator::check(self).await
    }
}
