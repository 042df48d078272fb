//! Domain layer - Core business logic and entities

pub mod error;
pub mod health;
pub mod llm;
pub mod storage;
pub mod transform;
pub mod workflow;

pub use error::DomainError;
pub use health::{
    ConnectionStatus, ConnectivityError, HealthStatus, OrchestratorProbe, ServiceHealth,
    ServiceProbe, SystemStatus,
};
pub use llm::{FinishReason, LlmProvider, LlmRequest, LlmResponse, Message, MessageRole, Usage};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use transform::{StepTransformer, TransformError};
pub use workflow::{
    validate_workflow, RunOutcome, StepFailure, StepKind, StepResult, StepSelection, Workflow,
    WorkflowDefinition, WorkflowError, WorkflowExecutor, WorkflowId, WorkflowRun,
};
