//! HTTP request and response types

pub mod error;
pub mod json;
pub mod status;
pub mod workflow;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use status::StatusResponse;
pub use workflow::{
    CreateWorkflowBody, ListWorkflowsResponse, RunWorkflowBody, RunWorkflowResponse,
    StepCatalogueEntry, StepCatalogueResponse, WorkflowEnvelope, WorkflowResponse,
};
