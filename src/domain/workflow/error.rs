//! Workflow error types

use thiserror::Error;

use super::step_kind::StepKind;
use crate::domain::transform::TransformError;
use crate::domain::DomainError;

/// Errors that can occur while defining or running workflows
#[derive(Debug, Clone, Error, PartialEq)]
pub enum WorkflowError {
    #[error("missing name")]
    MissingName,

    #[error("step count out of range")]
    StepCountOutOfRange { count: usize },

    #[error("unknown step type")]
    UnknownStepType { value: String },

    #[error("missing input text")]
    MissingInput,

    #[error("Invalid workflow ID: {0}")]
    InvalidId(String),

    #[error("Workflow not found: {0}")]
    NotFound(String),

    #[error("Step {index} ({kind}) failed: {source}")]
    Transform {
        index: usize,
        kind: StepKind,
        #[source]
        source: TransformError,
    },
}

impl WorkflowError {
    pub fn step_count_out_of_range(count: usize) -> Self {
        Self::StepCountOutOfRange { count }
    }

    pub fn unknown_step_type(value: impl Into<String>) -> Self {
        Self::UnknownStepType {
            value: value.into(),
        }
    }

    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId(message.into())
    }

    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn transform(index: usize, kind: StepKind, source: TransformError) -> Self {
        Self::Transform {
            index,
            kind,
            source,
        }
    }

    /// Whether this error describes a malformed request rather than a runtime failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingName
                | Self::StepCountOutOfRange { .. }
                | Self::UnknownStepType { .. }
                | Self::MissingInput
                | Self::InvalidId(_)
        )
    }
}

impl From<WorkflowError> for DomainError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound(_) => DomainError::not_found(err.to_string()),
            WorkflowError::Transform { .. } => DomainError::provider("step", err.to_string()),
            other => DomainError::validation(other.to_string()),
        }
    }
}
