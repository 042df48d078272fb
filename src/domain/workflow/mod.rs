//! Workflow domain module
//!
//! A workflow is a named, ordered list of two to four text transformations. Running a
//! workflow feeds the input text to the first step and each step's output to the next,
//! stopping at the first failure.

mod entity;
mod error;
mod executor;
mod selection;
mod step_kind;
mod validator;

pub use entity::{validate_workflow_id, Workflow, WorkflowId, MAX_ID_LENGTH};
pub use error::WorkflowError;
pub use executor::{RunOutcome, StepFailure, StepResult, WorkflowExecutor, WorkflowRun};
pub use selection::StepSelection;
pub use step_kind::StepKind;
pub use validator::{validate_workflow, WorkflowDefinition, MAX_STEPS, MIN_STEPS};
