//! Shape validation for proposed workflows

use serde::Serialize;

use super::error::WorkflowError;
use super::step_kind::StepKind;

/// Minimum number of steps in a workflow
pub const MIN_STEPS: usize = 2;

/// Maximum number of steps in a workflow
pub const MAX_STEPS: usize = 4;

/// A workflow shape that passed validation but has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowDefinition {
    pub name: String,
    pub description: Option<String>,
    pub steps: Vec<StepKind>,
}

/// Validate a proposed workflow.
///
/// Checks run in a fixed order: name, step count, then step kinds. Step order is kept
/// exactly as submitted. No external effects.
pub fn validate_workflow<S: AsRef<str>>(
    name: &str,
    description: Option<&str>,
    steps: &[S],
) -> Result<WorkflowDefinition, WorkflowError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(WorkflowError::MissingName);
    }

    if !(MIN_STEPS..=MAX_STEPS).contains(&steps.len()) {
        return Err(WorkflowError::step_count_out_of_range(steps.len()));
    }

    let steps = steps
        .iter()
        .map(|s| s.as_ref().parse::<StepKind>())
        .collect::<Result<Vec<_>, _>>()?;

    let description = description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(String::from);

    Ok(WorkflowDefinition {
        name: name.to_string(),
        description,
        steps,
    })
}
