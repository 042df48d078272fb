//! Workflow request and response bodies

use serde::{Deserialize, Serialize};

use crate::domain::{StepKind, StepResult, Workflow, WorkflowRun};

/// A step as sent by clients: `{"type": "summarize"}` or the bare `"summarize"`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StepInput {
    Typed {
        #[serde(rename = "type")]
        step_type: String,
    },
    Bare(String),
}

impl From<StepInput> for String {
    fn from(step: StepInput) -> Self {
        match step {
            StepInput::Typed { step_type } => step_type,
            StepInput::Bare(value) => value,
        }
    }
}

/// POST /api/workflows
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWorkflowBody {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub steps: Vec<StepInput>,
}

/// POST /api/workflows/run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunWorkflowBody {
    #[serde(default)]
    pub workflow_id: String,
    #[serde(default)]
    pub input_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRef {
    #[serde(rename = "type")]
    pub step_type: StepKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub steps: Vec<StepRef>,
    pub created_at: String,
}

impl From<&Workflow> for WorkflowResponse {
    fn from(workflow: &Workflow) -> Self {
        Self {
            id: workflow.id().as_str().to_string(),
            name: workflow.name().to_string(),
            description: workflow.description().map(String::from),
            steps: workflow
                .steps()
                .iter()
                .map(|&step_type| StepRef { step_type })
                .collect(),
            created_at: workflow.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkflowEnvelope {
    pub success: bool,
    pub workflow: WorkflowResponse,
}

impl From<&Workflow> for WorkflowEnvelope {
    fn from(workflow: &Workflow) -> Self {
        Self {
            success: true,
            workflow: WorkflowResponse::from(workflow),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListWorkflowsResponse {
    pub success: bool,
    pub workflows: Vec<WorkflowResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepResultResponse {
    pub step: StepKind,
    pub output: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<StepResult> for StepResultResponse {
    fn from(result: StepResult) -> Self {
        Self {
            step: result.kind,
            output: result.output,
            success: result.success,
            error: result.error,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedStepResponse {
    pub index: usize,
    pub step: StepKind,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunWorkflowResponse {
    pub success: bool,
    pub results: Vec<StepResultResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_step: Option<FailedStepResponse>,
}

impl From<WorkflowRun> for RunWorkflowResponse {
    fn from(run: WorkflowRun) -> Self {
        let failed_step = run.failure().map(|f| FailedStepResponse {
            index: f.index,
            step: f.kind,
        });
        let (results, error) = run.into_parts();

        Self {
            success: error.is_none(),
            results: results.into_iter().map(StepResultResponse::from).collect(),
            error: error.map(|e| e.to_string()),
            failed_step,
        }
    }
}

/// One entry of GET /api/steps
#[derive(Debug, Clone, Serialize)]
pub struct StepCatalogueEntry {
    pub value: StepKind,
    pub label: &'static str,
    pub description: &'static str,
}

impl From<StepKind> for StepCatalogueEntry {
    fn from(kind: StepKind) -> Self {
        Self {
            value: kind,
            label: kind.label(),
            description: kind.description(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StepCatalogueResponse {
    pub success: bool,
    pub steps: Vec<StepCatalogueEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{validate_workflow, StepFailure, TransformError, WorkflowId};

    #[test]
    fn test_create_body_accepts_both_step_forms() {
        let body: CreateWorkflowBody = serde_json::from_str(
            r#"{"name": "Mixed", "steps": [{"type": "clean-text"}, "summarize"]}"#,
        )
        .unwrap();

        let steps: Vec<String> = body.steps.into_iter().map(String::from).collect();
        assert_eq!(steps, vec!["clean-text", "summarize"]);
        assert!(body.description.is_none());
    }

    #[test]
    fn test_run_body_is_camel_case() {
        let body: RunWorkflowBody =
            serde_json::from_str(r#"{"workflowId": "wf-1", "inputText": "hello"}"#).unwrap();
        assert_eq!(body.workflow_id, "wf-1");
        assert_eq!(body.input_text, "hello");
    }

    #[test]
    fn test_workflow_response_shape() {
        let workflow = Workflow::new(
            WorkflowId::new("wf-1").unwrap(),
            validate_workflow("Digest", None, &["summarize", "tag-category"]).unwrap(),
        );

        let json = serde_json::to_value(WorkflowResponse::from(&workflow)).unwrap();
        assert_eq!(json["_id"], "wf-1");
        assert!(json.get("id").is_none());
        assert_eq!(json["steps"][0]["type"], "summarize");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("description").is_none());
    }

    #[test]
    fn test_aborted_run_response() {
        let run = WorkflowRun::aborted(
            WorkflowId::new("wf-1").unwrap(),
            "text",
            vec![StepResult::success(StepKind::CleanText, "clean")],
            StepFailure {
                index: 1,
                kind: StepKind::Summarize,
                error: TransformError::provider("quota exceeded"),
            },
        );

        let json = serde_json::to_value(RunWorkflowResponse::from(run)).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["results"].as_array().unwrap().len(), 1);
        assert_eq!(json["results"][0]["step"], "clean-text");
        assert_eq!(json["failedStep"]["index"], 1);
        assert_eq!(json["failedStep"]["step"], "summarize");
        assert!(json["error"].as_str().unwrap().contains("quota exceeded"));
    }
}
