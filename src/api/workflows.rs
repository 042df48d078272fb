//! Workflow endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreateWorkflowBody, Json, ListWorkflowsResponse, RunWorkflowBody,
    RunWorkflowResponse, StepCatalogueEntry, StepCatalogueResponse, WorkflowEnvelope,
    WorkflowResponse,
};
use crate::domain::StepKind;
use crate::infrastructure::services::CreateWorkflowRequest;

/// GET /api/workflows
pub async fn list_workflows(
    State(state): State<AppState>,
) -> Result<Json<ListWorkflowsResponse>, ApiError> {
    let workflows = state.workflow_service.list().await?;

    Ok(Json(ListWorkflowsResponse {
        success: true,
        workflows: workflows.iter().map(WorkflowResponse::from).collect(),
    }))
}

/// POST /api/workflows
pub async fn create_workflow(
    State(state): State<AppState>,
    Json(body): Json<CreateWorkflowBody>,
) -> Result<(StatusCode, Json<WorkflowEnvelope>), ApiError> {
    debug!(name = %body.name, steps = body.steps.len(), "Creating workflow");

    let request = CreateWorkflowRequest {
        name: body.name,
        description: body.description,
        steps: body.steps.into_iter().map(String::from).collect(),
    };

    let workflow = state.workflow_service.create(request).await?;

    Ok((StatusCode::CREATED, Json(WorkflowEnvelope::from(&workflow))))
}

/// GET /api/workflows/{id}
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<WorkflowEnvelope>, ApiError> {
    let workflow = state.workflow_service.get(&workflow_id).await?;

    Ok(Json(WorkflowEnvelope::from(&workflow)))
}

/// DELETE /api/workflows/{id}
pub async fn delete_workflow(
    State(state): State<AppState>,
    Path(workflow_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    debug!(workflow_id = %workflow_id, "Deleting workflow");

    state.workflow_service.delete(&workflow_id).await?;

    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/workflows/run
///
/// A failing step answers 502 with the partial results and the failed step.
pub async fn run_workflow(
    State(state): State<AppState>,
    Json(body): Json<RunWorkflowBody>,
) -> Result<Response, ApiError> {
    debug!(workflow_id = %body.workflow_id, "Running workflow");

    let run = state
        .workflow_service
        .run(&body.workflow_id, &body.input_text)
        .await?;

    let status = if run.is_completed() {
        StatusCode::OK
    } else {
        StatusCode::BAD_GATEWAY
    };

    Ok((status, Json(RunWorkflowResponse::from(run))).into_response())
}

/// GET /api/steps
pub async fn list_steps() -> Json<StepCatalogueResponse> {
    Json(StepCatalogueResponse {
        success: true,
        steps: StepKind::ALL.into_iter().map(StepCatalogueEntry::from).collect(),
    })
}
