// Task handlers
//
// Each handler is one fixed pipeline. Identity verification has already run
// in `require_identity` by the time any of these are called; the verified
// caller arrives as an `Identity` extension.
//
//   list    GET    /api/tasks       -> accessor.list
//   get     GET    /api/tasks/:id   -> accessor.get_one
//   create  POST   /api/tasks       -> validate(create-task) -> accessor.create
//   update  PUT    /api/tasks/:id   -> validate(update-task) -> accessor.update
//   delete  DELETE /api/tasks/:id   -> accessor.delete

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use serde_json::Value;

use crate::app::AppState;
use crate::auth::Identity;
use crate::database::models::{Task, TaskDraft, TaskPatch};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::validation::{self, RuleSet, ValidatedFields, Violation, CREATE_TASK, UPDATE_TASK};

/// GET /api/tasks - All tasks owned by the caller, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> ApiResult<Vec<Task>> {
    let tasks = state.accessor.list(&identity).await?;
    Ok(ApiResponse::collection(tasks))
}

/// GET /api/tasks/:id - A single task owned by the caller
pub async fn get(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Task> {
    let id = task_id(id)?;
    let task = state.accessor.get_one(&identity, &id).await?;
    Ok(ApiResponse::success(task))
}

/// POST /api/tasks - Create a task owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Task> {
    let fields = validated(&CREATE_TASK, body)?;
    let task = state
        .accessor
        .create(&identity, TaskDraft::from_fields(&fields))
        .await?;

    Ok(ApiResponse::created(task).with_message("Task created successfully"))
}

/// PUT /api/tasks/:id - Change the provided fields of a task owned by the caller
pub async fn update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Task> {
    let fields = validated(&UPDATE_TASK, body)?;
    let id = task_id(id)?;
    let task = state
        .accessor
        .update(&identity, &id, TaskPatch::from_fields(&fields))
        .await?;

    Ok(ApiResponse::success(task).with_message("Task updated successfully"))
}

/// DELETE /api/tasks/:id - Remove a task owned by the caller
pub async fn delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    id: Result<Path<String>, PathRejection>,
) -> ApiResult<Task> {
    let id = task_id(id)?;
    let task = state.accessor.delete(&identity, &id).await?;
    Ok(ApiResponse::success(task).with_message("Task deleted successfully"))
}

/// Run `rule_set` over the request body, aggregating every violation.
fn validated(
    rule_set: &RuleSet,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<ValidatedFields, ApiError> {
    let Json(body) = body.map_err(|rejection| {
        ApiError::validation_failed(vec![Violation::new("body", rejection.body_text())])
    })?;

    validation::validate(rule_set, &body).map_err(ApiError::validation_failed)
}

/// The raw `:id` segment. A segment that does not even decode (bad
/// percent-encoding, invalid UTF-8) is as malformed as one that is not a UUID.
fn task_id(id: Result<Path<String>, PathRejection>) -> Result<String, ApiError> {
    let Path(id) = id.map_err(|rejection| {
        tracing::debug!("Rejected task id segment: {}", rejection.body_text());
        ApiError::invalid_identifier()
    })?;
    Ok(id)
}
