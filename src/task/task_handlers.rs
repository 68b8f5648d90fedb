use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    middleware::CurrentUser,
    state::AppState,
    user::MessageResponse,
};
use super::{
    task_dto::{
        CreateSubTaskRequest, CreateTaskRequest, PostActivityRequest, TaskFilters,
        TaskListResponse, TaskQuery, TaskResponse, TrashAction, TrashActionQuery,
        UpdateTaskRequest,
    },
    task_models::Requester,
};

fn task_response(message: &str, task: super::task_models::Task) -> Json<TaskResponse> {
    Json(TaskResponse {
        status: true,
        message: message.to_string(),
        task,
    })
}

/// Create a task and notify its team
#[utoipa::path(
    post,
    path = "/api/task/create",
    request_body = CreateTaskRequest,
    responses(
        (status = 201, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn create_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(payload): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    payload.validate()?;

    let task = state.task_service.create_task(current.id, payload).await?;

    Ok((StatusCode::CREATED, task_response("Task created Successfully", task)))
}

/// Duplicate a task under a new title
#[utoipa::path(
    post,
    path = "/api/task/duplicate/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 201, description = "Task duplicated", body = TaskResponse),
        (status = 404, description = "Task not found"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn duplicate_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let task = state.task_service.duplicate_task(task_id).await?;

    Ok((StatusCode::CREATED, task_response("Task Duplicated successfully", task)))
}

/// Append an entry to a task's activity timeline
#[utoipa::path(
    post,
    path = "/api/task/activity/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = PostActivityRequest,
    responses(
        (status = 200, description = "Activity posted", body = MessageResponse),
        (status = 403, description = "Not a member of this task"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn post_task_activity(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<PostActivityRequest>,
) -> Result<Json<MessageResponse>> {
    payload.validate()?;

    state
        .task_service
        .post_activity(Requester::from(&current), task_id, payload)
        .await?;

    Ok(Json(MessageResponse::ok("Activity posted successfully")))
}

/// List tasks visible to the caller
#[utoipa::path(
    get,
    path = "/api/task",
    params(
        ("stage" = Option<String>, Query, description = "todo, in progress or completed"),
        ("isTrashed" = Option<String>, Query, description = "\"true\" lists the trash"),
        ("search" = Option<String>, Query, description = "Case-insensitive title search")
    ),
    responses(
        (status = 200, description = "List of tasks", body = TaskListResponse),
        (status = 400, description = "Unknown stage"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn get_tasks(
    State(state): State<AppState>,
    current: CurrentUser,
    Query(query): Query<TaskQuery>,
) -> Result<Json<TaskListResponse>> {
    let filters = TaskFilters::try_from(query)?;

    let tasks = state
        .task_service
        .list_tasks(Requester::from(&current), filters)
        .await?;

    Ok(Json(TaskListResponse { status: true, tasks }))
}

/// Get a single task
#[utoipa::path(
    get,
    path = "/api/task/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task found", body = TaskResponse),
        (status = 403, description = "Not a member of this task"),
        (status = 404, description = "Task not found")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn get_task(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(task_id): Path<Uuid>,
) -> Result<Json<TaskResponse>> {
    let task = state
        .task_service
        .get_task(Requester::from(&current), task_id)
        .await?;

    Ok(task_response("Successfully", task))
}

/// Update a task
#[utoipa::path(
    put,
    path = "/api/task/update/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = UpdateTaskRequest,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 404, description = "Task not found"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn update_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>> {
    payload.validate()?;

    let task = state.task_service.update_task(task_id, payload).await?;

    Ok(task_response("Task updated successfully", task))
}

/// Append a sub-task
#[utoipa::path(
    post,
    path = "/api/task/create-subtask/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    request_body = CreateSubTaskRequest,
    responses(
        (status = 200, description = "Sub-task added", body = MessageResponse),
        (status = 404, description = "Task not found"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn create_sub_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Json(payload): Json<CreateSubTaskRequest>,
) -> Result<Json<MessageResponse>> {
    payload.validate()?;

    state.task_service.add_sub_task(task_id, payload).await?;

    Ok(Json(MessageResponse::ok("SubTask added successfully")))
}

/// Move a task to the trash
#[utoipa::path(
    put,
    path = "/api/task/trash/{id}",
    params(("id" = Uuid, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task trashed", body = MessageResponse),
        (status = 404, description = "Task not found"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn trash_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<MessageResponse>> {
    state.task_service.trash_task(task_id).await?;

    Ok(Json(MessageResponse::ok("Task trashed successfully")))
}

/// Delete or restore every trashed task
#[utoipa::path(
    delete,
    path = "/api/task/delete-restore",
    params(("actionType" = String, Query, description = "deleteAll or restoreAll")),
    responses(
        (status = 200, description = "Operation performed", body = MessageResponse),
        (status = 400, description = "Unknown action or missing id"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn delete_restore_all(
    State(state): State<AppState>,
    Query(query): Query<TrashActionQuery>,
) -> Result<Json<MessageResponse>> {
    apply_trash_action(&state, &query, None).await
}

/// Delete or restore one task
#[utoipa::path(
    delete,
    path = "/api/task/delete-restore/{id}",
    params(
        ("id" = Uuid, Path, description = "Task ID"),
        ("actionType" = String, Query, description = "delete, deleteAll, restore or restoreAll")
    ),
    responses(
        (status = 200, description = "Operation performed", body = MessageResponse),
        (status = 400, description = "Unknown action"),
        (status = 404, description = "Task not found"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "tasks",
    security(("cookie_auth" = []))
)]
pub async fn delete_restore_task(
    State(state): State<AppState>,
    Path(task_id): Path<Uuid>,
    Query(query): Query<TrashActionQuery>,
) -> Result<Json<MessageResponse>> {
    apply_trash_action(&state, &query, Some(task_id)).await
}

async fn apply_trash_action(
    state: &AppState,
    query: &TrashActionQuery,
    task_id: Option<Uuid>,
) -> Result<Json<MessageResponse>> {
    let action: TrashAction = query.action_type.parse()?;

    state.task_service.apply_trash_action(action, task_id).await?;

    Ok(Json(MessageResponse::ok("Operation performed successfully")))
}
