//! Task CRUD handlers.
//!
//! Every route acts on the caller's own partition, keyed by the token's
//! username. Mutations answer with a [`MutationResponse`] envelope.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use taskmanager_auth::{CurrentUser, ServiceCaller};
use taskmanager_core::keys::strip_user_prefix;
use taskmanager_core::notification::CreateNotificationRequest;
use taskmanager_core::storage::RepositoryError;
use taskmanager_core::task::{
    validate_create, validate_update, CreateTaskInput, MutationResponse, Task, TaskUpdate,
    UpdateTaskInput,
};

use crate::{
    handlers::{AppError, PageQuery},
    state::AppState,
};

type Mutation = (StatusCode, Json<MutationResponse>);

fn mutation(status: StatusCode, response: MutationResponse) -> Mutation {
    (status, Json(response))
}

/// A failed store call reported under `key`.
fn store_failure(key: &str, err: RepositoryError) -> Mutation {
    let status = match err {
        RepositoryError::NotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    tracing::error!(%status, error = %err, key, "Task mutation failed");
    mutation(status, MutationResponse::error(key, err.to_string()))
}

fn bad_body(rejection: JsonRejection) -> Mutation {
    tracing::warn!(error = %rejection.body_text(), "Rejected task payload");
    mutation(
        StatusCode::BAD_REQUEST,
        MutationResponse::error("Input", rejection.body_text()),
    )
}

/// Body of `GET /api/tasks`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub tasks: Vec<Task>,
    pub last_evaluated_key: Option<String>,
}

// ============================================================================
// Queries
// ============================================================================

/// List the caller's tasks, most recently updated first (GET /api/tasks).
pub async fn list_tasks(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<TaskList>, AppError> {
    let cursor = query.cursor()?;
    let page = state
        .tasks
        .list_tasks(claims.username_or_sub(), cursor.as_ref())
        .await
        .map_err(|e| AppError::internal("Error fetching tasks", e))?;

    Ok(Json(TaskList {
        tasks: page.items,
        last_evaluated_key: page.last_evaluated_key.map(|c| c.encode()),
    }))
}

/// Get one task (GET /api/tasks/{task_id}).
pub async fn get_task(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Result<Json<Task>, AppError> {
    state
        .tasks
        .get_task(claims.username_or_sub(), &task_id)
        .await
        .map_err(|e| AppError::internal("Error fetching task", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Task {task_id} not found")))
}

// ============================================================================
// Mutations
// ============================================================================

/// Create a task (POST /api/tasks).
pub async fn create_task(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskInput>, JsonRejection>,
) -> Mutation {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return bad_body(rejection),
    };

    let now = Utc::now();
    if let Err(errors) = validate_create(&input, now) {
        return mutation(StatusCode::BAD_REQUEST, MutationResponse::failed(errors));
    }

    let task = Task::new(claims.username_or_sub(), &input, now);
    if let Err(err) = state.tasks.create_task(&task).await {
        return store_failure("CreateError", err);
    }

    tracing::info!(task = %task.sk, owner = %task.pk, "Created task");
    mutation(StatusCode::CREATED, MutationResponse::ok(task))
}

/// Update a task and return it in full (PUT /api/tasks/{task_id}).
pub async fn update_task(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(task_id): Path<String>,
    payload: Result<Json<UpdateTaskInput>, JsonRejection>,
) -> Mutation {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return bad_body(rejection),
    };

    let now = Utc::now();
    if let Err(errors) = validate_update(&input, now) {
        return mutation(StatusCode::BAD_REQUEST, MutationResponse::failed(errors));
    }

    let update = TaskUpdate::from_input(&input, now);
    match state
        .tasks
        .update_task(claims.username_or_sub(), &task_id, &update)
        .await
    {
        Ok(task) => {
            tracing::info!(task = %task.sk, status = %task.status, "Updated task");
            mutation(StatusCode::OK, MutationResponse::ok(task))
        }
        Err(err) => store_failure("UpdateError", err),
    }
}

/// Delete a task (DELETE /api/tasks/{task_id}).
pub async fn delete_task(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> Mutation {
    match state
        .tasks
        .delete_task(claims.username_or_sub(), &task_id)
        .await
    {
        Ok(()) => {
            tracing::info!(task = %task_id, "Deleted task");
            mutation(StatusCode::OK, MutationResponse::empty())
        }
        Err(err) => store_failure("DeleteError", err),
    }
}

/// Flag a task's reminder as sent (POST /api/tasks/lambda/notification-sent).
///
/// Called by the reminder job with the shared service key.
pub async fn notification_sent(
    _caller: ServiceCaller,
    State(state): State<AppState>,
    payload: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> Mutation {
    let request = match payload {
        Ok(Json(request)) if request.is_complete() => request,
        Ok(_) => {
            return mutation(
                StatusCode::BAD_REQUEST,
                MutationResponse::error("Input", "userId and taskId are required"),
            )
        }
        Err(rejection) => return bad_body(rejection),
    };

    let owner = strip_user_prefix(&request.user_id);
    match state
        .tasks
        .mark_notification_sent(owner, &request.task_id)
        .await
    {
        Ok(()) => {
            tracing::info!(%owner, task = %request.task_id, "Marked reminder as sent");
            mutation(StatusCode::OK, MutationResponse::empty())
        }
        Err(err) => store_failure("UpdateError", err),
    }
}
