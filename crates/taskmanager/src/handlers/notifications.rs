//! Notification handlers.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Serialize;

use taskmanager_auth::CurrentUser;
use taskmanager_core::notification::{CreateNotificationRequest, Notification};
use taskmanager_core::task::GraphQLError;

use crate::{
    handlers::{AppError, PageQuery},
    state::AppState,
};

/// Body of `GET /api/notifications/user/notifications`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationList {
    pub notifications: Vec<Notification>,
    pub last_evaluated_key: Option<String>,
}

/// Body of `POST /api/notifications/lambda/notification`.
#[derive(Debug, Serialize)]
pub struct NotificationCreated {
    pub success: bool,
    #[serde(rename = "Notification", skip_serializing_if = "Option::is_none")]
    pub notification: Option<Notification>,
    pub errors: Vec<GraphQLError>,
}

/// List the caller's notifications, newest first.
pub async fn list_notifications(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<NotificationList>, AppError> {
    let cursor = query.cursor()?;
    let page = state
        .notifications
        .list_notifications(claims.username_or_sub(), cursor.as_ref())
        .await
        .map_err(|e| AppError::internal_with_cause("Failed to fetch notifications", e))?;

    Ok(Json(NotificationList {
        notifications: page.items,
        last_evaluated_key: page.last_evaluated_key.map(|c| c.encode()),
    }))
}

/// Record that a reminder went out. Called by the reminder job.
pub async fn create_notification(
    State(state): State<AppState>,
    payload: Result<Json<CreateNotificationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NotificationCreated>), AppError> {
    let request = payload
        .ok()
        .map(|Json(request)| request)
        .filter(CreateNotificationRequest::is_complete)
        .ok_or_else(|| AppError::new(StatusCode::BAD_REQUEST, "Invalid input"))?;

    let notification = Notification::new(&request.user_id, &request.task_id, Utc::now());
    match state.notifications.create_notification(&notification).await {
        Ok(()) => {
            tracing::info!(pk = %notification.pk, task = %notification.notif_task, "Created notification");
            Ok((
                StatusCode::OK,
                Json(NotificationCreated {
                    success: true,
                    notification: Some(notification),
                    errors: Vec::new(),
                }),
            ))
        }
        Err(err) => {
            tracing::error!(error = %err, "Error creating notification");
            Ok((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(NotificationCreated {
                    success: false,
                    notification: None,
                    errors: vec![GraphQLError::new("CreateError", err.to_string())],
                }),
            ))
        }
    }
}
