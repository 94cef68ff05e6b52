use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::Html,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use taskmanager_auth::{ACCESS_TOKEN_HEADER, SERVICE_KEY_HEADER};

use crate::{
    handlers::{
        notifications::{create_notification, list_notifications},
        tasks::{create_task, delete_task, get_task, list_tasks, notification_sent, update_task},
        users::{create_user, get_me, get_user_by_email, update_me},
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(ACCESS_TOKEN_HEADER),
            HeaderName::from_static(SERVICE_KEY_HEADER),
        ]);

    let api_routes = Router::new()
        // Task routes
        .route("/tasks", get(list_tasks).post(create_task))
        .route(
            "/tasks/{task_id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/tasks/lambda/notification-sent", post(notification_sent))
        // Notification routes
        .route("/notifications/user/notifications", get(list_notifications))
        .route("/notifications/lambda/notification", post(create_notification))
        // User routes
        .route("/users", get(get_user_by_email).post(create_user))
        .route("/users/me", get(get_me).patch(update_me))
        .layer(cors);

    // Main application router
    Router::new()
        .nest("/api", api_routes)
        .fallback(wrong_route)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}

async fn wrong_route() -> (StatusCode, Html<&'static str>) {
    (StatusCode::NOT_FOUND, Html("<h1>Wrong Route!</h1>"))
}
