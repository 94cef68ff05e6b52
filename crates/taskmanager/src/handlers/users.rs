//! User profile handlers. Profiles are keyed by the token's `sub`.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use taskmanager_auth::CurrentUser;
use taskmanager_core::storage::RepositoryError;
use taskmanager_core::user::{
    validate_create_user, CreateUserInput, ResolverError, UpdateUserInput, User, UserResponse,
    UserUpdate,
};

use crate::{handlers::AppError, state::AppState};

type Resolved = (StatusCode, Json<UserResponse>);

fn resolved(status: StatusCode, response: UserResponse) -> Resolved {
    (status, Json(response))
}

fn store_failure(err: RepositoryError) -> Resolved {
    tracing::error!(error = %err, "User mutation failed");
    let (status, error) = match &err {
        RepositoryError::NotFound { .. } => (
            StatusCode::NOT_FOUND,
            ResolverError::new(err.to_string(), "NOT_FOUND"),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ResolverError::unknown(err.to_string()),
        ),
    };
    resolved(status, UserResponse::failed(vec![error]))
}

fn bad_body(rejection: JsonRejection) -> Resolved {
    resolved(
        StatusCode::BAD_REQUEST,
        UserResponse::failed(vec![ResolverError::new(
            rejection.body_text(),
            "VALIDATION_ERROR",
        )]),
    )
}

/// `?email=` on `GET /api/users`.
#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

/// Create the caller's profile (POST /api/users).
pub async fn create_user(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateUserInput>, JsonRejection>,
) -> Resolved {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return bad_body(rejection),
    };

    if let Err(errors) = validate_create_user(&input) {
        return resolved(StatusCode::BAD_REQUEST, UserResponse::failed(errors));
    }

    let user = User::new(&claims.sub, &input, Utc::now());
    if let Err(err) = state.users.create_user(&user).await {
        return store_failure(err);
    }

    tracing::info!(user = %user.pk, "Created user profile");
    resolved(StatusCode::OK, UserResponse::ok(user))
}

/// Update the caller's profile (PATCH /api/users/me).
pub async fn update_me(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUserInput>, JsonRejection>,
) -> Resolved {
    let input = match payload {
        Ok(Json(input)) => input,
        Err(rejection) => return bad_body(rejection),
    };

    let update = UserUpdate::from_input(&input, Utc::now());
    match state.users.update_user(&claims.sub, &update).await {
        Ok(user) => resolved(StatusCode::OK, UserResponse::ok(user)),
        Err(err) => store_failure(err),
    }
}

/// The caller's profile (GET /api/users/me).
pub async fn get_me(
    CurrentUser(claims): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<User>, AppError> {
    state
        .users
        .get_user(&claims.sub)
        .await
        .map_err(|e| AppError::internal("Error fetching user", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User not found"))
}

/// Look a user up by email (GET /api/users?email=).
pub async fn get_user_by_email(
    _: CurrentUser,
    State(state): State<AppState>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<User>, AppError> {
    let email = query
        .email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::new(StatusCode::BAD_REQUEST, "email is required"))?;

    state
        .users
        .get_user_by_email(email.trim())
        .await
        .map_err(|e| AppError::internal("Error fetching user", e))?
        .map(Json)
        .ok_or_else(|| AppError::not_found("User not found"))
}
