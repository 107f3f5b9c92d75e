//! User management endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};

use crate::{
    error::{AppError, AppResult, ErrorResponse},
    models::user::{User, UserRequest},
};

/// List all users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "All users", body = Vec<User>)
    )
)]
pub async fn list_users(State(state): State<crate::AppState>) -> AppResult<Json<Vec<User>>> {
    let users = state.services.users.find_all_users().await?;
    Ok(Json(users))
}

/// Get user details by ID
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<User>> {
    let Path(id) = path?;
    state
        .services
        .users
        .find_user_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::user_not_found(id))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = UserRequest,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 404, description = "Referenced book not found", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<User>)> {
    let Json(request) = payload?;
    let (user, book_id) = request.into_parts();

    let created = state.services.users.create_user(user, book_id).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update an existing user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 404, description = "User or book not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> AppResult<Json<User>> {
    let Path(id) = path?;
    let Json(request) = payload?;
    let (details, book_id) = request.into_parts();

    let updated = state.services.users.update_user(id, details, book_id).await?;
    Ok(Json(updated))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 204, description = "User deleted, or did not exist")
    )
)]
pub async fn delete_user(
    State(state): State<crate::AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> AppResult<StatusCode> {
    let Path(id) = path?;
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
