use std::sync::Arc;

use axum::{
    extract::{
        Json, Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::IntoResponse,
};

use crate::{
    error::{AppError, Result},
    models::user::{CreateUserDto, PageQuery, UpdateUserDetailsDto, UpdateUserStatusDto},
    services::UserService,
};

/// State for user handlers
#[derive(Clone)]
pub struct UserState {
    pub user_service: Arc<UserService>,
    pub default_page_size: usize,
}

/// List users, one page at a time
pub async fn get_all_users(
    State(state): State<UserState>,
    query: std::result::Result<Query<PageQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(query) = query?;
    let page = state
        .user_service
        .get_all(
            query.page_current.unwrap_or(1),
            query.page_size.unwrap_or(state.default_page_size),
        )
        .await?;
    Ok((StatusCode::OK, Json(page)))
}

/// Get user by username handler
pub async fn get_user(
    State(state): State<UserState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .get_by_username(&username)
        .await
        .ok_or(AppError::UserNotFound(username))?;
    Ok((StatusCode::OK, Json(user)))
}

/// Create user handler
pub async fn create_user(
    State(state): State<UserState>,
    payload: std::result::Result<Json<CreateUserDto>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state.user_service.create(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update first/last name handler
pub async fn update_user_details(
    State(state): State<UserState>,
    Path(username): Path<String>,
    payload: std::result::Result<Json<UpdateUserDetailsDto>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .user_service
        .update_user_details(&username, payload)
        .await?
        .ok_or(AppError::UserNotFound(username))?;
    Ok((StatusCode::OK, Json(user)))
}

/// Update status handler
pub async fn update_user_status(
    State(state): State<UserState>,
    Path(username): Path<String>,
    payload: std::result::Result<Json<UpdateUserStatusDto>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(payload) = payload?;

    let user = state
        .user_service
        .update_user_status(&username, payload)
        .await
        .ok_or(AppError::UserNotFound(username))?;
    Ok((StatusCode::OK, Json(user)))
}

/// Record a login handler
pub async fn increase_logins_counter(
    State(state): State<UserState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state
        .user_service
        .increase_logins_counter(&username)
        .await?
        .ok_or(AppError::UserNotFound(username))?;
    Ok((StatusCode::OK, Json(user)))
}

/// Delete user handler
pub async fn delete_user(
    State(state): State<UserState>,
    Path(username): Path<String>,
) -> Result<impl IntoResponse> {
    if !state.user_service.remove(&username).await {
        return Err(AppError::UserNotFound(username));
    }
    Ok(StatusCode::NO_CONTENT)
}
