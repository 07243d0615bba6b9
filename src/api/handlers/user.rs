use crate::api::dtos::requests::{CreateUserRequest, PageQuery, UpdateUserRequest};
use crate::api::dtos::responses::UserBody;
use crate::api::extractors::auth::AuthUser;
use crate::api::handlers::auth::hash_password;
use crate::domain::models::user::User;
use crate::domain::services::stats::{user_stats, USER_PAGE_SIZE};
use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    if state
        .user_repo
        .find_by_username(payload.username.trim())
        .await?
        .is_some()
    {
        return Err(AppError::Validation("Username already exists".into()));
    }
    let email = payload.email.trim().to_lowercase();
    if state.user_repo.find_by_email(&email).await?.is_some() {
        return Err(AppError::Validation("Email already exists".into()));
    }

    let user = User::new(
        &payload.username,
        &email,
        hash_password(&payload.password)?,
        &payload.role,
    );
    let created = state.user_repo.create(&user).await?;

    info!("Created user: {}", created.id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "User created successfully",
            "user": UserBody::from(&created)
        })),
    ))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    let mut user = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if let Some(username) = payload.username {
        if let Some(existing) = state.user_repo.find_by_username(username.trim()).await? {
            if existing.id != user_id {
                return Err(AppError::Validation("Username already exists".into()));
            }
        }
        user.username = username.trim().to_string();
    }

    if let Some(email) = payload.email {
        let email = email.trim().to_lowercase();
        if let Some(existing) = state.user_repo.find_by_email(&email).await? {
            if existing.id != user_id {
                return Err(AppError::Validation("Email already exists".into()));
            }
        }
        user.email = email;
    }

    if let Some(password) = payload.password {
        user.password_hash = hash_password(&password)?;
    }

    if let Some(role) = payload.role {
        if user_id == auth.0.id {
            return Err(AppError::Validation("Cannot change own role".into()));
        }
        if user.is_admin() && role != "admin" {
            let admin_count = state.user_repo.count_by_role("admin").await?;
            if admin_count <= 1 {
                return Err(AppError::Validation("Cannot remove last admin".into()));
            }
        }
        user.role = role;
    }

    let updated = state.user_repo.update(&user).await?;

    info!("Updated user: {}", updated.id);

    Ok(Json(serde_json::json!({
        "message": "User updated successfully",
        "user": UserBody::from(&updated)
    })))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    auth.require_admin()?;

    if user_id == auth.0.id {
        return Err(AppError::Validation("Cannot delete own account".into()));
    }

    let target = state
        .user_repo
        .find_by_id(&user_id)
        .await?
        .ok_or(AppError::NotFound("User not found".into()))?;

    if target.is_admin() {
        let admin_count = state.user_repo.count_by_role("admin").await?;
        if admin_count <= 1 {
            return Err(AppError::Validation("Cannot delete last admin".into()));
        }
    }

    state.user_repo.delete(&target.id).await?;

    info!("Deleted user {}", user_id);

    Ok(Json(serde_json::json!({ "message": "User deleted successfully" })))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list().await?;
    let stats = user_stats(&users, Utc::now());

    let page = query.page.unwrap_or(1).max(1);
    let total = users.len();
    let start = (page - 1) * USER_PAGE_SIZE;
    let page_users: Vec<UserBody> = if start < total {
        users
            .iter()
            .skip(start)
            .take(USER_PAGE_SIZE)
            .map(UserBody::from)
            .collect()
    } else {
        Vec::new()
    };

    Ok(Json(serde_json::json!({
        "users": page_users,
        "total_users": stats.total_users,
        "admin_users": stats.admin_users,
        "active_users": stats.active_users,
        "new_users": stats.new_users,
        "page": page,
        "per_page": USER_PAGE_SIZE,
        "pages": total.div_ceil(USER_PAGE_SIZE).max(1),
        "has_next": start + USER_PAGE_SIZE < total,
        "has_prev": page > 1
    })))
}
