// src/handlers/users.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{CreateUserPayload, UpdateUserPayload, User},
};

// Todas as rotas deste módulo passam pelo auth_guard + admin_guard.

// GET /api/users
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Lista de usuários", body = Vec<User>),
        (status = 403, description = "Acesso restrito a administradores")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(State(app_state): State<AppState>) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(Json(users))
}

// POST /api/users
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = User),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.auth_service.create_user(payload).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// PUT /api/users/{id}
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    request_body = UpdateUserPayload,
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário atualizado", body = User),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<User>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let user = app_state.auth_service.update_user(id, payload).await?;

    Ok(Json(user))
}

// DELETE /api/users/{id}
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = i32, Path, description = "ID do usuário")),
    responses(
        (status = 204, description = "Usuário removido"),
        (status = 404, description = "Usuário não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    app_state.auth_service.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
