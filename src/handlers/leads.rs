// src/handlers/leads.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::lead::{CreateLeadPayload, KanbanStatus, Lead, UpdateLeadPayload},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusPayload {
    #[schema(example = "IN_REVIEW")]
    pub status: KanbanStatus,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddMessagePayload {
    #[validate(length(min = 1, message = "A mensagem não pode ser vazia."))]
    #[schema(example = "Falta o comprovante de residência.")]
    pub message: String,
}

// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "Leads",
    responses(
        (status = 200, description = "Leads visíveis para o usuário (admin: todos; vendedor: os seus)", body = Vec<Lead>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_leads(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<Vec<Lead>>, AppError> {
    let leads = app_state.lead_service.list_for(&user).await?;
    Ok(Json(leads))
}

// GET /api/leads/{id}
#[utoipa::path(
    get,
    path = "/api/leads/{id}",
    tag = "Leads",
    params(("id" = i32, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead encontrado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_lead(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Lead>, AppError> {
    let lead = app_state.lead_service.get(id).await?;
    Ok(Json(lead))
}

// POST /api/leads: entrada manual pelo painel
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "Leads",
    request_body = CreateLeadPayload,
    responses(
        (status = 201, description = "Lead criado", body = Lead),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_lead(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateLeadPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.create_manual(payload).await?;

    Ok((StatusCode::CREATED, Json(lead)))
}

// PUT /api/leads/{id}: atualização completa (formulário do painel)
#[utoipa::path(
    put,
    path = "/api/leads/{id}",
    tag = "Leads",
    request_body = UpdateLeadPayload,
    params(("id" = i32, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Lead atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateLeadPayload>,
) -> Result<Json<Lead>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state.lead_service.update(id, payload).await?;

    Ok(Json(lead))
}

// PATCH /api/leads/{id}/status: arrastar o card no kanban
#[utoipa::path(
    patch,
    path = "/api/leads/{id}/status",
    tag = "Leads",
    request_body = UpdateStatusPayload,
    params(("id" = i32, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Status atualizado", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_status(
    State(app_state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateStatusPayload>,
) -> Result<Json<Lead>, AppError> {
    let lead = app_state
        .lead_service
        .update_status(id, payload.status)
        .await?;
    Ok(Json(lead))
}

// POST /api/leads/{id}/messages: comunicação admin <-> vendedor
#[utoipa::path(
    post,
    path = "/api/leads/{id}/messages",
    tag = "Leads",
    request_body = AddMessagePayload,
    params(("id" = i32, Path, description = "ID do lead")),
    responses(
        (status = 200, description = "Mensagem anexada ao lead", body = Lead),
        (status = 404, description = "Lead não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn add_message(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(payload): Json<AddMessagePayload>,
) -> Result<Json<Lead>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let lead = app_state
        .lead_service
        .add_message(id, &user, payload.message)
        .await?;

    Ok(Json(lead))
}
