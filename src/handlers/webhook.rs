// src/handlers/webhook.rs

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};
use serde::Serialize;
use serde_json::{Value, json};
use utoipa::ToSchema;

use crate::{common::error::AppError, config::AppState};

// Subconjunto devolvido ao provedor na confirmação
#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookLeadSummary {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub vendedor: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WebhookAck {
    pub ok: bool,
    pub lead: WebhookLeadSummary,
}

// POST /webhook/{provider}
#[utoipa::path(
    post,
    path = "/webhook/{provider}",
    tag = "Webhook",
    params(
        ("provider" = String, Path, description = "Identificador do provedor (ex: make)")
    ),
    request_body(content = String, description = "Payload bruto do webhook (JSON)", content_type = "application/json"),
    responses(
        (status = 200, description = "Lead criado e atribuído", body = WebhookAck),
        (status = 400, description = "Payload malformado ou campo obrigatório ausente"),
        (status = 500, description = "Nenhum vendedor elegível"),
        (status = 503, description = "Banco de dados indisponível, repetir a chamada")
    )
)]
pub async fn receive(
    State(app_state): State<AppState>,
    Path(provider): Path<String>,
    body: Bytes,
) -> Result<Json<WebhookAck>, AppError> {
    // Parse manual do corpo: JSON inválido responde 400 no mesmo envelope
    // {ok:false} dos demais erros, e nada é persistido.
    let raw: Value = serde_json::from_slice(&body).map_err(|_| AppError::MalformedPayload)?;

    let lead = app_state.lead_service.ingest_webhook(&provider, raw).await?;

    Ok(Json(WebhookAck {
        ok: true,
        lead: WebhookLeadSummary {
            nome: lead.nome,
            email: lead.email,
            telefone: lead.telefone,
            vendedor: lead.vendedor,
        },
    }))
}

// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}
