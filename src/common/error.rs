// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Ingestão de webhooks ---
    #[error("Payload inválido: value[0] ausente ou corpo não é JSON")]
    MalformedPayload,

    #[error("Campo obrigatório ausente ou em branco: {0}")]
    MissingRequiredField(&'static str),

    #[error("Nenhum vendedor elegível para atribuição")]
    NoEligibleSellers,

    // --- Autenticação / autorização ---
    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso restrito a administradores")]
    Forbidden,

    // --- CRUD ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Lead não encontrado")]
    LeadNotFound,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "ok": false,
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::MalformedPayload => (
                StatusCode::BAD_REQUEST,
                "Payload inválido: esperado { value: [ { contact: {...} } ] }.".to_string(),
            ),
            AppError::MissingRequiredField(field) => (
                StatusCode::BAD_REQUEST,
                format!("Campo obrigatório ausente ou em branco: {}.", field),
            ),
            // Má configuração operacional, não culpa do chamador.
            AppError::NoEligibleSellers => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Nenhum vendedor elegível para receber o lead.".to_string(),
            ),

            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "E-mail ou senha inválidos.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Acesso restrito a administradores.".to_string(),
            ),
            AppError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                "Este e-mail já está em uso.".to_string(),
            ),
            AppError::UserNotFound => {
                (StatusCode::NOT_FOUND, "Usuário não encontrado.".to_string())
            }
            AppError::LeadNotFound => (StatusCode::NOT_FOUND, "Lead não encontrado.".to_string()),

            // Banco indisponível ou lento: o chamador pode repetir a chamada.
            AppError::DatabaseError(ref e) => {
                tracing::error!("Erro de banco de dados: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Banco de dados indisponível, tente novamente.".to_string(),
                )
            }

            // Todos os outros erros viram 500.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "ok": false, "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erros_de_ingestao_sao_culpa_do_chamador() {
        assert_eq!(
            AppError::MalformedPayload.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::MissingRequiredField("contact.phone")
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn falta_de_vendedores_e_erro_operacional() {
        assert_eq!(
            AppError::NoEligibleSellers.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn banco_indisponivel_sinaliza_nova_tentativa() {
        let err = AppError::DatabaseError(sqlx::Error::PoolTimedOut);
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
