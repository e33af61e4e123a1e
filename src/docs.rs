// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Webhook ---
        handlers::webhook::receive,

        // --- Auth ---
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Leads ---
        handlers::leads::list_leads,
        handlers::leads::get_lead,
        handlers::leads::create_lead,
        handlers::leads::update_lead,
        handlers::leads::update_status,
        handlers::leads::add_message,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,

            // --- Leads ---
            models::lead::KanbanStatus,
            models::lead::ClientType,
            models::lead::CoparticipationType,
            models::lead::Endereco,
            models::lead::BeneficiaryKind,
            models::lead::Beneficiario,
            models::lead::LeadMessage,
            models::lead::DadosResponsavel,
            models::lead::Lead,
            models::lead::CreateLeadPayload,
            models::lead::UpdateLeadPayload,

            // --- Dashboard ---
            models::dashboard::DashboardStats,

            // --- Payloads ---
            handlers::leads::UpdateStatusPayload,
            handlers::leads::AddMessagePayload,
            handlers::webhook::WebhookLeadSummary,
            handlers::webhook::WebhookAck,
        )
    ),
    tags(
        (name = "Webhook", description = "Ingestão de leads de provedores externos"),
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Gestão de usuários (admin)"),
        (name = "Leads", description = "Leads e kanban"),
        (name = "Dashboard", description = "Indicadores gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
