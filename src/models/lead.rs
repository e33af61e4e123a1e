// src/models/lead.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::types::Json;
use utoipa::ToSchema;
use uuid::Uuid;

// --- ENUMS ---

// Etapas do kanban. A ordem canônica é RECEIVED -> IN_REVIEW -> ACTIVATED,
// com CANCELLED alcançável de qualquer etapa não terminal, mas nenhuma
// transição é bloqueada pelo backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "kanban_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KanbanStatus {
    Received,
    InReview,
    Activated,
    Cancelled,
}

impl KanbanStatus {
    pub const ALL: [KanbanStatus; 4] = [
        KanbanStatus::Received,
        KanbanStatus::InReview,
        KanbanStatus::Activated,
        KanbanStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            KanbanStatus::Received => "RECEIVED",
            KanbanStatus::InReview => "IN_REVIEW",
            KanbanStatus::Activated => "ACTIVATED",
            KanbanStatus::Cancelled => "CANCELLED",
        }
    }
}

// PF = pessoa física, PJ = jurídica, ADESAO = plano coletivo por adesão.
// Fica nulo na ingestão; a classificação é feita depois, por um humano.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "client_type", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientType {
    Pf,
    Pj,
    Adesao,
}

impl ClientType {
    pub const ALL: [ClientType; 3] = [ClientType::Pf, ClientType::Pj, ClientType::Adesao];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Pf => "PF",
            ClientType::Pj => "PJ",
            ClientType::Adesao => "ADESAO",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "coparticipation_type")]
pub enum CoparticipationType {
    #[sqlx(rename = "NÃO")]
    #[serde(rename = "NÃO")]
    Nao,
    #[sqlx(rename = "PARCIAL")]
    #[serde(rename = "PARCIAL")]
    Parcial,
    #[sqlx(rename = "COMPLETA")]
    #[serde(rename = "COMPLETA")]
    Completa,
}

// --- ESTRUTURAS ANINHADAS (colunas JSONB) ---

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Endereco {
    pub cep: String,
    pub logradouro: String,
    pub numero: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complemento: Option<String>,
    pub bairro: String,
    pub cidade: String,
    pub uf: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum BeneficiaryKind {
    Titular,
    Dependente,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Beneficiario {
    pub id: Uuid,
    pub nome: String,
    #[serde(default)]
    pub cpf: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    pub data_nascimento: String,
    // Titular, Cônjuge, Filho, etc.
    pub parentesco: String,
    #[serde(rename = "type")]
    pub tipo: BeneficiaryKind,
}

// Comunicação Admin <-> Vendedor dentro do lead
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LeadMessage {
    pub id: Uuid,
    pub user_name: String,
    pub role: super::auth::Role,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

// Responsável legal, preenchido apenas para PJ
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct DadosResponsavel {
    pub nome: String,
    pub cpf: String,
    pub endereco: String,
    pub data_nascimento: String,
}

// --- LEAD ---

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Lead {
    pub id: i32,

    // Razão Social para PJ, nome para PF
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub tipo_cliente: Option<ClientType>,
    pub cpf_cnpj: String,
    pub rg_ie: Option<String>,
    // Nascimento para PF, data de abertura para PJ
    pub data_nascimento_abertura: Option<String>,

    #[schema(value_type = Option<DadosResponsavel>)]
    pub dados_responsavel: Option<Json<DadosResponsavel>>,
    pub havera_remissao: bool,

    pub operadora: String,
    pub produto: String,
    #[schema(value_type = Option<f64>)]
    pub valor_produto: Option<Decimal>,
    pub reducao_carencia: bool,
    pub coparticipacao: Option<CoparticipationType>,
    pub vigencia: Option<String>,

    // Coleções sempre presentes: consumidores iteram sem checar null
    #[schema(value_type = Endereco)]
    pub endereco: Json<Endereco>,
    #[schema(value_type = Vec<Beneficiario>)]
    pub beneficiarios: Json<Vec<Beneficiario>>,
    #[schema(value_type = Vec<LeadMessage>)]
    pub mensagens: Json<Vec<LeadMessage>>,
    #[schema(value_type = Vec<String>)]
    pub documentos: Json<Vec<String>>,

    pub vendedor: Option<String>,
    pub vendedor_email: Option<String>,
    pub vendedor_id: Option<i32>,

    pub status_kanban: KanbanStatus,
    pub origem: String,
    // Payload bruto recebido na ingestão, retido para auditoria
    #[schema(value_type = Option<Object>)]
    pub raw_json: Option<Value>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Entrada manual de lead pelo painel. O vendedor é opcional: quando
// informado, nome e e-mail são resolvidos no diretório de usuários.
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
pub struct CreateLeadPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub telefone: String,
    pub tipo_cliente: Option<ClientType>,
    #[serde(default)]
    pub cpf_cnpj: String,
    pub rg_ie: Option<String>,
    pub data_nascimento_abertura: Option<String>,
    pub dados_responsavel: Option<DadosResponsavel>,
    #[serde(default)]
    pub havera_remissao: bool,
    #[serde(default)]
    pub operadora: String,
    #[serde(default)]
    pub produto: String,
    #[schema(value_type = Option<f64>)]
    pub valor_produto: Option<Decimal>,
    #[serde(default)]
    pub reducao_carencia: bool,
    pub coparticipacao: Option<CoparticipationType>,
    pub vigencia: Option<String>,
    #[serde(default)]
    pub endereco: Endereco,
    #[serde(default)]
    pub beneficiarios: Vec<Beneficiario>,
    #[serde(default)]
    pub documentos: Vec<String>,
    pub vendedor_id: Option<i32>,
    #[serde(default = "origem_manual")]
    pub origem: String,
}

fn origem_manual() -> String {
    "Manual".to_string()
}

// Atualização completa do lead (o formulário do painel envia tudo).
// raw_json fica de fora: é trilha de auditoria da ingestão.
#[derive(Debug, Deserialize, validator::Validate, ToSchema)]
pub struct UpdateLeadPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O telefone é obrigatório."))]
    pub telefone: String,
    pub tipo_cliente: Option<ClientType>,
    #[serde(default)]
    pub cpf_cnpj: String,
    pub rg_ie: Option<String>,
    pub data_nascimento_abertura: Option<String>,
    pub dados_responsavel: Option<DadosResponsavel>,
    #[serde(default)]
    pub havera_remissao: bool,
    #[serde(default)]
    pub operadora: String,
    #[serde(default)]
    pub produto: String,
    #[schema(value_type = Option<f64>)]
    pub valor_produto: Option<Decimal>,
    #[serde(default)]
    pub reducao_carencia: bool,
    pub coparticipacao: Option<CoparticipationType>,
    pub vigencia: Option<String>,
    #[serde(default)]
    pub endereco: Endereco,
    #[serde(default)]
    pub beneficiarios: Vec<Beneficiario>,
    #[serde(default)]
    pub mensagens: Vec<LeadMessage>,
    #[serde(default)]
    pub documentos: Vec<String>,
    pub vendedor_id: Option<i32>,
    pub status_kanban: KanbanStatus,
    #[serde(default)]
    pub origem: String,
}

// Registro pronto para inserção; o banco gera id e timestamps.
#[derive(Debug, Clone)]
pub struct NewLead {
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub tipo_cliente: Option<ClientType>,
    pub cpf_cnpj: String,
    pub rg_ie: Option<String>,
    pub data_nascimento_abertura: Option<String>,
    pub dados_responsavel: Option<DadosResponsavel>,
    pub havera_remissao: bool,
    pub operadora: String,
    pub produto: String,
    pub valor_produto: Option<Decimal>,
    pub reducao_carencia: bool,
    pub coparticipacao: Option<CoparticipationType>,
    pub vigencia: Option<String>,
    pub endereco: Endereco,
    pub beneficiarios: Vec<Beneficiario>,
    pub mensagens: Vec<LeadMessage>,
    pub documentos: Vec<String>,
    pub vendedor: Option<String>,
    pub vendedor_email: Option<String>,
    pub vendedor_id: Option<i32>,
    pub status_kanban: KanbanStatus,
    pub origem: String,
    pub raw_json: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializa_com_os_rotulos_do_banco() {
        assert_eq!(
            serde_json::to_value(KanbanStatus::Received).unwrap(),
            "RECEIVED"
        );
        assert_eq!(
            serde_json::to_value(KanbanStatus::InReview).unwrap(),
            "IN_REVIEW"
        );
        assert_eq!(
            serde_json::to_value(CoparticipationType::Nao).unwrap(),
            "NÃO"
        );
    }

    #[test]
    fn endereco_vazio_desserializa_com_campos_em_branco() {
        let endereco: Endereco = serde_json::from_str("{}").unwrap();
        assert_eq!(endereco.cep, "");
        assert!(endereco.complemento.is_none());
    }

    #[test]
    fn beneficiario_usa_type_como_chave_do_tipo() {
        let json = serde_json::json!({
            "id": "b4a9c2de-0f66-4a3c-9b3e-6a1df6f6e001",
            "nome": "Maria",
            "data_nascimento": "1990-05-20",
            "parentesco": "Titular",
            "type": "TITULAR"
        });
        let b: Beneficiario = serde_json::from_value(json).unwrap();
        assert_eq!(b.tipo, BeneficiaryKind::Titular);
    }
}
