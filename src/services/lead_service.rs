// src/services/lead_service.rs

use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LeadRepository, UserRepository},
    models::{
        auth::{Role, User},
        lead::{
            CreateLeadPayload, Endereco, KanbanStatus, Lead, LeadMessage, NewLead,
            UpdateLeadPayload,
        },
        webhook::WebhookPayload,
    },
    services::assignment::{self, AssignmentPolicy},
};

#[derive(Clone)]
pub struct LeadService {
    lead_repo: LeadRepository,
    user_repo: UserRepository,
    policy: AssignmentPolicy,
}

impl LeadService {
    pub fn new(
        lead_repo: LeadRepository,
        user_repo: UserRepository,
        policy: AssignmentPolicy,
    ) -> Self {
        Self {
            lead_repo,
            user_repo,
            policy,
        }
    }

    // =========================================================================
    //  INGESTÃO DE WEBHOOK
    // =========================================================================

    /// Normaliza o evento de contato, escolhe o vendedor e insere o lead.
    ///
    /// A normalização acontece antes de qualquer acesso ao banco: payload
    /// rejeitado não gera leitura nem escrita. A atribuição acontece antes da
    /// inserção: se não há vendedor elegível, nada é persistido.
    pub async fn ingest_webhook(&self, provider: &str, raw: Value) -> Result<Lead, AppError> {
        let draft = normalize(&raw)?;

        // Snapshot dos elegíveis, em ordem crescente de id
        let vendedores = self.user_repo.list_by_role(Role::Seller).await?;

        // Duas requisições simultâneas podem ler o mesmo estado e cair no
        // mesmo vendedor; o desvio se corrige nas atribuições seguintes.
        let escolhido = match self.policy {
            AssignmentPolicy::RoundRobinById => {
                let ultimo = self.lead_repo.last_assigned_seller_id().await?;
                assignment::next_in_rotation(&vendedores, ultimo)?
            }
            AssignmentPolicy::LeastLoaded => {
                let contagens = self.lead_repo.count_by_seller().await?;
                assignment::least_loaded(&vendedores, &contagens)?
            }
        };

        let lead = self
            .lead_repo
            .insert(draft.into_new_lead(escolhido, raw))
            .await?;

        tracing::info!(
            "📥 Lead '{}' ({}) atribuído a {} [{}]",
            lead.nome,
            provider,
            escolhido.name,
            escolhido.id
        );

        Ok(lead)
    }

    // =========================================================================
    //  CRUD DO PAINEL
    // =========================================================================

    // Admin enxerga o CRM inteiro; vendedor só a própria carteira
    pub async fn list_for(&self, user: &User) -> Result<Vec<Lead>, AppError> {
        match user.role {
            Role::Admin => self.lead_repo.list_all().await,
            Role::Seller => self.lead_repo.list_by_seller(user.id).await,
        }
    }

    pub async fn get(&self, id: i32) -> Result<Lead, AppError> {
        self.lead_repo
            .find_by_id(id)
            .await?
            .ok_or(AppError::LeadNotFound)
    }

    // Entrada manual pelo painel
    pub async fn create_manual(&self, payload: CreateLeadPayload) -> Result<Lead, AppError> {
        let vendedor = self.resolve_seller(payload.vendedor_id).await?;

        let novo = NewLead {
            nome: payload.nome.trim().to_string(),
            email: payload.email.trim().to_string(),
            telefone: payload.telefone.trim().to_string(),
            tipo_cliente: payload.tipo_cliente,
            cpf_cnpj: payload.cpf_cnpj,
            rg_ie: payload.rg_ie,
            data_nascimento_abertura: payload.data_nascimento_abertura,
            dados_responsavel: payload.dados_responsavel,
            havera_remissao: payload.havera_remissao,
            operadora: payload.operadora,
            produto: payload.produto,
            valor_produto: payload.valor_produto,
            reducao_carencia: payload.reducao_carencia,
            coparticipacao: payload.coparticipacao,
            vigencia: payload.vigencia,
            endereco: payload.endereco,
            beneficiarios: payload.beneficiarios,
            mensagens: Vec::new(),
            documentos: payload.documentos,
            vendedor: vendedor.as_ref().map(|v| v.name.clone()),
            vendedor_email: vendedor.as_ref().map(|v| v.email.clone()),
            vendedor_id: vendedor.as_ref().map(|v| v.id),
            status_kanban: KanbanStatus::Received,
            origem: payload.origem,
            raw_json: None,
        };

        self.lead_repo.insert(novo).await
    }

    pub async fn update(&self, id: i32, payload: UpdateLeadPayload) -> Result<Lead, AppError> {
        let vendedor = self.resolve_seller(payload.vendedor_id).await?;
        self.lead_repo.update(id, &payload, vendedor.as_ref()).await
    }

    pub async fn update_status(&self, id: i32, status: KanbanStatus) -> Result<Lead, AppError> {
        self.lead_repo.update_status(id, status).await
    }

    // Comunicação Admin <-> Vendedor anotada no próprio lead
    pub async fn add_message(
        &self,
        id: i32,
        autor: &User,
        texto: String,
    ) -> Result<Lead, AppError> {
        let mensagem = LeadMessage {
            id: Uuid::new_v4(),
            user_name: autor.name.clone(),
            role: autor.role,
            message: texto,
            created_at: Utc::now(),
        };
        self.lead_repo.append_message(id, &mensagem).await
    }

    async fn resolve_seller(&self, vendedor_id: Option<i32>) -> Result<Option<User>, AppError> {
        match vendedor_id {
            None => Ok(None),
            Some(id) => self
                .user_repo
                .find_by_id(id)
                .await?
                .ok_or(AppError::UserNotFound)
                .map(Some),
        }
    }
}

// =============================================================================
//  NORMALIZAÇÃO
// =============================================================================

// Campos extraídos do payload externo, ainda sem vendedor
#[derive(Debug, PartialEq)]
struct LeadDraft {
    nome: String,
    email: String,
    telefone: String,
    cpf_cnpj: String,
    operadora: String,
    produto: String,
    origem: String,
}

/// Converte o payload externo em um rascunho de lead. Falha com
/// `MalformedPayload` se `value[0]` não existe e com `MissingRequiredField`
/// se nome, e-mail ou telefone ficam em branco após o trim.
fn normalize(raw: &Value) -> Result<LeadDraft, AppError> {
    let payload: WebhookPayload =
        serde_json::from_value(raw.clone()).map_err(|_| AppError::MalformedPayload)?;

    let entry = payload
        .value
        .into_iter()
        .next()
        .ok_or(AppError::MalformedPayload)?;

    let contato = entry.contact;
    let nome = required(
        contato.as_ref().and_then(|c| c.name.as_deref()),
        "contact.name",
    )?;
    let email = required(
        contato.as_ref().and_then(|c| c.email.as_deref()),
        "contact.email",
    )?;
    let telefone = required(
        contato.as_ref().and_then(|c| c.phone.as_deref()),
        "contact.phone",
    )?;

    let cpf_cnpj = contato
        .and_then(|c| c.document)
        .unwrap_or_default();
    let operadora = entry
        .custom_fields
        .get("Operadora")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let produto = entry
        .products
        .first()
        .and_then(|p| p.name.clone())
        .unwrap_or_default();
    let origem = entry
        .sales_channel
        .and_then(|c| c.name)
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Webhook".to_string());

    Ok(LeadDraft {
        nome,
        email,
        telefone,
        cpf_cnpj,
        operadora,
        produto,
        origem,
    })
}

fn required(valor: Option<&str>, campo: &'static str) -> Result<String, AppError> {
    match valor.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::MissingRequiredField(campo)),
    }
}

impl LeadDraft {
    // O tipo de cliente fica nulo de propósito: a classificação PF/PJ/ADESAO
    // é feita depois, por um humano. Coleções nascem vazias, nunca nulas.
    fn into_new_lead(self, vendedor: &User, raw_json: Value) -> NewLead {
        NewLead {
            nome: self.nome,
            email: self.email,
            telefone: self.telefone,
            tipo_cliente: None,
            cpf_cnpj: self.cpf_cnpj,
            rg_ie: None,
            data_nascimento_abertura: None,
            dados_responsavel: None,
            havera_remissao: false,
            operadora: self.operadora,
            produto: self.produto,
            valor_produto: None,
            reducao_carencia: false,
            coparticipacao: Some(crate::models::lead::CoparticipationType::Nao),
            vigencia: None,
            endereco: Endereco::default(),
            beneficiarios: Vec::new(),
            mensagens: Vec::new(),
            documentos: Vec::new(),
            vendedor: Some(vendedor.name.clone()),
            vendedor_email: Some(vendedor.email.clone()),
            vendedor_id: Some(vendedor.id),
            status_kanban: KanbanStatus::Received,
            origem: self.origem,
            raw_json: Some(raw_json),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_completo() -> Value {
        json!({
            "value": [{
                "contact": {
                    "name": "Ana",
                    "email": "a@x.com",
                    "phone": "119",
                    "document": "123.456.789-00"
                },
                "custom_fields": { "Operadora": "Amil" },
                "products": [{ "name": "Amil S380" }],
                "sales_channel": { "name": "SITE" }
            }]
        })
    }

    fn vendedor(id: i32) -> User {
        User {
            id,
            name: format!("Vendedor {}", id),
            email: format!("vendedor{}@settesaude.com.br", id),
            role: Role::Seller,
            password_hash: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn normaliza_payload_completo() {
        let draft = normalize(&payload_completo()).unwrap();
        assert_eq!(draft.nome, "Ana");
        assert_eq!(draft.email, "a@x.com");
        assert_eq!(draft.telefone, "119");
        assert_eq!(draft.cpf_cnpj, "123.456.789-00");
        assert_eq!(draft.operadora, "Amil");
        assert_eq!(draft.produto, "Amil S380");
        assert_eq!(draft.origem, "SITE");
    }

    #[test]
    fn origem_padrao_quando_canal_ausente() {
        let raw = json!({
            "value": [{ "contact": { "name": "Ana", "email": "a@x.com", "phone": "119" } }]
        });
        let draft = normalize(&raw).unwrap();
        assert_eq!(draft.origem, "Webhook");
        assert_eq!(draft.cpf_cnpj, "");
        assert_eq!(draft.operadora, "");
        assert_eq!(draft.produto, "");
    }

    #[test]
    fn email_em_branco_falha_mesmo_com_resto_preenchido() {
        let raw = json!({
            "value": [{ "contact": { "name": "Ana", "email": "   ", "phone": "119" } }]
        });
        assert!(matches!(
            normalize(&raw),
            Err(AppError::MissingRequiredField("contact.email"))
        ));
    }

    #[test]
    fn telefone_ausente_falha_antes_de_qualquer_acesso_ao_banco() {
        let raw = json!({
            "value": [{ "contact": { "name": "Ana", "email": "a@x.com" } }]
        });
        // A normalização é pura: rejeitar aqui garante zero chamadas ao store
        assert!(matches!(
            normalize(&raw),
            Err(AppError::MissingRequiredField("contact.phone"))
        ));
    }

    #[test]
    fn valores_sao_trimados() {
        let raw = json!({
            "value": [{ "contact": { "name": "  Ana  ", "email": " a@x.com ", "phone": " 119 " } }]
        });
        let draft = normalize(&raw).unwrap();
        assert_eq!(draft.nome, "Ana");
        assert_eq!(draft.email, "a@x.com");
        assert_eq!(draft.telefone, "119");
    }

    #[test]
    fn value_vazio_ou_ausente_e_payload_malformado() {
        assert!(matches!(
            normalize(&json!({ "value": [] })),
            Err(AppError::MalformedPayload)
        ));
        assert!(matches!(
            normalize(&json!({ "outra_chave": true })),
            Err(AppError::MalformedPayload)
        ));
        assert!(matches!(
            normalize(&json!({ "value": "não é lista" })),
            Err(AppError::MalformedPayload)
        ));
    }

    #[test]
    fn campos_extras_sao_tolerados() {
        let mut raw = payload_completo();
        raw["value"][0]["campo_novo_do_provedor"] = json!({ "qualquer": "coisa" });
        raw["outro_nivel"] = json!(42);
        assert!(normalize(&raw).is_ok());
    }

    #[test]
    fn lead_ingerido_nasce_com_colecoes_vazias_e_status_recebido() {
        let raw = payload_completo();
        let novo = normalize(&raw).unwrap().into_new_lead(&vendedor(2), raw.clone());

        assert_eq!(novo.status_kanban, KanbanStatus::Received);
        assert_eq!(novo.tipo_cliente, None);
        assert!(novo.beneficiarios.is_empty());
        assert!(novo.mensagens.is_empty());
        assert!(novo.documentos.is_empty());
        assert_eq!(novo.endereco.cep, "");
        assert!(novo.dados_responsavel.is_none());
        assert_eq!(novo.vendedor_id, Some(2));
        assert_eq!(novo.vendedor.as_deref(), Some("Vendedor 2"));
        assert_eq!(novo.raw_json, Some(raw));
    }
}
