// src/db/lead_repo.rs

use sqlx::{PgPool, types::Json};
use std::collections::HashMap;

use crate::{
    common::error::AppError,
    models::{
        auth::User,
        lead::{KanbanStatus, Lead, LeadMessage, NewLead, UpdateLeadPayload},
    },
};

// Repositório de leads: inserção, consulta pontual, atualização completa e
// varredura filtrada por vendedor, mais as consultas de apoio ao rodízio.
#[derive(Clone)]
pub struct LeadRepository {
    pool: PgPool,
}

impl LeadRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, lead: NewLead) -> Result<Lead, AppError> {
        let inserted = sqlx::query_as::<_, Lead>(
            r#"
            INSERT INTO leads (
                nome, email, telefone, tipo_cliente, cpf_cnpj, rg_ie,
                data_nascimento_abertura, dados_responsavel, havera_remissao,
                operadora, produto, valor_produto, reducao_carencia,
                coparticipacao, vigencia, endereco, beneficiarios, mensagens,
                documentos, vendedor, vendedor_email, vendedor_id,
                status_kanban, origem, raw_json
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25
            )
            RETURNING *
            "#,
        )
        .bind(lead.nome)
        .bind(lead.email)
        .bind(lead.telefone)
        .bind(lead.tipo_cliente)
        .bind(lead.cpf_cnpj)
        .bind(lead.rg_ie)
        .bind(lead.data_nascimento_abertura)
        .bind(lead.dados_responsavel.map(Json))
        .bind(lead.havera_remissao)
        .bind(lead.operadora)
        .bind(lead.produto)
        .bind(lead.valor_produto)
        .bind(lead.reducao_carencia)
        .bind(lead.coparticipacao)
        .bind(lead.vigencia)
        .bind(Json(lead.endereco))
        .bind(Json(lead.beneficiarios))
        .bind(Json(lead.mensagens))
        .bind(Json(lead.documentos))
        .bind(lead.vendedor)
        .bind(lead.vendedor_email)
        .bind(lead.vendedor_id)
        .bind(lead.status_kanban)
        .bind(lead.origem)
        .bind(lead.raw_json)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Lead>, AppError> {
        let lead = sqlx::query_as::<_, Lead>("SELECT * FROM leads WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(lead)
    }

    pub async fn list_all(&self) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>("SELECT * FROM leads ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;
        Ok(leads)
    }

    pub async fn list_by_seller(&self, vendedor_id: i32) -> Result<Vec<Lead>, AppError> {
        let leads = sqlx::query_as::<_, Lead>(
            "SELECT * FROM leads WHERE vendedor_id = $1 ORDER BY created_at DESC",
        )
        .bind(vendedor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(leads)
    }

    // Atualização completa; o vendedor já vem resolvido pelo serviço
    pub async fn update(
        &self,
        id: i32,
        dados: &UpdateLeadPayload,
        vendedor: Option<&User>,
    ) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            r#"
            UPDATE leads
            SET nome = $2, email = $3, telefone = $4, tipo_cliente = $5,
                cpf_cnpj = $6, rg_ie = $7, data_nascimento_abertura = $8,
                dados_responsavel = $9, havera_remissao = $10, operadora = $11,
                produto = $12, valor_produto = $13, reducao_carencia = $14,
                coparticipacao = $15, vigencia = $16, endereco = $17,
                beneficiarios = $18, mensagens = $19, documentos = $20,
                vendedor = $21, vendedor_email = $22, vendedor_id = $23,
                status_kanban = $24, origem = $25, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dados.nome)
        .bind(&dados.email)
        .bind(&dados.telefone)
        .bind(dados.tipo_cliente)
        .bind(&dados.cpf_cnpj)
        .bind(&dados.rg_ie)
        .bind(&dados.data_nascimento_abertura)
        .bind(dados.dados_responsavel.as_ref().map(Json))
        .bind(dados.havera_remissao)
        .bind(&dados.operadora)
        .bind(&dados.produto)
        .bind(dados.valor_produto)
        .bind(dados.reducao_carencia)
        .bind(dados.coparticipacao)
        .bind(&dados.vigencia)
        .bind(Json(&dados.endereco))
        .bind(Json(&dados.beneficiarios))
        .bind(Json(&dados.mensagens))
        .bind(Json(&dados.documentos))
        .bind(vendedor.map(|v| v.name.as_str()))
        .bind(vendedor.map(|v| v.email.as_str()))
        .bind(vendedor.map(|v| v.id))
        .bind(dados.status_kanban)
        .bind(&dados.origem)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::LeadNotFound,
            e => AppError::DatabaseError(e),
        })
    }

    // Qualquer status pode ser definido a partir de qualquer outro
    pub async fn update_status(&self, id: i32, status: KanbanStatus) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            "UPDATE leads SET status_kanban = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::LeadNotFound,
            e => AppError::DatabaseError(e),
        })
    }

    // Anexa uma mensagem ao array JSONB do lead
    pub async fn append_message(
        &self,
        id: i32,
        message: &LeadMessage,
    ) -> Result<Lead, AppError> {
        sqlx::query_as::<_, Lead>(
            "UPDATE leads SET mensagens = mensagens || $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(Json(message))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AppError::LeadNotFound,
            e => AppError::DatabaseError(e),
        })
    }

    /// Estado do rodízio, derivado inteiramente do banco: o lead mais
    /// recente que já possui vendedor. Sobrevive a reinícios do processo.
    pub async fn last_assigned_seller_id(&self) -> Result<Option<i32>, AppError> {
        let id = sqlx::query_scalar::<_, i32>(
            r#"
            SELECT vendedor_id FROM leads
            WHERE vendedor_id IS NOT NULL
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(id)
    }

    // Carga por vendedor, para a política de menor carga
    pub async fn count_by_seller(&self) -> Result<HashMap<i32, i64>, AppError> {
        let rows = sqlx::query_as::<_, (i32, i64)>(
            r#"
            SELECT vendedor_id, COUNT(*) FROM leads
            WHERE vendedor_id IS NOT NULL
            GROUP BY vendedor_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().collect())
    }
}
