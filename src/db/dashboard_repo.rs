// src/db/dashboard_repo.rs

use sqlx::PgPool;
use std::collections::HashMap;

use crate::{
    common::error::AppError,
    models::{
        dashboard::DashboardStats,
        lead::{ClientType, KanbanStatus},
    },
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Indicadores do painel. `vendedor_id` presente restringe à carteira do
    // vendedor; ausente agrega o CRM inteiro (visão do admin).
    pub async fn get_stats(&self, vendedor_id: Option<i32>) -> Result<DashboardStats, AppError> {
        // Transação somente leitura: snapshot consistente dos contadores
        let mut tx = self.pool.begin().await?;

        let total_leads = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM leads WHERE ($1::int4 IS NULL OR vendedor_id = $1)",
        )
        .bind(vendedor_id)
        .fetch_one(&mut *tx)
        .await?;

        let status_rows = sqlx::query_as::<_, (KanbanStatus, i64)>(
            r#"
            SELECT status_kanban, COUNT(*) FROM leads
            WHERE ($1::int4 IS NULL OR vendedor_id = $1)
            GROUP BY status_kanban
            "#,
        )
        .bind(vendedor_id)
        .fetch_all(&mut *tx)
        .await?;

        let type_rows = sqlx::query_as::<_, (ClientType, i64)>(
            r#"
            SELECT tipo_cliente, COUNT(*) FROM leads
            WHERE tipo_cliente IS NOT NULL
              AND ($1::int4 IS NULL OR vendedor_id = $1)
            GROUP BY tipo_cliente
            "#,
        )
        .bind(vendedor_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        // Colunas do kanban sempre presentes no mapa, mesmo zeradas
        let mut by_status: HashMap<String, i64> = KanbanStatus::ALL
            .iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        for (status, count) in status_rows {
            by_status.insert(status.as_str().to_string(), count);
        }

        let mut by_type: HashMap<String, i64> = ClientType::ALL
            .iter()
            .map(|t| (t.as_str().to_string(), 0))
            .collect();
        for (tipo, count) in type_rows {
            by_type.insert(tipo.as_str().to_string(), count);
        }

        let ativadas = by_status
            .get(KanbanStatus::Activated.as_str())
            .copied()
            .unwrap_or(0);
        let conversion_rate = if total_leads > 0 {
            (ativadas as f64 / total_leads as f64 * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Ok(DashboardStats {
            total_leads,
            conversion_rate,
            by_status,
            by_type,
        })
    }
}
