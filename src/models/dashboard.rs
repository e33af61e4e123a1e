// src/models/dashboard.rs

use serde::Serialize;
use std::collections::HashMap;
use utoipa::ToSchema;

// Indicadores exibidos no painel. As chaves dos mapas são os rótulos dos
// enums (RECEIVED, PF, ...), já no formato que o front consome.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_leads: i64,
    // Percentual de leads implantados (ACTIVATED) sobre o total
    pub conversion_rate: f64,
    pub by_status: HashMap<String, i64>,
    pub by_type: HashMap<String, i64>,
}
