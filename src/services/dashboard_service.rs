// src/services/dashboard_service.rs

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    models::{
        auth::{Role, User},
        dashboard::DashboardStats,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    // Mesmo escopo da listagem de leads: admin vê tudo, vendedor a carteira
    pub async fn stats_for(&self, user: &User) -> Result<DashboardStats, AppError> {
        let filtro = match user.role {
            Role::Admin => None,
            Role::Seller => Some(user.id),
        };
        self.repo.get_stats(filtro).await
    }
}
