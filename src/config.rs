// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::{
    db::{DashboardRepository, LeadRepository, UserRepository},
    services::{
        assignment::AssignmentPolicy, auth::AuthService, dashboard_service::DashboardService,
        lead_service::LeadService,
    },
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub lead_service: LeadService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o gráfico de dependências
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Política de atribuição de leads. Valor desconhecido derruba o boot:
        // melhor falhar na subida do que atribuir com a política errada.
        let policy = match env::var("ASSIGNMENT_POLICY") {
            Ok(valor) => valor
                .parse::<AssignmentPolicy>()
                .map_err(|e| anyhow::anyhow!(e))?,
            Err(_) => AssignmentPolicy::default(),
        };

        // acquire_timeout limitado: nenhuma chamada ao banco espera para sempre
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        tracing::info!("Política de atribuição de leads: {:?}", policy);

        let user_repo = UserRepository::new(db_pool.clone());
        let lead_repo = LeadRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let lead_service = LeadService::new(lead_repo, user_repo, policy);
        let dashboard_service = DashboardService::new(dashboard_repo);

        Ok(Self {
            db_pool,
            auth_service,
            lead_service,
            dashboard_service,
        })
    }
}
