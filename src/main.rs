//src/main.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use std::env;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::{admin_guard, auth_guard};

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Ingestão e health check ficam públicos: o provedor externo não autentica
    let webhook_routes = Router::new()
        .route("/webhook/{provider}", post(handlers::webhook::receive))
        .route("/health", get(handlers::webhook::health));

    // Rotas de autenticação (login público, /me protegido)
    let auth_routes = Router::new().route("/login", post(handlers::auth::login)).merge(
        Router::new()
            .route("/me", get(handlers::auth::get_me))
            .layer(axum_middleware::from_fn_with_state(
                app_state.clone(),
                auth_guard,
            )),
    );

    // Gestão de usuários: o admin_guard roda por dentro do auth_guard
    // (camadas aplicadas de fora para dentro, a última é a mais externa)
    let user_routes = Router::new()
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/{id}",
            put(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .layer(axum_middleware::from_fn(admin_guard))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let lead_routes = Router::new()
        .route(
            "/",
            get(handlers::leads::list_leads).post(handlers::leads::create_lead),
        )
        .route(
            "/{id}",
            get(handlers::leads::get_lead).put(handlers::leads::update_lead),
        )
        .route("/{id}/status", patch(handlers::leads::update_status))
        .route("/{id}/messages", post(handlers::leads::add_message))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(webhook_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/leads", lead_routes)
        .nest("/api/dashboard", dashboard_routes)
        // Limite de 1 MB por corpo de requisição
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Inicia o servidor
    let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
