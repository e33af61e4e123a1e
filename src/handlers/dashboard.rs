// src/handlers/dashboard.rs

use axum::{Json, extract::State};

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::dashboard::DashboardStats,
};

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores do painel", body = DashboardStats)
    ),
    security(("api_jwt" = []))
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<DashboardStats>, AppError> {
    let stats = app_state.dashboard_service.stats_for(&user).await?;
    Ok(Json(stats))
}
