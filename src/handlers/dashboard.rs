// src/handlers/dashboard.rs
//
// Lecturas puras del tablero; el cliente las refresca por sondeo.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{
        AlertsResponse, CategoryDemandEntry, DashboardStats, DemandPoint, Recommendation,
    },
};

#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    responses(
        (status = 200, description = "KPIs globales recalculados al momento", body = DashboardStats)
    ),
    security(("token" = [])),
    tag = "dashboard"
)]
pub async fn get_stats(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = app_state.dashboard_service.get_stats().await?;
    Ok((StatusCode::OK, Json(stats)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/alerts",
    responses(
        (status = 200, description = "Hasta 10 productos en o bajo su umbral, los más bajos primero", body = AlertsResponse)
    ),
    security(("token" = [])),
    tag = "dashboard"
)]
pub async fn get_alerts(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let alerts = app_state.dashboard_service.get_alerts().await?;
    Ok((StatusCode::OK, Json(alerts)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/demand-prediction",
    responses(
        (status = 200, description = "8 meses de historia más 2 proyectados", body = [DemandPoint])
    ),
    security(("token" = [])),
    tag = "dashboard"
)]
pub async fn get_demand_prediction(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let series = app_state.dashboard_service.get_demand_prediction().await?;
    Ok((StatusCode::OK, Json(series)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/category-demand",
    responses(
        (status = 200, description = "Top 6 de categorías por unidades vendidas (30 días)", body = [CategoryDemandEntry])
    ),
    security(("token" = [])),
    tag = "dashboard"
)]
pub async fn get_category_demand(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let demand = app_state.dashboard_service.get_category_demand().await?;
    Ok((StatusCode::OK, Json(demand)))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/recommendations",
    responses(
        (status = 200, description = "Tendencia por categoría: últimos 30 días contra los 30 previos", body = [Recommendation])
    ),
    security(("token" = [])),
    tag = "dashboard"
)]
pub async fn get_recommendations(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let recommendations = app_state.dashboard_service.get_recommendations().await?;
    Ok((StatusCode::OK, Json(recommendations)))
}
