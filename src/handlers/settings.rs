// src/handlers/settings.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::RequireAdmin,
    models::settings::{AppConfig, UpdateSettingsPayload},
};

// GET /api/settings
#[utoipa::path(
    get,
    path = "/api/settings",
    responses(
        (status = 200, description = "Configuración global (se crea con defaults en la primera lectura)", body = AppConfig)
    ),
    security(("token" = [])),
    tag = "settings"
)]
pub async fn get_settings(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let settings = app_state.settings_repo.get_or_create().await?;
    Ok((StatusCode::OK, Json(settings)))
}

// PUT /api/settings (solo Admin)
#[utoipa::path(
    put,
    path = "/api/settings",
    request_body = UpdateSettingsPayload,
    responses(
        (status = 200, description = "Configuración actualizada", body = AppConfig),
        (status = 403, description = "Se requiere rol de Admin")
    ),
    security(("token" = [])),
    tag = "settings"
)]
pub async fn update_settings(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Json(payload): Json<UpdateSettingsPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let settings = app_state.settings_repo.update(&payload).await?;
    Ok((StatusCode::OK, Json(settings)))
}
