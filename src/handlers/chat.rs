// src/handlers/chat.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::chat::{ChatLog, ChatMessagePayload, ChatResponse, StrategyReport},
};

// ---
// Handler: handle_chat — un intercambio completo con el asistente
// ---
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatMessagePayload,
    responses(
        (status = 200, description = "Acción resuelta y mensaje del asistente", body = ChatResponse),
        (status = 500, description = "Fallo del proveedor de IA")
    ),
    security(("token" = [])),
    tag = "chat"
)]
pub async fn handle_chat(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<ChatMessagePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let response = app_state
        .chat_service
        .handle_message(&user, &payload.message, &payload.history)
        .await?;

    Ok((StatusCode::OK, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/chat/history",
    responses(
        (status = 200, description = "Historial propio en orden cronológico", body = [ChatLog])
    ),
    security(("token" = [])),
    tag = "chat"
)]
pub async fn get_chat_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let history = app_state.chat_service.get_history(&user).await?;
    Ok((StatusCode::OK, Json(history)))
}

// Borra únicamente las filas del usuario autenticado
#[utoipa::path(
    delete,
    path = "/api/chat/history",
    responses(
        (status = 200, description = "Historial propio eliminado")
    ),
    security(("token" = [])),
    tag = "chat"
)]
pub async fn delete_chat_history(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let deleted = app_state.chat_service.delete_history(&user).await?;
    Ok((StatusCode::OK, Json(json!({ "msg": "Historial eliminado", "deleted": deleted }))))
}

// ---
// Handler: strategy_report — diagnóstico ejecutivo bajo demanda
// ---
#[utoipa::path(
    get,
    path = "/api/chat/report",
    responses(
        (status = 200, description = "Reporte ejecutivo en texto libre", body = StrategyReport),
        (status = 403, description = "Se requiere rol de Admin"),
        (status = 500, description = "Fallo del proveedor de IA")
    ),
    security(("token" = [])),
    tag = "chat"
)]
pub async fn strategy_report(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
) -> Result<impl IntoResponse, AppError> {
    let report = app_state.chat_service.strategy_report().await?;
    Ok((StatusCode::OK, Json(report)))
}
