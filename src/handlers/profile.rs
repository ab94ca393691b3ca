// src/handlers/profile.rs

use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::{
        auth::User,
        profile::{ProfileImageResponse, UpdateProfilePayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Perfil del usuario autenticado", body = User)
    ),
    security(("token" = [])),
    tag = "profile"
)]
pub async fn get_profile(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = UpdateProfilePayload,
    responses(
        (status = 200, description = "Perfil actualizado", body = User),
        (status = 400, description = "E-mail ya registrado por otro usuario")
    ),
    security(("token" = [])),
    tag = "profile"
)]
pub async fn update_profile(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<UpdateProfilePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let updated = app_state.profile_service.update_profile(user.id, &payload).await?;
    Ok((StatusCode::OK, Json(updated)))
}

// ---
// Handler: upload_image — multipart con el campo "profileImage"
// ---
#[utoipa::path(
    post,
    path = "/api/profile/image",
    request_body(content = Vec<u8>, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Imagen guardada; la anterior queda borrada", body = ProfileImageResponse),
        (status = 400, description = "Imagen ausente, de tipo no permitido o mayor a 5MB")
    ),
    security(("token" = [])),
    tag = "profile"
)]
pub async fn upload_image(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(|_| AppError::InvalidImage)? {
        if field.name() != Some("profileImage") {
            continue;
        }

        let filename = field.file_name().ok_or(AppError::InvalidImage)?.to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(|_| AppError::ImageTooLarge)?;

        let response = app_state
            .profile_service
            .save_image(&user, &filename, &content_type, &bytes)
            .await?;

        return Ok((StatusCode::OK, Json(response)));
    }

    Err(AppError::InvalidImage)
}
