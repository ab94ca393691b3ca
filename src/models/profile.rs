// src/models/profile.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::auth::User;

// Edición del perfil propio: solo se aplican los campos presentes.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateProfilePayload {
    pub name: Option<String>,
    #[validate(email(message = "Por favor incluye un email válido"))]
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImageResponse {
    pub profile_image: String,
    pub user: User,
}
