// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Rol del usuario. Las mutaciones de inventario exigen Admin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role")]
pub enum UserRole {
    Admin,
    Vendedor,
}

// Representa un usuario venido de la base de datos
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para seguridad
    pub password_hash: String,

    pub phone: String,
    pub profile_image: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

// Datos para registro de un nuevo usuario
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(length(min = 1, message = "El nombre es obligatorio"))]
    pub name: String,
    #[validate(email(message = "Por favor incluye un email válido"))]
    pub email: String,
    #[validate(length(min = 6, message = "Por favor ingresa una contraseña con 6 o más caracteres"))]
    pub password: String,
    pub role: Option<UserRole>,
}

// Datos para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "Por favor incluye un email válido"))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es obligatoria"))]
    pub password: String,
}

// Respuesta de autenticación: token más los campos públicos del usuario
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estructura de datos ("claims") dentro del JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,      // Subject (ID del usuario)
    pub role: UserRole, // Rol embebido para el guard de Admin
    pub exp: usize,     // Expiration time (8 horas después de emitido)
    pub iat: usize,     // Issued At
}
