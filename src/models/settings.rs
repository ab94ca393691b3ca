// src/models/settings.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Configuración global de la aplicación (fila única). Es orientativa:
// cada producto conserva su propio umbral crítico.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub id: Uuid,
    pub global_critical_threshold: i32,
    pub theme_preference: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsPayload {
    #[validate(range(min = 0, message = "El umbral no puede ser negativo"))]
    pub global_critical_threshold: Option<i32>,
    pub theme_preference: Option<String>,
}
