// src/db/settings_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::settings::{AppConfig, UpdateSettingsPayload},
};

// Repositorio de la configuración global. La tabla guarda una sola fila,
// creada con sus defaults en la primera lectura.
#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_or_create(&self) -> Result<AppConfig, AppError> {
        if let Some(config) = sqlx::query_as::<_, AppConfig>("SELECT * FROM app_config LIMIT 1")
            .fetch_optional(&self.pool)
            .await?
        {
            return Ok(config);
        }

        let config =
            sqlx::query_as::<_, AppConfig>("INSERT INTO app_config DEFAULT VALUES RETURNING *")
                .fetch_one(&self.pool)
                .await?;
        Ok(config)
    }

    pub async fn update(&self, payload: &UpdateSettingsPayload) -> Result<AppConfig, AppError> {
        let current = self.get_or_create().await?;

        let config = sqlx::query_as::<_, AppConfig>(
            r#"
            UPDATE app_config
            SET global_critical_threshold = COALESCE($2, global_critical_threshold),
                theme_preference          = COALESCE($3, theme_preference)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(current.id)
        .bind(payload.global_critical_threshold)
        .bind(payload.theme_preference.as_deref())
        .fetch_one(&self.pool)
        .await?;
        Ok(config)
    }
}
