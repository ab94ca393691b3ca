// src/db/chat_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::chat::{ChatLog, ChatSender},
};

#[derive(Clone)]
pub struct ChatRepository {
    pool: PgPool,
}

impl ChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_log(
        &self,
        user_id: Uuid,
        message: &str,
        sender: ChatSender,
        action_taken: Option<&str>,
    ) -> Result<ChatLog, AppError> {
        let log = sqlx::query_as::<_, ChatLog>(
            r#"
            INSERT INTO chat_logs (user_id, message, sender, action_taken)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(message)
        .bind(sender)
        .bind(action_taken)
        .fetch_one(&self.pool)
        .await?;
        Ok(log)
    }

    // Historial propio, en orden cronológico
    pub async fn history_for_user(&self, user_id: Uuid) -> Result<Vec<ChatLog>, AppError> {
        let logs = sqlx::query_as::<_, ChatLog>(
            "SELECT * FROM chat_logs WHERE user_id = $1 ORDER BY timestamp ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }

    // Borra solo las filas del usuario que lo pide
    pub async fn delete_for_user(&self, user_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM chat_logs WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
