// src/llm.rs
//
// Acceso al modelo de lenguaje. El servicio de chat depende del trait,
// nunca del cliente concreto, para poder sustituirlo en tests.

pub mod gemini;

use async_trait::async_trait;

use crate::common::error::AppError;

#[async_trait]
pub trait LlmClient: Send + Sync {
    // Manda un prompt completo y devuelve el texto plano de la respuesta.
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}
