// src/llm/gemini.rs
//
// Cliente HTTP para el endpoint generateContent de la API de Gemini.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::{common::error::AppError, llm::LlmClient};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<GeminiClientInner>,
}

struct GeminiClientInner {
    client: reqwest::Client,
    model: String,
}

// --- Tipos del wire ---

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    // La clave viaja como cabecera por defecto; el modelo se fija una vez.
    pub fn new(api_key: &str, model: &str) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut key_value = HeaderValue::from_str(api_key)
            .map_err(|_| anyhow::anyhow!("GEMINI_API_KEY contiene caracteres inválidos"))?;
        key_value.set_sensitive(true);
        headers.insert("x-goog-api-key", key_value);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(GeminiClientInner { client, model: model.to_string() }),
        })
    }

    fn endpoint(&self) -> String {
        format!("{GEMINI_API_BASE}/{}:generateContent", self.inner.model)
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let request = GenerateRequest {
            contents: vec![Content { parts: vec![Part { text: prompt.to_string() }] }],
        };

        let response = self
            .inner
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("fallo de transporte: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("fallo leyendo la respuesta: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Upstream(format!("estado {status}: {body}")));
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::Upstream(format!("respuesta no parseable: {e}")))?;

        extract_text(parsed)
            .ok_or_else(|| AppError::Upstream("respuesta sin candidatos".to_string()))
    }
}

// Concatena el texto de todas las partes del primer candidato
fn extract_text(response: GenerateResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String =
        candidate.content.parts.into_iter().map(|p| p.text).collect::<Vec<_>>().join("");
    if text.is_empty() { None } else { Some(text) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extrae_texto_del_primer_candidato() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{
                "candidates": [
                    {"content": {"parts": [{"text": "Hola "}, {"text": "mundo"}]}},
                    {"content": {"parts": [{"text": "ignorado"}]}}
                ]
            }"#,
        )
        .expect("parse");
        assert_eq!(extract_text(parsed).as_deref(), Some("Hola mundo"));
    }

    #[test]
    fn respuesta_sin_candidatos_es_none() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{}"#).expect("parse");
        assert!(extract_text(parsed).is_none());
    }

    #[test]
    fn el_cliente_es_clone_send_sync() {
        fn assert_clone<T: Clone>() {}
        fn assert_send_sync<T: Send + Sync>() {}
        assert_clone::<GeminiClient>();
        assert_send_sync::<GeminiClient>();
    }
}
