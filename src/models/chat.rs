// src/models/chat.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "chat_sender")]
pub enum ChatSender {
    Usuario,
    #[sqlx(rename = "IA")]
    #[serde(rename = "IA")]
    Ia,
}

// Registro de la conversación: cada intercambio guarda dos filas,
// la del usuario y la de la IA.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatLog {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub sender: ChatSender,
    pub action_taken: Option<String>,
    pub timestamp: DateTime<Utc>,
}

// Turno de conversación que el cliente manda como contexto (últimos ~10)
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatTurn {
    pub role: String, // "user" | "assistant"
    pub content: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChatMessagePayload {
    #[validate(length(min = 1, message = "El mensaje es obligatorio"))]
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

// --- Clasificación de intenciones ---

// Las siete acciones que el modelo puede elegir, más el fallback.
// Cualquier valor no reconocido cae en Unknown vía #[serde(other)].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatAction {
    AddProduct,
    UpdateProduct,
    DeleteProduct,
    UpdateStock,
    CheckStock,
    ListProducts,
    GeneralChat,
    #[serde(other)]
    Unknown,
}

// La forma laxa que devuelve el modelo: todos los slots anulables.
// Nunca se despacha sobre esto directamente; primero se convierte en
// ChatIntent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCommand {
    pub action: Option<ChatAction>,
    pub product_name: Option<String>,
    pub quantity: Option<f64>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub new_name: Option<String>,
    pub new_price: Option<Decimal>,
    pub filter_category: Option<String>,
    pub message: Option<String>,
}

// Unión etiquetada sobre la que se despacha. Los slots siguen siendo
// opcionales: cuando falta uno requerido, la respuesta es un mensaje de
// guía, no un error.
#[derive(Debug, Clone, PartialEq)]
pub enum ChatIntent {
    AddProduct {
        product_name: Option<String>,
        price: Option<Decimal>,
        category: Option<String>,
        quantity: Option<f64>,
    },
    UpdateProduct {
        product_name: Option<String>,
        new_name: Option<String>,
        new_price: Option<Decimal>,
        price: Option<Decimal>,
        category: Option<String>,
    },
    DeleteProduct {
        product_name: Option<String>,
    },
    UpdateStock {
        product_name: Option<String>,
        quantity: Option<f64>,
    },
    CheckStock {
        product_name: Option<String>,
    },
    ListProducts {
        filter_category: Option<String>,
    },
    GeneralChat,
    Unknown {
        message: Option<String>,
    },
}

impl From<RawCommand> for ChatIntent {
    fn from(raw: RawCommand) -> Self {
        match raw.action {
            Some(ChatAction::AddProduct) => ChatIntent::AddProduct {
                product_name: raw.product_name,
                price: raw.price,
                category: raw.category,
                quantity: raw.quantity,
            },
            Some(ChatAction::UpdateProduct) => ChatIntent::UpdateProduct {
                product_name: raw.product_name,
                new_name: raw.new_name,
                new_price: raw.new_price,
                price: raw.price,
                category: raw.category,
            },
            Some(ChatAction::DeleteProduct) => ChatIntent::DeleteProduct {
                product_name: raw.product_name,
            },
            Some(ChatAction::UpdateStock) => ChatIntent::UpdateStock {
                product_name: raw.product_name,
                quantity: raw.quantity,
            },
            Some(ChatAction::CheckStock) => ChatIntent::CheckStock {
                product_name: raw.product_name,
            },
            Some(ChatAction::ListProducts) => ChatIntent::ListProducts {
                // El modelo a veces devuelve la categoría en el slot genérico
                filter_category: raw.filter_category.or(raw.category),
            },
            Some(ChatAction::GeneralChat) => ChatIntent::GeneralChat,
            Some(ChatAction::Unknown) | None => ChatIntent::Unknown { message: raw.message },
        }
    }
}

impl ChatIntent {
    pub fn action(&self) -> ChatAction {
        match self {
            ChatIntent::AddProduct { .. } => ChatAction::AddProduct,
            ChatIntent::UpdateProduct { .. } => ChatAction::UpdateProduct,
            ChatIntent::DeleteProduct { .. } => ChatAction::DeleteProduct,
            ChatIntent::UpdateStock { .. } => ChatAction::UpdateStock,
            ChatIntent::CheckStock { .. } => ChatAction::CheckStock,
            ChatIntent::ListProducts { .. } => ChatAction::ListProducts,
            ChatIntent::GeneralChat => ChatAction::GeneralChat,
            ChatIntent::Unknown { .. } => ChatAction::Unknown,
        }
    }
}

// Lo que responde POST /api/chat
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatResponse {
    pub action: ChatAction,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StrategyReport {
    pub report: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accion_desconocida_cae_en_unknown() {
        let raw: RawCommand =
            serde_json::from_str(r#"{"action":"HACKEAR_TODO","message":"eh"}"#).expect("parse");
        assert_eq!(raw.action, Some(ChatAction::Unknown));
        let intent = ChatIntent::from(raw);
        assert_eq!(intent.action(), ChatAction::Unknown);
    }

    #[test]
    fn comando_completo_se_valida_a_la_union() {
        let raw: RawCommand = serde_json::from_str(
            r#"{
                "action": "ADD_PRODUCT",
                "productName": "Refresco Cola",
                "quantity": 10,
                "price": 15.5,
                "category": "bebidas",
                "newName": null,
                "newPrice": null,
                "filterCategory": null,
                "message": "Añadiendo refrescos"
            }"#,
        )
        .expect("parse");
        match ChatIntent::from(raw) {
            ChatIntent::AddProduct { product_name, price, category, quantity } => {
                assert_eq!(product_name.as_deref(), Some("Refresco Cola"));
                assert_eq!(quantity, Some(10.0));
                assert!(price.is_some());
                assert_eq!(category.as_deref(), Some("bebidas"));
            }
            other => panic!("intención inesperada: {other:?}"),
        }
    }

    #[test]
    fn json_sin_action_no_despacha() {
        let raw: RawCommand = serde_json::from_str(r#"{"productName":"algo"}"#).expect("parse");
        assert_eq!(ChatIntent::from(raw).action(), ChatAction::Unknown);
    }

    #[test]
    fn list_products_toma_category_como_filtro() {
        let raw: RawCommand =
            serde_json::from_str(r#"{"action":"LIST_PRODUCTS","category":"lacteos"}"#)
                .expect("parse");
        match ChatIntent::from(raw) {
            ChatIntent::ListProducts { filter_category } => {
                assert_eq!(filter_category.as_deref(), Some("lacteos"));
            }
            other => panic!("intención inesperada: {other:?}"),
        }
    }
}
