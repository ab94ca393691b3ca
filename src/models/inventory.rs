// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- 1. Categorías ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
}

// --- 2. Productos ---

// Estado derivado del producto. Nunca se acepta del cliente: se recalcula
// antes de cada escritura como función pura de stock y umbral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_status")]
pub enum ProductStatus {
    Normal,
    Critico,
}

impl ProductStatus {
    pub fn compute(stock: i32, critical_threshold: i32) -> Self {
        if stock <= critical_threshold {
            ProductStatus::Critico
        } else {
            ProductStatus::Normal
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub price: Decimal,
    pub stock: i32,
    pub critical_threshold: i32,
    pub status: ProductStatus,
    pub image_url: Option<String>,
}

// Producto con su categoría ya resuelta (el "populate" de los listados)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    pub id: Uuid,
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Uuid,
    pub category_name: String,
    pub price: Decimal,
    pub stock: i32,
    pub critical_threshold: i32,
    pub status: ProductStatus,
    pub image_url: Option<String>,
}

// Banda de stock de tres niveles, usada por el filtro de listado y por el
// asistente al describir un producto. No confundir con ProductStatus, que
// solo distingue Normal/Critico y se persiste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockBand {
    EnStock,
    StockBajo,
    StockCritico,
}

impl StockBand {
    pub fn of(stock: i32, critical_threshold: i32) -> Self {
        if stock <= critical_threshold {
            StockBand::StockCritico
        } else if stock <= critical_threshold * 2 {
            StockBand::StockBajo
        } else {
            StockBand::EnStock
        }
    }
}

impl std::str::FromStr for StockBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en_stock" => Ok(StockBand::EnStock),
            "stock_bajo" => Ok(StockBand::StockBajo),
            "stock_critico" => Ok(StockBand::StockCritico),
            other => Err(format!("estado desconocido: {other}")),
        }
    }
}

// Filtros opcionales del listado; se componen de forma conjuntiva.
// El cliente manda los tres parámetros siempre; los vacíos cuentan como
// ausentes.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ProductFilter {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<Uuid>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<StockBand>,
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

// --- 3. Movimientos de stock ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "transaction_type")]
pub enum TransactionType {
    Venta,
    Reabastecimiento,
    #[sqlx(rename = "Ajuste_IA")]
    #[serde(rename = "Ajuste_IA")]
    AjusteIa,
}

// Libro mayor: solo se inserta, nunca se actualiza ni se borra.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockTransaction {
    pub id: Uuid,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub quantity_change: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub date: DateTime<Utc>,
}

// --- 4. Payloads ---

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("El valor no puede ser negativo".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, message = "SKU es obligatorio"))]
    pub sku: String,

    #[validate(length(min = 1, message = "Nombre es obligatorio"))]
    pub name: String,

    pub description: Option<String>,

    #[validate(required(message = "Categoría es obligatoria"))]
    pub category_id: Option<Uuid>,

    #[validate(custom(function = validate_not_negative))]
    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock es obligatorio"))]
    pub stock: i32,

    #[validate(range(min = 0, message = "El umbral no puede ser negativo"))]
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: i32,

    pub image_url: Option<String>,
}

fn default_critical_threshold() -> i32 {
    10
}

// Actualización parcial: solo se aplican los campos presentes.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    pub sku: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    #[validate(custom(function = validate_not_negative))]
    pub price: Option<Decimal>,
    #[validate(range(min = 0, message = "Stock no puede ser negativo"))]
    pub stock: Option<i32>,
    #[validate(range(min = 0, message = "El umbral no puede ser negativo"))]
    pub critical_threshold: Option<i32>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "El nombre de la categoría es obligatorio"))]
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_critico_en_el_umbral() {
        assert_eq!(ProductStatus::compute(10, 10), ProductStatus::Critico);
        assert_eq!(ProductStatus::compute(0, 10), ProductStatus::Critico);
        assert_eq!(ProductStatus::compute(11, 10), ProductStatus::Normal);
    }

    #[test]
    fn bandas_de_stock() {
        // umbral 10: <=10 crítico, 11..=20 bajo, >20 en stock
        assert_eq!(StockBand::of(10, 10), StockBand::StockCritico);
        assert_eq!(StockBand::of(11, 10), StockBand::StockBajo);
        assert_eq!(StockBand::of(20, 10), StockBand::StockBajo);
        assert_eq!(StockBand::of(21, 10), StockBand::EnStock);
    }

    #[test]
    fn filtro_status_desde_query() {
        let f: ProductFilter =
            serde_json::from_str(r#"{"status":"stock_critico"}"#).expect("parse");
        assert_eq!(f.status, Some(StockBand::StockCritico));
    }

    #[test]
    fn parametros_vacios_cuentan_como_ausentes() {
        // El frontend manda ?search=&category=&status= cuando no filtra
        let f: ProductFilter =
            serde_json::from_str(r#"{"search":"","category":"","status":""}"#).expect("parse");
        assert!(f.search.is_none());
        assert!(f.category.is_none());
        assert!(f.status.is_none());
    }
}
