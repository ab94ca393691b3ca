// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

// KPIs principales del tablero. Todo se recalcula en cada petición.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_stock: i64,
    pub active_products: i64,
    pub sales_today: Decimal,
    pub sales_yesterday: Decimal,
    // (hoy - ayer) / ayer * 100, redondeado a un decimal; 0 si ayer fue 0
    pub sales_change_percent: f64,
    // Días promedio entre primera y última venta por producto (30 días atrás)
    pub avg_rotation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    Low,
}

impl AlertSeverity {
    // "critical" si el stock cayó a la mitad del umbral o menos
    pub fn of(stock: i32, critical_threshold: i32) -> Self {
        if stock <= critical_threshold / 2 {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Low
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockAlert {
    pub id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub stock: i32,
    pub critical_threshold: i32,
    pub severity: AlertSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertsResponse {
    pub alerts: Vec<StockAlert>,
}

// Punto de la serie de demanda: 8 meses de historia más 2 proyectados.
// `real` es null en los meses futuros; `predicted` solo existe en los
// últimos 3 meses históricos y en los futuros.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DemandPoint {
    pub month: String,
    pub real: Option<i64>,
    pub predicted: Option<i64>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDemandEntry {
    pub category: String,
    pub units: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Stable,
    Down,
}

impl Trend {
    pub fn color(self) -> &'static str {
        match self {
            Trend::Up => "green",
            Trend::Stable => "blue",
            Trend::Down => "orange",
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: String,
    pub trend: Trend,
    pub change_percent: Option<f64>,
    pub color: String,
    pub message: String,
}
