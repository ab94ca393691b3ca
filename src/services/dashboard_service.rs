// src/services/dashboard_service.rs
//
// Analítica del tablero. Todo es lectura pura y se recalcula en cada
// petición; las consultas agregadas viven en el repositorio y aquí queda
// la aritmética.

use chrono::{Datelike, Duration, Months, NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::{
    common::error::AppError,
    db::DashboardRepository,
    db::dashboard_repo::{CategoryUnitsRow, RotationRow},
    models::dashboard::{
        AlertSeverity, AlertsResponse, CategoryDemandEntry, DashboardStats, DemandPoint,
        Recommendation, StockAlert, Trend,
    },
};

const HISTORY_MONTHS: usize = 8;
const PROJECTED_MONTHS: usize = 2;
const OVERLAY_MONTHS: usize = 3;
const GROWTH_PER_STEP: f64 = 0.03;
const MAX_ALERTS: i64 = 10;
const MAX_CATEGORY_DEMAND: i64 = 6;
const MAX_RECOMMENDATIONS: i64 = 5;
const DEFAULT_ROTATION_DAYS: f64 = 15.0;

#[derive(Clone)]
pub struct DashboardService {
    repo: DashboardRepository,
}

impl DashboardService {
    pub fn new(repo: DashboardRepository) -> Self {
        Self { repo }
    }

    pub async fn get_stats(&self) -> Result<DashboardStats, AppError> {
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);

        let totals = self.repo.totals().await?;
        let sales_today = self.repo.revenue_for_day(today).await?;
        let sales_yesterday = self.repo.revenue_for_day(yesterday).await?;

        let since = Utc::now() - Duration::days(30);
        let spans = self.repo.sale_spans_since(since).await?;

        Ok(DashboardStats {
            total_stock: totals.total_stock,
            active_products: totals.active_products,
            sales_today,
            sales_yesterday,
            sales_change_percent: percent_change(sales_today, sales_yesterday),
            avg_rotation: average_rotation(&spans),
        })
    }

    pub async fn get_alerts(&self) -> Result<AlertsResponse, AppError> {
        let rows = self.repo.alert_products(MAX_ALERTS).await?;

        let alerts = rows
            .into_iter()
            .map(|row| {
                let severity = AlertSeverity::of(row.stock, row.critical_threshold);
                let message = match severity {
                    AlertSeverity::Critical => format!(
                        "¡Stock crítico! Quedan {} unidades de \"{}\". Reabastece lo antes posible.",
                        row.stock, row.name
                    ),
                    AlertSeverity::Low => format!(
                        "Stock bajo: quedan {} unidades de \"{}\". Considera reabastecer pronto.",
                        row.stock, row.name
                    ),
                };
                StockAlert {
                    id: row.id,
                    name: row.name,
                    category: row.category_name,
                    stock: row.stock,
                    critical_threshold: row.critical_threshold,
                    severity,
                    message,
                }
            })
            .collect();

        Ok(AlertsResponse { alerts })
    }

    pub async fn get_demand_prediction(&self) -> Result<Vec<DemandPoint>, AppError> {
        let today = Utc::now().date_naive();
        let months = trailing_months(today, HISTORY_MONTHS, PROJECTED_MONTHS);

        // Ventas mensuales desde el inicio del mes más antiguo de la serie
        let oldest = months[0];
        let since = oldest
            .and_hms_opt(0, 0, 0)
            .expect("medianoche siempre es válida")
            .and_utc();
        let rows = self.repo.monthly_units_since(since).await?;

        // Rellena con cero los meses sin ventas
        let real: Vec<i64> = months[..HISTORY_MONTHS]
            .iter()
            .map(|m| {
                rows.iter()
                    .find(|r| r.month.year() == m.year() && r.month.month() == m.month())
                    .map(|r| r.units)
                    .unwrap_or(0)
            })
            .collect();

        let projected = project_demand(&real, PROJECTED_MONTHS);

        Ok(months
            .iter()
            .zip(projected)
            .map(|(m, (real, predicted))| DemandPoint {
                month: month_label(*m),
                real,
                predicted,
            })
            .collect())
    }

    pub async fn get_category_demand(&self) -> Result<Vec<CategoryDemandEntry>, AppError> {
        let now = Utc::now();
        let rows = self
            .repo
            .category_units_between(now - Duration::days(30), now, MAX_CATEGORY_DEMAND)
            .await?;

        // Sin ninguna venta registrada, el ranking cae al stock actual
        let rows = if rows.is_empty() && !self.repo.any_sales_exist().await? {
            self.repo.categories_by_stock(MAX_CATEGORY_DEMAND).await?
        } else {
            rows
        };

        Ok(rows
            .into_iter()
            .map(|r| CategoryDemandEntry { category: r.category, units: r.units })
            .collect())
    }

    pub async fn get_recommendations(&self) -> Result<Vec<Recommendation>, AppError> {
        let now = Utc::now();

        if !self.repo.any_sales_exist().await? {
            let categories = self.repo.categories_by_stock(MAX_RECOMMENDATIONS).await?;
            return Ok(canned_recommendations(&categories));
        }

        let current = self
            .repo
            .category_units_between(now - Duration::days(30), now, MAX_RECOMMENDATIONS)
            .await?;
        let previous = self
            .repo
            .category_units_between(now - Duration::days(60), now - Duration::days(30), i64::MAX)
            .await?;

        Ok(current
            .into_iter()
            .map(|row| {
                let prev = previous
                    .iter()
                    .find(|p| p.category == row.category)
                    .map(|p| p.units)
                    .unwrap_or(0);
                recommend(&row.category, row.units, prev)
            })
            .collect())
    }
}

// ---
// Aritmética pura
// ---

// (hoy - ayer) / ayer * 100, a un decimal; 0 cuando ayer fue 0
pub fn percent_change(today: Decimal, yesterday: Decimal) -> f64 {
    if yesterday.is_zero() {
        return 0.0;
    }
    let today = today.to_f64().unwrap_or(0.0);
    let yesterday = yesterday.to_f64().unwrap_or(0.0);
    ((today - yesterday) / yesterday * 1000.0).round() / 10.0
}

// Días promedio entre primera y última venta por producto. Un producto
// con una sola venta cuenta 30 días; sin datos la rotación es 15.0.
pub fn average_rotation(spans: &[RotationRow]) -> f64 {
    if spans.is_empty() {
        return DEFAULT_ROTATION_DAYS;
    }
    let total: f64 = spans
        .iter()
        .map(|s| {
            let days = (s.last_sale - s.first_sale).num_days();
            if days == 0 { 30.0 } else { days as f64 }
        })
        .sum();
    (total / spans.len() as f64 * 10.0).round() / 10.0
}

// Proyección ingenua: promedio móvil de los últimos 3 meses reales,
// compuesto al 3% por paso. La predicción se superpone a los últimos 3
// meses históricos y se extiende `extra` meses hacia el futuro.
pub fn project_demand(real: &[i64], extra: usize) -> Vec<(Option<i64>, Option<i64>)> {
    let len = real.len();
    let window = real.iter().rev().take(OVERLAY_MONTHS).copied().collect::<Vec<_>>();
    let base = if window.is_empty() {
        0.0
    } else {
        window.iter().sum::<i64>() as f64 / window.len() as f64
    };

    let overlay_start = len.saturating_sub(OVERLAY_MONTHS);
    let mut series = Vec::with_capacity(len + extra);

    for (i, value) in real.iter().enumerate() {
        let predicted = if i >= overlay_start {
            let step = (i - overlay_start) as u32;
            Some((base * (1.0 + GROWTH_PER_STEP).powi(step as i32)).round() as i64)
        } else {
            None
        };
        series.push((Some(*value), predicted));
    }

    for future in 0..extra {
        let step = (len.min(OVERLAY_MONTHS) + future) as i32;
        series.push((None, Some((base * (1.0 + GROWTH_PER_STEP).powi(step)).round() as i64)));
    }

    series
}

// Primeros días de `history` meses hacia atrás (incluido el actual) más
// `future` meses hacia adelante, del más antiguo al más nuevo.
fn trailing_months(today: NaiveDate, history: usize, future: usize) -> Vec<NaiveDate> {
    let current = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
        .expect("el día 1 siempre existe");
    let mut months = Vec::with_capacity(history + future);
    for i in (1..history).rev() {
        months.push(
            current
                .checked_sub_months(Months::new(i as u32))
                .expect("resta de meses dentro de rango"),
        );
    }
    months.push(current);
    for i in 1..=future {
        months.push(
            current
                .checked_add_months(Months::new(i as u32))
                .expect("suma de meses dentro de rango"),
        );
    }
    months
}

fn month_label(month: NaiveDate) -> String {
    const NAMES: [&str; 12] = [
        "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
    ];
    format!("{} {}", NAMES[month.month0() as usize], month.year())
}

fn recommend(category: &str, current: i64, previous: i64) -> Recommendation {
    let change = if previous == 0 {
        if current > 0 { 100.0 } else { 0.0 }
    } else {
        ((current - previous) as f64 / previous as f64 * 1000.0).round() / 10.0
    };

    let (trend, message) = if change > 10.0 {
        (
            Trend::Up,
            format!(
                "La demanda de {category} subió {change}% en los últimos 30 días. Conviene aumentar el stock."
            ),
        )
    } else if change < -10.0 {
        (
            Trend::Down,
            format!(
                "La demanda de {category} bajó {}% respecto al mes anterior. Reduce los pedidos.",
                change.abs()
            ),
        )
    } else {
        (
            Trend::Stable,
            format!("La demanda de {category} se mantiene estable. Mantén los niveles actuales."),
        )
    };

    Recommendation {
        category: category.to_string(),
        trend,
        change_percent: Some(change),
        color: trend.color().to_string(),
        message,
    }
}

// Sin historial de ventas: mensajes enlatados rotando tendencia
fn canned_recommendations(categories: &[CategoryUnitsRow]) -> Vec<Recommendation> {
    categories
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let (trend, message) = match i % 3 {
                0 => (
                    Trend::Up,
                    format!(
                        "Tendencia al alza esperada en {}. Aumenta el stock de los productos clave.",
                        row.category
                    ),
                ),
                1 => (
                    Trend::Stable,
                    format!(
                        "Demanda estable prevista en {}. Mantén los niveles actuales.",
                        row.category
                    ),
                ),
                _ => (
                    Trend::Down,
                    format!("Posible baja de rotación en {}. Evita el sobre-stock.", row.category),
                ),
            };
            Recommendation {
                category: row.category.clone(),
                trend,
                change_percent: None,
                color: trend.color().to_string(),
                message,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use uuid::Uuid;

    #[test]
    fn porcentaje_de_cambio_redondeado_a_un_decimal() {
        assert_eq!(percent_change(Decimal::new(150, 0), Decimal::new(100, 0)), 50.0);
        assert_eq!(percent_change(Decimal::new(100, 0), Decimal::new(300, 0)), -66.7);
        // Ayer en cero no divide: 0
        assert_eq!(percent_change(Decimal::new(100, 0), Decimal::ZERO), 0.0);
    }

    fn span(first: &str, last: &str) -> RotationRow {
        let parse = |s| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("fecha").and_utc()
        };
        RotationRow { product_id: Uuid::new_v4(), first_sale: parse(first), last_sale: parse(last) }
    }

    #[test]
    fn rotacion_promedia_dias_entre_ventas() {
        let spans = vec![
            span("2026-07-01 10:00:00", "2026-07-11 10:00:00"), // 10 días
            span("2026-07-05 10:00:00", "2026-07-05 10:00:00"), // una venta -> 30
        ];
        assert_eq!(average_rotation(&spans), 20.0);
    }

    #[test]
    fn rotacion_sin_datos_es_quince() {
        assert_eq!(average_rotation(&[]), 15.0);
    }

    #[test]
    fn proyeccion_con_promedio_movil_y_3_por_ciento() {
        // base = promedio(10, 20, 30) = 20
        let series = project_demand(&[10, 20, 30], 2);
        assert_eq!(series.len(), 5);
        assert_eq!(series[0], (Some(10), Some(20))); // 20 * 1.03^0
        assert_eq!(series[1], (Some(20), Some(21))); // 20.6 -> 21
        assert_eq!(series[2], (Some(30), Some(21))); // 21.218 -> 21
        assert_eq!(series[3], (None, Some(22))); // 21.85 -> 22
        assert_eq!(series[4], (None, Some(23))); // 22.51 -> 23
    }

    #[test]
    fn proyeccion_rellena_meses_sin_prediccion() {
        let series = project_demand(&[5, 5, 5, 5, 5, 10, 20, 30], 2);
        assert_eq!(series.len(), 10);
        // Los primeros cinco meses no llevan predicción
        for point in &series[..5] {
            assert_eq!(point.1, None);
        }
        assert_eq!(series[5].1, Some(20));
        assert_eq!(series[9], (None, Some(23)));
    }

    #[test]
    fn meses_de_la_serie() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 7).expect("fecha");
        let months = trailing_months(today, 8, 2);
        assert_eq!(months.len(), 10);
        assert_eq!(months[0], NaiveDate::from_ymd_opt(2026, 1, 1).expect("fecha"));
        assert_eq!(months[7], NaiveDate::from_ymd_opt(2026, 8, 1).expect("fecha"));
        assert_eq!(months[9], NaiveDate::from_ymd_opt(2026, 10, 1).expect("fecha"));
        assert_eq!(month_label(months[0]), "Ene 2026");
    }

    #[test]
    fn recomendacion_por_bandas_de_cambio() {
        assert_eq!(recommend("Bebidas", 120, 100).trend, Trend::Up);
        assert_eq!(recommend("Bebidas", 105, 100).trend, Trend::Stable);
        assert_eq!(recommend("Bebidas", 80, 100).trend, Trend::Down);
        // Sin ventas previas pero con actuales: alza
        assert_eq!(recommend("Bebidas", 10, 0).trend, Trend::Up);
    }

    #[test]
    fn severidad_de_alertas() {
        // umbral 10: 5 <= floor(10/2) -> critical, 8 -> low
        assert_eq!(AlertSeverity::of(5, 10), AlertSeverity::Critical);
        assert_eq!(AlertSeverity::of(8, 10), AlertSeverity::Low);
    }
}
