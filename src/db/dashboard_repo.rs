// src/db/dashboard_repo.rs
//
// Consultas de agregación del tablero. Devuelven filas crudas; la
// aritmética (porcentajes, rotación, proyección) vive en el servicio.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;

#[derive(Debug, sqlx::FromRow)]
pub struct TotalsRow {
    pub total_stock: i64,
    pub active_products: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RotationRow {
    pub product_id: Uuid,
    pub first_sale: DateTime<Utc>,
    pub last_sale: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct AlertRow {
    pub id: Uuid,
    pub name: String,
    pub category_name: Option<String>,
    pub stock: i32,
    pub critical_threshold: i32,
}

#[derive(Debug, sqlx::FromRow)]
pub struct MonthlyUnitsRow {
    pub month: DateTime<Utc>,
    pub units: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub struct CategoryUnitsRow {
    pub category: String,
    pub units: i64,
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn totals(&self) -> Result<TotalsRow, AppError> {
        let row = sqlx::query_as::<_, TotalsRow>(
            r#"
            SELECT COALESCE(SUM(stock), 0)::bigint AS total_stock,
                   COUNT(*)                        AS active_products
            FROM products
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    // Ingresos de un día calendario: |cantidad| * precio actual del
    // producto. Las ventas de productos borrados suman precio 0.
    pub async fn revenue_for_day(&self, day: NaiveDate) -> Result<Decimal, AppError> {
        let total = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(ABS(t.quantity_change) * COALESCE(p.price, 0)), 0)
            FROM stock_transactions t
            LEFT JOIN products p ON p.id = t.product_id
            WHERE t.type = 'Venta'
              AND t.date::date = $1
            "#,
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;
        Ok(total)
    }

    // Primera y última venta por producto desde `since`
    pub async fn sale_spans_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<RotationRow>, AppError> {
        let rows = sqlx::query_as::<_, RotationRow>(
            r#"
            SELECT product_id, MIN(date) AS first_sale, MAX(date) AS last_sale
            FROM stock_transactions
            WHERE type = 'Venta' AND date >= $1
            GROUP BY product_id
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Productos en o por debajo de su umbral, los más bajos primero
    pub async fn alert_products(&self, limit: i64) -> Result<Vec<AlertRow>, AppError> {
        let rows = sqlx::query_as::<_, AlertRow>(
            r#"
            SELECT p.id, p.name, c.name AS category_name, p.stock, p.critical_threshold
            FROM products p
            LEFT JOIN categories c ON c.id = p.category_id
            WHERE p.stock <= p.critical_threshold
            ORDER BY p.stock ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Unidades vendidas por mes calendario desde `since`
    pub async fn monthly_units_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<MonthlyUnitsRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyUnitsRow>(
            r#"
            SELECT date_trunc('month', date) AS month,
                   COALESCE(SUM(ABS(quantity_change)), 0)::bigint AS units
            FROM stock_transactions
            WHERE type = 'Venta' AND date >= $1
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // Unidades vendidas por categoría en [from, to)
    pub async fn category_units_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<CategoryUnitsRow>, AppError> {
        let rows = sqlx::query_as::<_, CategoryUnitsRow>(
            r#"
            SELECT c.name AS category,
                   COALESCE(SUM(ABS(t.quantity_change)), 0)::bigint AS units
            FROM stock_transactions t
            JOIN products p   ON p.id = t.product_id
            JOIN categories c ON c.id = p.category_id
            WHERE t.type = 'Venta' AND t.date >= $1 AND t.date < $2
            GROUP BY c.name
            ORDER BY units DESC
            LIMIT $3
            "#,
        )
        .bind(from)
        .bind(to)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn any_sales_exist(&self) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM stock_transactions WHERE type = 'Venta')",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // Fallback sin historial: categorías ordenadas por stock total actual
    pub async fn categories_by_stock(&self, limit: i64) -> Result<Vec<CategoryUnitsRow>, AppError> {
        let rows = sqlx::query_as::<_, CategoryUnitsRow>(
            r#"
            SELECT c.name AS category,
                   COALESCE(SUM(p.stock), 0)::bigint AS units
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.name
            ORDER BY units DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
