// src/db/inventory_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{
        Category, Product, ProductFilter, ProductStatus, ProductWithCategory, StockBand,
        StockTransaction, TransactionType,
    },
};

const PRODUCT_WITH_CATEGORY: &str = r#"
    SELECT p.id, p.sku, p.name, p.description, p.category_id,
           c.name AS category_name, p.price, p.stock, p.critical_threshold,
           p.status, p.image_url
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

fn band_param(band: Option<StockBand>) -> Option<&'static str> {
    band.map(|b| match b {
        StockBand::EnStock => "en_stock",
        StockBand::StockBajo => "stock_bajo",
        StockBand::StockCritico => "stock_critico",
    })
}

#[derive(Clone)]
pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Lecturas
    // ---

    // Listado con filtros opcionales que se componen de forma conjuntiva.
    // Los parámetros NULL desactivan su condición.
    pub async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithCategory>, AppError> {
        let sql = format!(
            r#"{PRODUCT_WITH_CATEGORY}
            WHERE ($1::text IS NULL OR p.name ILIKE '%' || $1 || '%' OR p.sku ILIKE '%' || $1 || '%')
              AND ($2::uuid IS NULL OR p.category_id = $2)
              AND ($3::text IS NULL
                   OR ($3 = 'stock_critico' AND p.stock <= p.critical_threshold)
                   OR ($3 = 'stock_bajo' AND p.stock > p.critical_threshold
                       AND p.stock <= p.critical_threshold * 2)
                   OR ($3 = 'en_stock' AND p.stock > p.critical_threshold * 2))
            ORDER BY p.name ASC
            "#
        );

        let products = sqlx::query_as::<_, ProductWithCategory>(&sql)
            .bind(filter.search.as_deref())
            .bind(filter.category)
            .bind(band_param(filter.status))
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    // Acepta executor para poder leer dentro de una transacción abierta
    pub async fn find_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn find_product_with_category(
        &self,
        id: Uuid,
    ) -> Result<Option<ProductWithCategory>, AppError> {
        let sql = format!("{PRODUCT_WITH_CATEGORY} WHERE p.id = $1");
        let product = sqlx::query_as::<_, ProductWithCategory>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    // Coincidencia exacta de nombre, sin distinguir mayúsculas (el chequeo
    // de duplicados del asistente)
    pub async fn find_product_by_name_exact(
        &self,
        name: &str,
    ) -> Result<Option<Product>, AppError> {
        let product =
            sqlx::query_as::<_, Product>("SELECT * FROM products WHERE lower(name) = lower($1)")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(product)
    }

    // Coincidencia por subcadena, la resolución laxa que usa el asistente
    pub async fn find_product_by_name_like(
        &self,
        name: &str,
    ) -> Result<Option<ProductWithCategory>, AppError> {
        let sql = format!(
            "{PRODUCT_WITH_CATEGORY} WHERE p.name ILIKE '%' || $1 || '%' ORDER BY p.name ASC LIMIT 1"
        );
        let product = sqlx::query_as::<_, ProductWithCategory>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    pub async fn count_products(&self, category: Option<Uuid>) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM products WHERE ($1::uuid IS NULL OR category_id = $1)",
        )
        .bind(category)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    pub async fn list_products_limited(
        &self,
        category: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<ProductWithCategory>, AppError> {
        let sql = format!(
            r#"{PRODUCT_WITH_CATEGORY}
            WHERE ($1::uuid IS NULL OR p.category_id = $1)
            ORDER BY p.name ASC
            LIMIT $2
            "#
        );
        let products = sqlx::query_as::<_, ProductWithCategory>(&sql)
            .bind(category)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(products)
    }

    // ---
    // Escrituras (transaccionales: reciben el executor)
    // ---

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_product<'e, E>(
        &self,
        executor: E,
        sku: &str,
        name: &str,
        description: Option<&str>,
        category_id: Uuid,
        price: Decimal,
        stock: i32,
        critical_threshold: i32,
        status: ProductStatus,
        image_url: Option<&str>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (sku, name, description, category_id, price, stock,
                 critical_threshold, status, image_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(sku)
        .bind(name)
        .bind(description)
        .bind(category_id)
        .bind(price)
        .bind(stock)
        .bind(critical_threshold)
        .bind(status)
        .bind(image_url)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Reescribe la fila completa; el servicio ya aplicó los campos
    // parciales y recalculó el status.
    pub async fn update_product_row<'e, E>(
        &self,
        executor: E,
        product: &Product,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET sku = $2, name = $3, description = $4, category_id = $5,
                price = $6, stock = $7, critical_threshold = $8,
                status = $9, image_url = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(product.description.as_deref())
        .bind(product.category_id)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.critical_threshold)
        .bind(product.status)
        .bind(product.image_url.as_deref())
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::SkuAlreadyExists;
                }
            }
            e.into()
        })
    }

    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // Registra un movimiento en el libro mayor (auditoría). Se llama
    // dentro de la misma transacción que la escritura del producto.
    pub async fn record_transaction<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        user_id: Uuid,
        quantity_change: i32,
        transaction_type: TransactionType,
    ) -> Result<StockTransaction, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let movement = sqlx::query_as::<_, StockTransaction>(
            r#"
            INSERT INTO stock_transactions (product_id, user_id, quantity_change, type)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(user_id)
        .bind(quantity_change)
        .bind(transaction_type)
        .fetch_one(executor)
        .await?;
        Ok(movement)
    }

    // ---
    // Categorías
    // ---

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        let categories =
            sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(categories)
    }

    pub async fn find_category_by_name_exact(
        &self,
        name: &str,
    ) -> Result<Option<Category>, AppError> {
        let category =
            sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE lower(name) = lower($1)")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(category)
    }

    pub async fn find_category_by_name_like(
        &self,
        name: &str,
    ) -> Result<Option<Category>, AppError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE name ILIKE '%' || $1 || '%' ORDER BY name ASC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(category)
    }

    pub async fn create_category<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (name, description)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(description)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::CategoryAlreadyExists;
                }
            }
            e.into()
        })
    }
}
